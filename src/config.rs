//! TOML configuration for the cue daemon.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

#[derive(Debug, Default, Deserialize)]
pub struct CueConfig {
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub daemon: DaemonConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
}

/// The external playback command. See [`crate::player::Player`].
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        PlayerConfig {
            program: default_program(),
            args: default_args(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    #[serde(default = "default_socket")]
    pub socket: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        DaemonConfig {
            socket: default_socket(),
        }
    }
}

/// The cue table: named sounds plus the optional background track.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoundsConfig {
    /// Base directory for relative sound paths.
    pub dir: Option<PathBuf>,
    /// Background track autostarted at boot.
    pub music: Option<String>,
    #[serde(default)]
    pub cues: HashMap<String, String>,
}

fn default_program() -> String { "aplay".into() }
fn default_args() -> Vec<String> { vec!["-q".into()] }
fn default_socket() -> PathBuf { PathBuf::from("/tmp/cuebox.sock") }

impl CueConfig {
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("read {}: {e}", path.display()))?;
        toml::from_str(&content).map_err(|e| format!("parse {}: {e}", path.display()))
    }

    /// Load the first config in the chain that exists and parses, falling
    /// through to the next candidate on error and ending at built-in
    /// defaults:
    /// 1. `$CUEBOX_CONFIG`
    /// 2. `/etc/cuebox/cuebox.toml`
    /// 3. `./cuebox.toml`
    ///
    /// Also returns the path the config was loaded from. Reload and the
    /// config watcher follow that path, so a candidate that was broken or
    /// missing at startup stays out of the picture until the daemon
    /// restarts.
    pub fn find_and_load() -> (Self, Option<PathBuf>) {
        let candidates: Vec<PathBuf> = vec![
            std::env::var("CUEBOX_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/cuebox/cuebox.toml")),
            Some(PathBuf::from("cuebox.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_chain(candidates)
    }

    fn load_chain(candidates: Vec<PathBuf>) -> (Self, Option<PathBuf>) {
        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load(&path) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    return (config, Some(path));
                }
                Err(e) => warn!("{e}"),
            }
        }

        info!("Using built-in default config");
        (Self::default(), None)
    }
}

impl SoundsConfig {
    /// Resolve a cue name to a playable path.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.cues.get(name).map(|file| self.resolve_file(file))
    }

    /// Resolve the background track, if one is configured.
    pub fn music_path(&self) -> Option<PathBuf> {
        self.music.as_deref().map(|file| self.resolve_file(file))
    }

    /// Relative paths are joined onto `dir`; absolute ones pass through.
    fn resolve_file(&self, file: &str) -> PathBuf {
        let file = Path::new(file);
        let file = file.strip_prefix("./").unwrap_or(file);
        match &self.dir {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
[player]
program = "mpg123"
args = ["-q", "--no-control"]

[daemon]
socket = "/run/cuebox.sock"

[sounds]
dir = "/usr/share/cuebox"
music = "bgm/theme.wav"

[sounds.cues]
coin = "fx/coin.wav"
start = "fx/start.wav"
"#;
        let config: CueConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.player.program, "mpg123");
        assert_eq!(config.player.args, vec!["-q", "--no-control"]);
        assert_eq!(config.daemon.socket, PathBuf::from("/run/cuebox.sock"));
        assert_eq!(config.sounds.cues.len(), 2);
        assert_eq!(config.sounds.music.as_deref(), Some("bgm/theme.wav"));
    }

    #[test]
    fn partial_config_gets_defaults() {
        let config: CueConfig = toml::from_str("[sounds.cues]\nbeep = \"beep.wav\"\n").unwrap();
        assert_eq!(config.player.program, "aplay");
        assert_eq!(config.player.args, vec!["-q"]);
        assert_eq!(config.daemon.socket, PathBuf::from("/tmp/cuebox.sock"));
        assert!(config.sounds.music.is_none());
        assert_eq!(config.sounds.cues.len(), 1);
    }

    #[test]
    fn resolve_joins_dir_for_relative_paths() {
        let toml_str = r#"
[sounds]
dir = "/srv/sounds"
music = "./bgm.wav"

[sounds.cues]
coin = "fx/coin.wav"
alarm = "/abs/alarm.wav"
"#;
        let config: CueConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.sounds.resolve("coin"),
            Some(PathBuf::from("/srv/sounds/fx/coin.wav"))
        );
        assert_eq!(
            config.sounds.resolve("alarm"),
            Some(PathBuf::from("/abs/alarm.wav"))
        );
        assert_eq!(
            config.sounds.music_path(),
            Some(PathBuf::from("/srv/sounds/bgm.wav"))
        );
    }

    #[test]
    fn resolve_without_dir_passes_through() {
        let config: CueConfig = toml::from_str("[sounds.cues]\ncoin = \"fx/coin.wav\"\n").unwrap();
        assert_eq!(
            config.sounds.resolve("coin"),
            Some(PathBuf::from("fx/coin.wav"))
        );
        assert!(config.sounds.resolve("no-such-cue").is_none());
    }

    #[test]
    fn chain_falls_through_a_corrupt_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&broken, "not toml [").unwrap();
        std::fs::write(
            &good,
            "[player]\nprogram = \"mpg123\"\n\n[daemon]\nsocket = \"/run/cue.sock\"\n",
        )
        .unwrap();

        let (config, loaded) = CueConfig::load_chain(vec![
            dir.path().join("missing.toml"),
            broken,
            good.clone(),
        ]);
        assert_eq!(config.player.program, "mpg123");
        assert_eq!(config.daemon.socket, PathBuf::from("/run/cue.sock"));
        assert_eq!(loaded, Some(good));
    }

    #[test]
    fn chain_ends_at_builtin_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "not toml [").unwrap();

        let (config, loaded) =
            CueConfig::load_chain(vec![broken, dir.path().join("missing.toml")]);
        assert_eq!(config.player.program, "aplay");
        assert!(loaded.is_none());
    }

    #[test]
    fn load_reads_a_file_and_reports_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cuebox.toml");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[player]\nprogram = \"paplay\"\nargs = []").unwrap();
        let config = CueConfig::load(&path).unwrap();
        assert_eq!(config.player.program, "paplay");
        assert!(config.player.args.is_empty());

        std::fs::write(&path, "not toml [").unwrap();
        let err = CueConfig::load(&path).unwrap_err();
        assert!(err.contains("parse"), "unexpected error: {err}");

        let err = CueConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.contains("read"), "unexpected error: {err}");
    }
}
