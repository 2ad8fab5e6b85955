//! External player command, the single playback primitive.
//!
//! Playback is delegated to one configured command (ALSA `aplay -q` by
//! default). The crate never decodes audio and never picks a backend per
//! platform; whatever the command does with the file is the playback
//! behavior.

use std::fmt;
use std::path::Path;
use std::process::Command;

use log::debug;

use crate::config::PlayerConfig;

/// The external playback command: a program plus its fixed arguments.
/// The file to play is appended as the final argument at invocation time.
#[derive(Debug, Clone)]
pub struct Player {
    program: String,
    args: Vec<String>,
}

impl Player {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Player {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(cfg: &PlayerConfig) -> Self {
        Player::new(cfg.program.clone(), cfg.args.clone())
    }

    /// Player command from the environment or the config.
    /// `CUEBOX_PLAYER` (whitespace-split into program and args) wins.
    pub fn resolve(cfg: &PlayerConfig) -> Self {
        if let Ok(val) = std::env::var("CUEBOX_PLAYER") {
            let mut parts = val.split_whitespace().map(str::to_string);
            if let Some(program) = parts.next() {
                return Player {
                    program,
                    args: parts.collect(),
                };
            }
        }
        Player::from_config(cfg)
    }

    /// Play one file to completion. Blocks until the player exits.
    /// A spawn failure or non-zero exit status is the error; there is no
    /// retry and no fallback.
    pub fn play(&self, path: &Path) -> Result<(), String> {
        debug!("Playing {} via {self}", path.display());
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|e| format!("spawn {}: {e}", self.program))?;
        if status.success() {
            Ok(())
        } else {
            Err(format!(
                "{} failed on {}: {status}",
                self.program,
                path.display()
            ))
        }
    }

    /// Render the supervisor line run by `sh -c` for looping playback:
    /// `while :; do <program> <args…> "$1" || exit; done`.
    ///
    /// The loop restarts playback the moment a pass completes. On the first
    /// failing pass the bare `exit` ends the shell with the player's status.
    /// The file path is not embedded; it travels as a positional argument,
    /// so only the program and args need quoting.
    pub(crate) fn loop_line(&self) -> String {
        let mut cmd = shell_quote(&self.program);
        for arg in &self.args {
            cmd.push(' ');
            cmd.push_str(&shell_quote(arg));
        }
        format!("while :; do {cmd} \"$1\" || exit; done")
    }
}

impl Default for Player {
    /// The built-in command, `aplay -q`.
    fn default() -> Self {
        Player::from_config(&PlayerConfig::default())
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// POSIX single-quote escaping: wrap in `'`, turn embedded `'` into `'\''`.
fn shell_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}
