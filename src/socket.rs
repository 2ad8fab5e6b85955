//! Unix domain socket listener for trigger commands.
//!
//! Wire format: one command per line.
//!   `MUSIC <name>`   switch the background track to a cue
//!   `MUSIC_OFF`      stop the background track
//!   `FX <name>`      fire a one-shot effect cue
//!   `RELOAD`         re-read the config file
//!   `QUIT`           shut the daemon down

use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::Path;
use std::sync::mpsc::Sender;

use log::{debug, info, warn};

#[derive(Debug)]
pub enum SocketCommand {
    Music(String),
    MusicOff,
    Fx(String),
    Reload,
    Quit,
}

/// Bind the listener socket, replacing a stale one from a previous run.
pub fn bind(path: &Path) -> Result<UnixListener, String> {
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }

    let listener =
        UnixListener::bind(path).map_err(|e| format!("bind {}: {e}", path.display()))?;
    info!("Socket listening at {}", path.display());
    Ok(listener)
}

/// Accept loop. Blocks forever, sending parsed commands through `tx`;
/// returns only if the receiving side hangs up.
pub fn serve(listener: UnixListener, tx: Sender<SocketCommand>) -> Result<(), String> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                let reader = BufReader::new(stream);
                for line in reader.lines() {
                    match line {
                        Ok(line) => {
                            if let Some(cmd) = parse_command(&line) {
                                debug!("Socket command: {line}");
                                if tx.send(cmd).is_err() {
                                    return Err("channel closed".into());
                                }
                            }
                        }
                        Err(e) => {
                            warn!("Socket read error: {e}");
                            break;
                        }
                    }
                }
            }
            Err(e) => warn!("Socket accept error: {e}"),
        }
    }

    Ok(())
}

fn parse_command(line: &str) -> Option<SocketCommand> {
    match line.trim() {
        "MUSIC_OFF" => Some(SocketCommand::MusicOff),
        "RELOAD" => Some(SocketCommand::Reload),
        "QUIT" => Some(SocketCommand::Quit),
        s if s.starts_with("MUSIC ") => {
            let name = s["MUSIC ".len()..].trim();
            (!name.is_empty()).then(|| SocketCommand::Music(name.to_string()))
        }
        s if s.starts_with("FX ") => {
            let name = s["FX ".len()..].trim();
            (!name.is_empty()).then(|| SocketCommand::Fx(name.to_string()))
        }
        _ => None,
    }
}
