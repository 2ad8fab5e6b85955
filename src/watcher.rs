//! Config file watcher.
//! Nudges the daemon to reload its cue table when the file changes on disk.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::time::Duration;

use log::info;
use notify::{EventKind, RecursiveMode, Watcher};

use crate::socket::SocketCommand;

/// Watch the config file for changes.
/// Blocks the calling thread. Sends a `Reload` through `tx` per change.
///
/// The watch sits on the parent directory, filtered to the file's name:
/// editors that save by atomic rename replace the file node, and a watch
/// pinned to the old node goes silent after the first save.
pub fn watch_config(path: &Path, tx: Sender<SocketCommand>) -> Result<(), String> {
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = notify_tx.send(event);
            }
        })
        .map_err(|e| format!("watcher: {e}"))?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    watcher
        .watch(dir, RecursiveMode::NonRecursive)
        .map_err(|e| format!("watch {}: {e}", dir.display()))?;

    info!("Watching config {}", path.display());

    let name = path.file_name().map(|n| n.to_os_string());
    loop {
        match notify_rx.recv_timeout(Duration::from_secs(5)) {
            Ok(event) => {
                if !is_config_event(&event, name.as_deref()) {
                    continue;
                }
                if tx.send(SocketCommand::Reload).is_err() {
                    return Err("channel closed".to_string());
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                return Err("watcher disconnected".to_string());
            }
        }
    }
}

/// A modification or appearance of the config file itself. Everything
/// else in the directory (sibling files, reads) is noise.
fn is_config_event(event: &notify::Event, name: Option<&OsStr>) -> bool {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return false;
    }
    name.is_some() && event.paths.iter().any(|p| p.file_name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn in_place_writes_and_rename_saves_count_as_changes() {
        let name = Some(OsStr::new("cuebox.toml"));
        let written = event(
            EventKind::Modify(ModifyKind::Any),
            "/etc/cuebox/cuebox.toml",
        );
        assert!(is_config_event(&written, name));

        // An atomic-rename save surfaces as the replacement file appearing.
        let replaced = event(
            EventKind::Create(CreateKind::File),
            "/etc/cuebox/cuebox.toml",
        );
        assert!(is_config_event(&replaced, name));
    }

    #[test]
    fn sibling_files_and_reads_are_ignored() {
        let name = Some(OsStr::new("cuebox.toml"));
        let sibling = event(
            EventKind::Modify(ModifyKind::Any),
            "/etc/cuebox/cuebox.toml.swp",
        );
        assert!(!is_config_event(&sibling, name));

        let read = event(
            EventKind::Access(AccessKind::Any),
            "/etc/cuebox/cuebox.toml",
        );
        assert!(!is_config_event(&read, name));
    }
}
