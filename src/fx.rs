//! One-shot sound effects on fire-and-forget threads.

use std::path::Path;
use std::thread::JoinHandle;

use log::{debug, error};

use crate::player::Player;

/// Play a file exactly once on a new thread and hand back the thread handle.
///
/// A playback failure is logged inside the thread and ends it early; the
/// caller holding the handle is never informed. Dropping the handle
/// detaches the thread.
pub fn spawn(player: &Player, path: &Path) -> JoinHandle<()> {
    let player = player.clone();
    let path = path.to_path_buf();
    std::thread::spawn(move || {
        debug!("Playing fx {}", path.display());
        if let Err(e) = player.play(&path) {
            error!("Fx playback failed: {e}");
        }
    })
}
