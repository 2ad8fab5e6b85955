//! Background music: an endless playback loop in its own OS process.
//!
//! The loop lives inside a `sh` supervisor child so one process handle
//! covers the whole lifetime of the loop, isolated from the caller's
//! memory and signal space.

use std::path::Path;
use std::process::{Child, Command};

use log::{debug, info};

use crate::player::Player;

/// Start the loop process for one track and hand back its handle.
///
/// The child runs `while :; do <player> "$1" || exit; done`: playback
/// restarts the moment a pass completes, with no exit condition and no
/// inter-iteration delay. If the file is missing or unplayable the
/// player's own failure ends the loop and the child exits with that
/// status; nothing reaches the caller. No stop mechanism is provided,
/// the returned [`Child`] is the caller's lever.
pub fn spawn_loop(player: &Player, path: &Path) -> Result<Child, String> {
    let child = Command::new("sh")
        .arg("-c")
        .arg(player.loop_line())
        .arg("cuebox-music") // $0 of the loop line, visible in ps
        .arg(path)
        .spawn()
        .map_err(|e| format!("spawn music loop: {e}"))?;
    info!("Music loop started for {} (pid {})", path.display(), child.id());
    Ok(child)
}

/// Blocking form of the loop, on the calling thread.
/// Returns only if a pass fails; a playable track loops forever.
pub fn play_looped(player: &Player, path: &Path) -> Result<(), String> {
    debug!("Looping {} on the calling thread", path.display());
    loop {
        player.play(path)?;
    }
}
