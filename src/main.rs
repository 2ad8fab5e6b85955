//! cuebox: background music and sound cue daemon for Linux appliances
//!
//! Plays looped background music and one-shot effect cues through an
//! external player command, driven by line commands on a Unix socket.
//! Pair it with `cuectl` or anything else that can write to the socket.

use std::path::PathBuf;
use std::process::Child;
use std::sync::mpsc;

use log::{error, info, warn};

use cuebox::config::CueConfig;
use cuebox::fx;
use cuebox::music;
use cuebox::player::Player;
use cuebox::socket::{self, SocketCommand};
use cuebox::watcher;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config and player
    let (config, config_path) = CueConfig::find_and_load();
    let player = Player::resolve(&config.player);
    info!("Player: {player}");

    let socket_path = std::env::var("CUEBOX_SOCKET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| config.daemon.socket.clone());

    let listener = match socket::bind(&socket_path) {
        Ok(listener) => listener,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let (tx, rx) = mpsc::channel::<SocketCommand>();

    // Spawn socket listener thread
    let serve_tx = tx.clone();
    std::thread::spawn(move || {
        if let Err(e) = socket::serve(listener, serve_tx) {
            error!("Socket listener stopped: {e}");
        }
    });

    // Spawn config watcher thread, if a config file was found
    if let Some(path) = config_path.clone() {
        let watch_tx = tx.clone();
        std::thread::spawn(move || {
            if let Err(e) = watcher::watch_config(&path, watch_tx) {
                warn!("Config watcher stopped: {e}");
            }
        });
    }
    drop(tx);

    let mut sounds = config.sounds;
    let mut music_child: Option<Child> = None;

    // Autostart background music
    if let Some(path) = sounds.music_path() {
        match music::spawn_loop(&player, &path) {
            Ok(child) => music_child = Some(child),
            Err(e) => error!("{e}"),
        }
    }

    // Main event loop
    while let Ok(cmd) = rx.recv() {
        reap_if_dead(&mut music_child);

        match cmd {
            SocketCommand::Music(name) => match sounds.resolve(&name) {
                Some(path) => {
                    stop_music(&mut music_child);
                    match music::spawn_loop(&player, &path) {
                        Ok(child) => music_child = Some(child),
                        Err(e) => error!("{e}"),
                    }
                }
                None => warn!("Unknown music cue: {name}"),
            },
            SocketCommand::MusicOff => stop_music(&mut music_child),
            SocketCommand::Fx(name) => match sounds.resolve(&name) {
                Some(path) => {
                    fx::spawn(&player, &path);
                }
                None => warn!("Unknown fx cue: {name}"),
            },
            SocketCommand::Reload => match &config_path {
                Some(path) => match CueConfig::load(path) {
                    Ok(new) => {
                        sounds = new.sounds;
                        info!("Config reloaded");
                    }
                    Err(e) => warn!("Reload failed: {e}"),
                },
                None => warn!("No config file to reload"),
            },
            SocketCommand::Quit => {
                info!("Shutting down");
                break;
            }
        }
    }

    stop_music(&mut music_child);
}

/// Kill the music loop if one is running. The supervisor dies at once;
/// a player pass already under way finishes on its own.
fn stop_music(child: &mut Option<Child>) {
    if let Some(mut c) = child.take() {
        let pid = c.id();
        let _ = c.kill();
        let _ = c.wait();
        info!("Music loop stopped (pid {pid})");
    }
}

/// Forget a loop that already died, so the next track switch does not
/// try to kill a reaped pid.
fn reap_if_dead(child: &mut Option<Child>) {
    let status = match child.as_mut() {
        Some(c) => c.try_wait(),
        None => return,
    };
    if let Ok(Some(status)) = status {
        warn!("Music loop exited on its own: {status}");
        *child = None;
    }
}
