//! Command line client for the cuebox daemon.
//!
//! Usage: cuectl [-s SOCKET] COMMAND
//!
//! Commands:
//!   music NAME   switch the background track to the named cue
//!   music-off    stop the background track
//!   fx NAME      play the named cue once
//!   reload       make the daemon re-read its config
//!   quit         shut the daemon down
//!
//! The socket path comes from `-s`, then `$CUEBOX_SOCKET`, then the same
//! config chain the daemon reads.

use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

use log::error;

use cuebox::config::CueConfig;

fn usage() -> ! {
    eprintln!("usage: cuectl [-s SOCKET] music NAME | music-off | fx NAME | reload | quit");
    std::process::exit(2);
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();

    let socket = if args.first().map(String::as_str) == Some("-s") {
        if args.len() < 2 {
            usage();
        }
        args.remove(0);
        PathBuf::from(args.remove(0))
    } else {
        std::env::var("CUEBOX_SOCKET")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let (config, _) = CueConfig::find_and_load();
                config.daemon.socket
            })
    };

    let line = match args.first().map(String::as_str) {
        Some("music") => match args.get(1) {
            Some(name) => format!("MUSIC {name}"),
            None => usage(),
        },
        Some("fx") => match args.get(1) {
            Some(name) => format!("FX {name}"),
            None => usage(),
        },
        Some("music-off") => "MUSIC_OFF".to_string(),
        Some("reload") => "RELOAD".to_string(),
        Some("quit") => "QUIT".to_string(),
        _ => usage(),
    };

    let mut stream = match UnixStream::connect(&socket) {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to connect to {}: {e}", socket.display());
            std::process::exit(1);
        }
    };

    if let Err(e) = writeln!(stream, "{line}") {
        error!("Failed to write to {}: {e}", socket.display());
        std::process::exit(1);
    }
}
