//! Audio cue playback for Linux appliances.
//! Background music loops in a detached player process, one-shot effects
//! run on fire-and-forget threads. Used by the cuebox daemon and cuectl.

pub mod config;
pub mod fx;
pub mod music;
pub mod player;
pub mod socket;
pub mod watcher;
