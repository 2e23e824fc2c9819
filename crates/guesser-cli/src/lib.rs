//! Music Guesser — terminal front end.
//!
//! Wires the HTTP session client, a headless audio device and the game
//! orchestrator together and plays a game on stdin/stdout.

pub mod args;
pub mod catalog;
pub mod config;
pub mod device;
pub mod error;
pub mod terminal;
