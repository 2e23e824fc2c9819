//! Music Guesser — countdown timer.
//!
//! A fixed-interval countdown that reports progress through a watch channel
//! and fires its expiry callback exactly once per run.

pub mod countdown;
pub mod error;

pub use countdown::{CountdownTimer, DEFAULT_TICK_INTERVAL, TimerPhase, TimerState};
pub use error::TimerError;
