//! Music Guesser — playback controller.
//!
//! Wraps a single reusable [`AudioDevice`] and exposes its loading, playing,
//! duration and error state as an observable [`AudioState`].

pub mod controller;
pub mod device;

pub use controller::{AudioState, PlaybackController};
pub use device::{AudioDevice, MediaSignal, MediaSignals};
