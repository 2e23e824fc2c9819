//! Audio device abstraction.

use async_trait::async_trait;
use guesser_core::error::AudioError;
use tokio::sync::mpsc;

/// Notification from the device about the currently loaded source.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSignal {
    /// Metadata decoded; the clip is playable.
    MetadataLoaded {
        /// Clip length in seconds.
        duration: f64,
    },
    /// Playback position moved.
    TimeUpdate {
        /// Position in seconds.
        position: f64,
    },
    /// Playback reached the end of the clip.
    Ended,
    /// The source failed to load or decode.
    Error(String),
}

/// Signal sink bound to one source.
///
/// Each `load` gets a fresh binding. Once the controller moves on to another
/// source the binding is detached and anything sent through it is dropped.
#[derive(Debug, Clone)]
pub struct MediaSignals {
    tx: mpsc::UnboundedSender<MediaSignal>,
}

impl MediaSignals {
    pub(crate) fn new(tx: mpsc::UnboundedSender<MediaSignal>) -> Self {
        Self { tx }
    }

    /// Reports a signal for the bound source.
    pub fn send(&self, signal: MediaSignal) {
        // A closed channel means the binding was detached.
        let _ = self.tx.send(signal);
    }

    /// Whether the controller still listens to this binding.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// A black-box media element: decoding and output happen behind it.
#[async_trait]
pub trait AudioDevice: Send + Sync {
    /// Points the device at `url` and begins loading it. Load progress,
    /// duration and errors are reported through `signals`.
    fn load(&self, url: &str, signals: MediaSignals);

    /// Drops the current source.
    fn unload(&self);

    /// Attempts to start playback of the loaded source.
    async fn play(&self) -> Result<(), AudioError>;

    /// Halts playback, keeping the position.
    fn pause(&self);

    /// Moves the playback position.
    fn set_position(&self, seconds: f64);

    /// Sets the output volume in `[0, 1]`.
    fn set_volume(&self, volume: f32);
}
