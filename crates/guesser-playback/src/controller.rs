//! Playback controller.

use std::sync::Arc;

use guesser_core::error::AudioError;
use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::device::{AudioDevice, MediaSignal, MediaSignals};

/// Observable playback state of the current source.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioState {
    pub loading: bool,
    pub playing: bool,
    pub duration_seconds: f64,
    pub position_seconds: f64,
    pub error: Option<AudioError>,
}

impl AudioState {
    /// State right after a new source was set.
    #[must_use]
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    /// Metadata is in and the clip has a usable length.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.loading && self.duration_seconds > 0.0
    }

    fn apply(&mut self, signal: MediaSignal) {
        match signal {
            MediaSignal::MetadataLoaded { duration } => {
                // Live streams report an unbounded length; keep it.
                self.duration_seconds = if duration > 0.0 { duration } else { 0.0 };
                self.loading = false;
            }
            MediaSignal::TimeUpdate { position } => {
                self.position_seconds = position;
            }
            MediaSignal::Ended => {
                self.playing = false;
                self.position_seconds = 0.0;
            }
            MediaSignal::Error(message) => {
                self.error = Some(AudioError::Load(message));
                self.loading = false;
            }
        }
    }
}

impl Default for AudioState {
    fn default() -> Self {
        Self {
            loading: false,
            playing: false,
            duration_seconds: 0.0,
            position_seconds: 0.0,
            error: None,
        }
    }
}

struct Binding {
    generation: u64,
    source: Option<String>,
    listener: Option<JoinHandle<()>>,
    volume: f32,
}

impl Binding {
    fn detach(&mut self) {
        self.generation += 1;
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

struct Shared {
    binding: Mutex<Binding>,
    state_tx: watch::Sender<AudioState>,
}

/// Owns the audio device and re-points it at one source at a time.
///
/// Setting a new source always detaches the previous binding first, so a
/// late signal from an old clip can never leak into the next question.
pub struct PlaybackController {
    device: Arc<dyn AudioDevice>,
    shared: Arc<Shared>,
}

impl PlaybackController {
    /// Wraps `device` with no source loaded.
    #[must_use]
    pub fn new(device: Arc<dyn AudioDevice>) -> Self {
        let (state_tx, _rx) = watch::channel(AudioState::default());
        Self {
            device,
            shared: Arc::new(Shared {
                binding: Mutex::new(Binding {
                    generation: 0,
                    source: None,
                    listener: None,
                    volume: 1.0,
                }),
                state_tx,
            }),
        }
    }

    /// Points the device at `url`. An empty `url` unloads the device and
    /// settles the state without attempting playback.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn set_source(&self, url: &str) {
        let mut binding = self.shared.binding.lock();
        binding.detach();
        if binding.source.take().is_some() {
            self.device.pause();
            self.device.unload();
        }

        if url.is_empty() {
            self.shared.state_tx.send_replace(AudioState::default());
            return;
        }

        let generation = binding.generation;
        binding.source = Some(url.to_owned());
        self.shared.state_tx.send_replace(AudioState::loading());

        let (tx, rx) = mpsc::unbounded_channel();
        self.device.load(url, MediaSignals::new(tx));
        binding.listener = Some(tokio::spawn(listen(
            rx,
            Arc::clone(&self.shared),
            generation,
        )));
        debug!(generation, url, "audio source bound");
    }

    /// Source currently bound, if any.
    #[must_use]
    pub fn source(&self) -> Option<String> {
        self.shared.binding.lock().source.clone()
    }

    /// Attempts playback. Failures never propagate; they are recorded in
    /// [`AudioState::error`].
    pub async fn play(&self) {
        let generation = {
            let binding = self.shared.binding.lock();
            if binding.source.is_none() {
                return;
            }
            binding.generation
        };

        let result = self.device.play().await;

        let binding = self.shared.binding.lock();
        if binding.generation != generation {
            debug!(generation, "dropping play result for detached source");
            return;
        }
        self.shared.state_tx.send_modify(|state| match result {
            Ok(()) => state.playing = true,
            Err(error) => {
                warn!(%error, "playback failed");
                state.playing = false;
                state.error = Some(error);
            }
        });
    }

    /// Halts playback without rewinding.
    pub fn pause(&self) {
        self.device.pause();
        self.shared.state_tx.send_if_modified(|state| {
            let was_playing = state.playing;
            state.playing = false;
            was_playing
        });
    }

    /// Halts playback and rewinds to the start.
    pub fn stop(&self) {
        self.device.pause();
        self.device.set_position(0.0);
        self.shared.state_tx.send_modify(|state| {
            state.playing = false;
            state.position_seconds = 0.0;
        });
    }

    /// Sets the output volume, clamped to `[0, 1]`. Applies immediately
    /// whether or not anything is playing.
    pub fn set_volume(&self, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.shared.binding.lock().volume = volume;
        self.device.set_volume(volume);
    }

    /// Last volume applied.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.shared.binding.lock().volume
    }

    /// Moves playback to `seconds`, clamped to the clip length.
    pub fn seek(&self, seconds: f64) {
        let duration = self.shared.state_tx.borrow().duration_seconds;
        let position = if seconds.is_finite() {
            seconds.clamp(0.0, duration.max(0.0))
        } else {
            0.0
        };
        self.device.set_position(position);
        self.shared
            .state_tx
            .send_modify(|state| state.position_seconds = position);
    }

    /// Current playback state.
    #[must_use]
    pub fn state(&self) -> AudioState {
        self.shared.state_tx.borrow().clone()
    }

    /// Subscribes to playback state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AudioState> {
        self.shared.state_tx.subscribe()
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shared.binding.lock().detach();
    }
}

async fn listen(
    mut rx: mpsc::UnboundedReceiver<MediaSignal>,
    shared: Arc<Shared>,
    generation: u64,
) {
    while let Some(signal) = rx.recv().await {
        let binding = shared.binding.lock();
        if binding.generation != generation {
            return;
        }
        if let MediaSignal::Error(message) = &signal {
            warn!(generation, %message, "audio source failed");
        }
        shared.state_tx.send_modify(|state| state.apply(signal));
    }
}
