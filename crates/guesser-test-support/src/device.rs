//! Test audio device — a controllable `AudioDevice` for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use guesser_core::error::AudioError;
use guesser_playback::{AudioDevice, MediaSignal, MediaSignals};

#[derive(Debug, Default)]
struct DeviceLog {
    signals: Option<MediaSignals>,
    loads: Vec<String>,
    unloads: usize,
    plays: usize,
    pauses: usize,
    positions: Vec<f64>,
    volumes: Vec<f32>,
}

/// An audio device that records every call and only reports load progress
/// when told to, unless auto-loading is enabled.
#[derive(Debug, Default)]
pub struct FakeAudioDevice {
    auto_load: Option<f64>,
    play_error: Option<String>,
    log: Mutex<DeviceLog>,
}

impl FakeAudioDevice {
    /// A device that stays loading until [`finish_loading`](Self::finish_loading).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `MetadataLoaded { duration }` as soon as a source is loaded.
    #[must_use]
    pub fn with_auto_load(mut self, duration: f64) -> Self {
        self.auto_load = Some(duration);
        self
    }

    /// Fail every `play` with `message`.
    #[must_use]
    pub fn with_play_error(mut self, message: impl Into<String>) -> Self {
        self.play_error = Some(message.into());
        self
    }

    /// Report metadata for the current source.
    pub fn finish_loading(&self, duration: f64) {
        self.emit(MediaSignal::MetadataLoaded { duration });
    }

    /// Report a load failure for the current source.
    pub fn fail_loading(&self, message: &str) {
        self.emit(MediaSignal::Error(message.to_owned()));
    }

    /// Send an arbitrary signal through the current binding.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn emit(&self, signal: MediaSignal) {
        if let Some(signals) = self.log.lock().unwrap().signals.as_ref() {
            signals.send(signal);
        }
    }

    /// Binding of the current source, kept to simulate late signals.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn current_signals(&self) -> Option<MediaSignals> {
        self.log.lock().unwrap().signals.clone()
    }

    /// Every URL loaded, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn loads(&self) -> Vec<String> {
        self.log.lock().unwrap().loads.clone()
    }

    /// Number of `unload` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn unload_count(&self) -> usize {
        self.log.lock().unwrap().unloads
    }

    /// Number of `play` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn play_count(&self) -> usize {
        self.log.lock().unwrap().plays
    }

    /// Number of `pause` calls.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn pause_count(&self) -> usize {
        self.log.lock().unwrap().pauses
    }

    /// Last position set on the device.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_position(&self) -> Option<f64> {
        self.log.lock().unwrap().positions.last().copied()
    }

    /// Last volume set on the device.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_volume(&self) -> Option<f32> {
        self.log.lock().unwrap().volumes.last().copied()
    }
}

#[async_trait]
impl AudioDevice for FakeAudioDevice {
    fn load(&self, url: &str, signals: MediaSignals) {
        if let Some(duration) = self.auto_load {
            signals.send(MediaSignal::MetadataLoaded { duration });
        }
        let mut log = self.log.lock().unwrap();
        log.loads.push(url.to_owned());
        log.signals = Some(signals);
    }

    fn unload(&self) {
        let mut log = self.log.lock().unwrap();
        log.unloads += 1;
        log.signals = None;
    }

    async fn play(&self) -> Result<(), AudioError> {
        self.log.lock().unwrap().plays += 1;
        match &self.play_error {
            Some(message) => Err(AudioError::Play(message.clone())),
            None => Ok(()),
        }
    }

    fn pause(&self) {
        self.log.lock().unwrap().pauses += 1;
    }

    fn set_position(&self, seconds: f64) {
        self.log.lock().unwrap().positions.push(seconds);
    }

    fn set_volume(&self, volume: f32) {
        self.log.lock().unwrap().volumes.push(volume);
    }
}
