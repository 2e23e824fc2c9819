//! Headless audio device.
//!
//! The terminal cannot play sound, so this device only checks that each
//! preview clip is reachable and then simulates a playhead of the configured
//! clip length.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use guesser_core::error::AudioError;
use guesser_playback::{AudioDevice, MediaSignal, MediaSignals};
use parking_lot::Mutex;
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::AppError;

/// Interval between simulated position updates.
const POSITION_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
struct Deck {
    signals: Option<MediaSignals>,
    loaded: bool,
    position: f64,
    volume: f32,
    probe: Option<JoinHandle<()>>,
    playhead: Option<JoinHandle<()>>,
}

impl Deck {
    fn stop_playhead(&mut self) {
        if let Some(playhead) = self.playhead.take() {
            playhead.abort();
        }
    }
}

/// An [`AudioDevice`] that probes clips over HTTP instead of decoding them.
#[derive(Debug, Clone)]
pub struct HeadlessAudioDevice {
    http: Client,
    clip_seconds: f64,
    deck: Arc<Mutex<Deck>>,
}

impl HeadlessAudioDevice {
    /// Creates a device reporting `clip_length` for every reachable clip.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(clip_length: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build audio probe client: {e}")))?;
        Ok(Self {
            http,
            clip_seconds: clip_length.as_secs_f64(),
            deck: Arc::new(Mutex::new(Deck::default())),
        })
    }

    /// Current simulated position in seconds.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.deck.lock().position
    }

    /// Last volume applied.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.deck.lock().volume
    }
}

async fn probe_clip(http: Client, url: String, clip_seconds: f64, deck: Arc<Mutex<Deck>>) {
    let signal = match http.head(&url).send().await {
        Ok(response) if response.status().is_success() => {
            MediaSignal::MetadataLoaded {
                duration: clip_seconds,
            }
        }
        Ok(response) => MediaSignal::Error(format!("clip unavailable: {}", response.status())),
        Err(error) => MediaSignal::Error(error.to_string()),
    };
    let mut deck = deck.lock();
    deck.loaded = matches!(signal, MediaSignal::MetadataLoaded { .. });
    deck.probe = None;
    if let Some(signals) = &deck.signals {
        debug!(%url, ?signal, "clip probed");
        signals.send(signal);
    }
}

async fn run_playhead(deck: Arc<Mutex<Deck>>, clip_seconds: f64) {
    let mut ticker = tokio::time::interval_at(
        tokio::time::Instant::now() + POSITION_INTERVAL,
        POSITION_INTERVAL,
    );
    loop {
        ticker.tick().await;
        let mut deck = deck.lock();
        deck.position = (deck.position + POSITION_INTERVAL.as_secs_f64()).min(clip_seconds);
        let Some(signals) = deck.signals.clone() else {
            return;
        };
        if deck.position >= clip_seconds {
            deck.position = 0.0;
            deck.playhead = None;
            signals.send(MediaSignal::Ended);
            return;
        }
        signals.send(MediaSignal::TimeUpdate {
            position: deck.position,
        });
    }
}

#[async_trait]
impl AudioDevice for HeadlessAudioDevice {
    fn load(&self, url: &str, signals: MediaSignals) {
        let mut deck = self.deck.lock();
        deck.stop_playhead();
        if let Some(probe) = deck.probe.take() {
            probe.abort();
        }
        deck.signals = Some(signals);
        deck.loaded = false;
        deck.position = 0.0;
        deck.probe = Some(tokio::spawn(probe_clip(
            self.http.clone(),
            url.to_owned(),
            self.clip_seconds,
            Arc::clone(&self.deck),
        )));
    }

    fn unload(&self) {
        let mut deck = self.deck.lock();
        deck.stop_playhead();
        if let Some(probe) = deck.probe.take() {
            probe.abort();
        }
        deck.signals = None;
        deck.loaded = false;
        deck.position = 0.0;
    }

    async fn play(&self) -> Result<(), AudioError> {
        let mut deck = self.deck.lock();
        if !deck.loaded {
            return Err(AudioError::Play("no clip loaded".to_owned()));
        }
        if deck.playhead.is_none() {
            deck.playhead = Some(tokio::spawn(run_playhead(
                Arc::clone(&self.deck),
                self.clip_seconds,
            )));
        }
        Ok(())
    }

    fn pause(&self) {
        self.deck.lock().stop_playhead();
    }

    fn set_position(&self, seconds: f64) {
        self.deck.lock().position = seconds.clamp(0.0, self.clip_seconds);
    }

    fn set_volume(&self, volume: f32) {
        self.deck.lock().volume = volume;
    }
}
