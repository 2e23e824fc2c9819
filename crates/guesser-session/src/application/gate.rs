//! Question readiness gate.

use guesser_core::error::AudioError;
use guesser_playback::AudioState;
use tokio::sync::watch;

/// How a question's clip settled.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Readiness {
    /// Metadata loaded with a usable, possibly unbounded, duration.
    Playable,
    /// The clip failed or has no length; the question runs on the timer
    /// alone.
    Silent(AudioError),
}

/// Reason recorded when metadata arrives without a playable length.
const NO_DURATION: &str = "clip reported no usable duration";

fn judge(state: &AudioState) -> Option<Readiness> {
    if let Some(error) = &state.error {
        return Some(Readiness::Silent(error.clone()));
    }
    if state.loading {
        return None;
    }
    if state.is_ready() {
        Some(Readiness::Playable)
    } else {
        Some(Readiness::Silent(AudioError::Load(NO_DURATION.to_owned())))
    }
}

/// Waits until the bound clip is playable or has failed. Returns `None` if
/// the playback controller went away first.
pub(crate) async fn await_readiness(mut audio: watch::Receiver<AudioState>) -> Option<Readiness> {
    loop {
        let verdict = judge(&audio.borrow_and_update());
        if verdict.is_some() {
            return verdict;
        }
        if audio.changed().await.is_err() {
            return None;
        }
    }
}
