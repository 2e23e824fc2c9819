//! Session-level error taxonomy.

use guesser_core::error::{AudioError, ClientError};
use guesser_timer::TimerError;
use thiserror::Error;

/// Failures that halt a game until the player exits or restarts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Creating or starting the session failed.
    #[error("failed to create game session: {0}")]
    SessionCreation(ClientError),

    /// The service did not accept an answer.
    #[error("failed to submit answer: {0}")]
    AnswerSubmission(ClientError),

    /// The next question could not be fetched.
    #[error("failed to fetch next question: {0}")]
    QuestionFetch(ClientError),

    /// The audio device could not load a clip.
    #[error(transparent)]
    AudioLoad(#[from] AudioError),

    /// The countdown was misconfigured.
    #[error("countdown timer misconfigured: {0}")]
    TimerInternal(#[from] TimerError),
}
