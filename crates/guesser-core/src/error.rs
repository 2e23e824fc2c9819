//! Error types shared across crate boundaries.

use thiserror::Error;

/// Failure reported by a `SessionClient` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The service does not know the session (or it has no current question).
    #[error("game session not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status.
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP-style status code.
        status: u16,
        /// Detail message from the service.
        message: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure of the audio device, surfaced through the playback state.
///
/// Audio errors never abort a question: the clip stays silent and the
/// question can still be answered or timed out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The source could not be fetched or decoded.
    #[error("failed to load audio: {0}")]
    Load(String),

    /// The device refused to start playback.
    #[error("failed to play audio: {0}")]
    Play(String),
}
