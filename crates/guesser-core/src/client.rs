//! Session client abstraction.

use async_trait::async_trait;

use crate::answer::{AnswerRequest, AnswerResponse};
use crate::error::ClientError;
use crate::session::{GameSettings, GameStateResponse, RemoteSummary, SessionCreated, SessionId};

/// Request/response contract of the remote game service.
///
/// The orchestrator only consumes this trait; transports live in other
/// crates.
#[async_trait]
pub trait SessionClient: Send + Sync {
    /// Create a session with the given settings.
    async fn create_session(&self, settings: &GameSettings) -> Result<SessionCreated, ClientError>;

    /// Start a created session and return its first question.
    async fn start_session(&self, session_id: SessionId) -> Result<GameStateResponse, ClientError>;

    /// Fetch the session's current question and score.
    async fn get_state(&self, session_id: SessionId) -> Result<GameStateResponse, ClientError>;

    /// Submit the answer to the current question.
    async fn submit_answer(&self, request: &AnswerRequest) -> Result<AnswerResponse, ClientError>;

    /// Fetch the service's summary of the session.
    async fn get_summary(&self, session_id: SessionId) -> Result<RemoteSummary, ClientError>;
}
