//! Startup and runtime errors for the terminal client.

use guesser_core::error::ClientError;
use guesser_session::GameError;
use thiserror::Error;

/// Errors that end the program.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be built.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// The orchestrator failed to start.
    #[error("game error: {0}")]
    Game(#[from] GameError),

    /// Terminal I/O failed.
    #[error("terminal error: {0}")]
    Io(#[from] std::io::Error),
}
