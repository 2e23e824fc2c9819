//! Music Guesser — game session orchestrator.
//!
//! Coordinates the remote session service, the per-question countdown and
//! the audio device into one question lifecycle with exactly-once scoring.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;

pub use application::orchestrator::GameOrchestrator;
pub use config::OrchestratorConfig;
pub use domain::events::GameEvent;
pub use domain::phase::{QuestionPhase, SessionPhase};
pub use domain::snapshot::{Feedback, GameSnapshot, QuestionView};
pub use error::GameError;
