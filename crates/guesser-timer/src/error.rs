//! Timer error types.

use std::time::Duration;

use thiserror::Error;

/// Misconfiguration of a [`CountdownTimer`](crate::CountdownTimer).
///
/// These indicate a programming defect, never a player-facing condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// The tick interval rounds down to zero milliseconds.
    #[error("tick interval must be at least one millisecond, got {0:?}")]
    ZeroTickInterval(Duration),
}
