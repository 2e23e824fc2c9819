//! Orchestrator tunables.

use std::time::Duration;

use guesser_timer::DEFAULT_TICK_INTERVAL;

/// Delay between revealing an answer and offering the next question.
pub const DEFAULT_FEEDBACK_GRACE: Duration = Duration::from_millis(1800);

/// Output volume applied when the orchestrator is built.
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Capacity of the game event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Timing and capacity settings of a [`GameOrchestrator`](crate::GameOrchestrator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrchestratorConfig {
    /// Countdown tick interval.
    pub tick_interval: Duration,
    /// Delay before "ready to advance" is raised after an answer.
    pub feedback_grace: Duration,
    /// Initial playback volume in `[0, 1]`.
    pub default_volume: f32,
    /// Events buffered per subscriber before the slowest one lags.
    pub event_buffer: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            feedback_grace: DEFAULT_FEEDBACK_GRACE,
            default_volume: DEFAULT_VOLUME,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}
