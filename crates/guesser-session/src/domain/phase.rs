//! Session and question lifecycles.

/// Lifecycle of the session as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No session; the next `create_session` starts one.
    #[default]
    Uninitialized,
    /// A create request is in flight.
    Creating,
    /// Questions are being played.
    InProgress,
    /// The last question was answered.
    Completed,
}

impl SessionPhase {
    /// Whether a session is being created or played.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Creating | Self::InProgress)
    }
}

/// Lifecycle of the displayed question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    /// Displayed; the clip is still loading.
    AwaitingAudio,
    /// Countdown running; answers accepted.
    Armed,
    /// An answer is locked in and awaiting the service.
    Submitted,
    /// The outcome is known and shown.
    Revealed,
    /// Moving on; the next question is being fetched.
    Advancing,
}

impl QuestionPhase {
    /// Whether the player can still answer.
    #[must_use]
    pub fn accepts_answers(self) -> bool {
        matches!(self, Self::AwaitingAudio | Self::Armed)
    }
}
