//! Events broadcast to presentation layers.

use guesser_core::answer::AnswerOutcome;
use guesser_core::session::SessionId;
use guesser_core::summary::GameSummary;

/// Something the player should see happened.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A session was created and its first question received.
    SessionStarted {
        session_id: SessionId,
        total_questions: usize,
    },
    /// A question was pinned for display; its clip is loading.
    QuestionPresented { question_index: usize },
    /// The countdown started. `with_audio` is false when the clip failed or
    /// was missing and the question runs on the timer alone.
    QuestionArmed {
        question_index: usize,
        with_audio: bool,
    },
    /// The service scored the displayed question.
    AnswerResolved(AnswerOutcome),
    /// The feedback grace period elapsed.
    ReadyToAdvance { question_index: usize },
    /// The last question was answered.
    GameCompleted(GameSummary),
    /// A session-level failure halted the game.
    SessionFailed { message: String },
}
