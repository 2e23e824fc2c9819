//! Answer choices, service responses and the per-question history.

use std::fmt;

use serde::Serialize;

use crate::session::SessionId;

/// Option index the service interprets as "no answer given in time".
pub const TIMEOUT_SENTINEL: i64 = -1;

/// What the player did with a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnswerChoice {
    /// The player picked the option at this index.
    Option(usize),
    /// The countdown expired first.
    Timeout,
}

impl AnswerChoice {
    /// Index sent to the service, [`TIMEOUT_SENTINEL`] for a timeout.
    #[must_use]
    pub fn wire_index(self) -> i64 {
        match self {
            Self::Option(index) => i64::try_from(index).unwrap_or(i64::MAX),
            Self::Timeout => TIMEOUT_SENTINEL,
        }
    }

    /// Whether this choice represents an expired countdown.
    #[must_use]
    pub fn is_timeout(self) -> bool {
        matches!(self, Self::Timeout)
    }
}

/// Submission of one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRequest {
    pub session_id: SessionId,
    pub question_index: usize,
    pub choice: AnswerChoice,
}

/// The service's verdict on a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResponse {
    pub correct: bool,
    pub correct_option_index: usize,
    /// Authoritative running score after this answer.
    pub score: u32,
    pub points_earned: u32,
    pub next_question_index: Option<usize>,
    pub game_complete: bool,
}

/// Result of resolving one question; produced exactly once per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub question_index: usize,
    pub correct: bool,
    pub score_after: u32,
    pub points_earned: u32,
    pub correct_option_index: usize,
    pub game_complete: bool,
    pub next_index: Option<usize>,
}

/// The player's side of an answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PlayerAnswer {
    /// Label of the option the player picked.
    Picked(String),
    /// No answer before the countdown expired.
    Timeout,
}

impl fmt::Display for PlayerAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Picked(label) => f.write_str(label),
            Self::Timeout => f.write_str("timeout"),
        }
    }
}

/// One entry of the append-only answer history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnsweredRecord {
    /// Song identifier of the question.
    pub question_id: i64,
    pub player_answer: PlayerAnswer,
    pub correct_label: String,
    pub correct: bool,
}
