//! Presentation view-model.

use guesser_core::answer::{AnswerChoice, AnswerOutcome};
use guesser_core::question::Question;
use guesser_core::session::SessionId;
use guesser_playback::AudioState;
use guesser_timer::TimerState;

use super::phase::{QuestionPhase, SessionPhase};

/// The displayed question as the player sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub song_id: i64,
    /// Option labels in display order.
    pub options: Vec<String>,
    /// Blurred art while open, clear art once revealed.
    pub cover_url: String,
    /// Hex accent color without `#`.
    pub accent_color: String,
    pub artists: String,
    pub time_limit_seconds: u32,
}

impl QuestionView {
    pub(crate) fn new(question: &Question, revealed: bool) -> Self {
        let cover_url = if revealed {
            &question.clear_cover_url
        } else {
            &question.blurred_cover_url
        };
        Self {
            song_id: question.song_id,
            options: question.options.iter().map(|o| o.label.clone()).collect(),
            cover_url: cover_url.clone(),
            accent_color: question.accent_color_or_default().to_owned(),
            artists: question.artists.clone(),
            time_limit_seconds: question.time_limit_seconds,
        }
    }
}

/// Scoring feedback for a resolved question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    pub correct: bool,
    pub points_earned: u32,
    pub correct_option_index: usize,
}

impl From<&AnswerOutcome> for Feedback {
    fn from(outcome: &AnswerOutcome) -> Self {
        Self {
            correct: outcome.correct,
            points_earned: outcome.points_earned,
            correct_option_index: outcome.correct_option_index,
        }
    }
}

/// Everything a front end needs to render one frame of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub session_phase: SessionPhase,
    pub question_phase: Option<QuestionPhase>,
    pub session_id: Option<SessionId>,
    pub question_index: Option<usize>,
    pub total_questions: usize,
    pub question: Option<QuestionView>,
    pub timer: TimerState,
    pub audio: AudioState,
    pub selected: Option<AnswerChoice>,
    pub submitted: bool,
    pub feedback: Option<Feedback>,
    pub ready_to_advance: bool,
    pub score: u32,
    /// Whole-screen loading while a session is being created.
    pub loading: bool,
    pub error: Option<String>,
}

impl GameSnapshot {
    /// Whether the displayed question is waiting for its clip.
    #[must_use]
    pub fn is_question_loading(&self) -> bool {
        self.question_phase == Some(QuestionPhase::AwaitingAudio)
    }
}
