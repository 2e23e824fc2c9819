//! Mutable orchestrator state, guarded by a single lock.

use guesser_core::answer::{AnswerChoice, AnswerOutcome, AnsweredRecord};
use guesser_core::question::Question;
use guesser_core::session::{GameSettings, Session};
use tokio::task::JoinHandle;

use crate::domain::phase::{QuestionPhase, SessionPhase};

/// Background tasks bound to the displayed question.
#[derive(Debug, Default)]
pub(crate) struct QuestionTasks {
    pub gate: Option<JoinHandle<()>>,
    pub feedback: Option<JoinHandle<()>>,
    pub prefetch: Option<JoinHandle<()>>,
}

impl QuestionTasks {
    pub fn abort_all(&mut self) {
        for task in [
            self.gate.take(),
            self.feedback.take(),
            self.prefetch.take(),
        ]
        .into_iter()
        .flatten()
        {
            task.abort();
        }
    }
}

/// A question fetched ahead of display, tagged with its index.
#[derive(Debug, Clone)]
pub(crate) struct LiveQuestion {
    pub index: usize,
    pub question: Question,
}

#[derive(Debug, Default)]
pub(crate) struct GameState {
    pub phase: SessionPhase,
    /// Bumped whenever a session is discarded; late completions carrying an
    /// older epoch are dropped.
    pub epoch: u64,
    pub settings: Option<GameSettings>,
    pub session: Option<Session>,
    /// Pinned for display; never replaced by a prefetch.
    pub displayed: Option<Question>,
    pub live: Option<LiveQuestion>,
    pub question_phase: Option<QuestionPhase>,
    pub selected: Option<AnswerChoice>,
    pub answer_locked: bool,
    pub outcome: Option<AnswerOutcome>,
    pub ready_to_advance: bool,
    pub history: Vec<AnsweredRecord>,
    pub loading: bool,
    pub error: Option<String>,
    pub tasks: QuestionTasks,
}

impl GameState {
    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current_index)
    }

    pub fn score(&self) -> u32 {
        self.session.as_ref().map_or(0, |s| s.score)
    }

    /// Whether a completion tagged `(epoch, index)` still applies.
    pub fn is_current(&self, epoch: u64, index: usize) -> bool {
        self.epoch == epoch && self.current_index() == Some(index)
    }

    /// Clears per-question flags and stops the question's tasks.
    pub fn clear_question(&mut self) {
        self.tasks.abort_all();
        self.selected = None;
        self.answer_locked = false;
        self.outcome = None;
        self.ready_to_advance = false;
    }

    /// Drops the session and invalidates everything still in flight.
    /// The last settings survive for a restart.
    pub fn discard(&mut self) {
        self.clear_question();
        self.epoch += 1;
        self.phase = SessionPhase::Uninitialized;
        self.session = None;
        self.displayed = None;
        self.live = None;
        self.question_phase = None;
        self.history.clear();
        self.loading = false;
        self.error = None;
    }
}
