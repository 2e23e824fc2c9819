//! Test session clients — mock `SessionClient` implementations for tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use guesser_core::answer::{AnswerChoice, AnswerRequest, AnswerResponse};
use guesser_core::client::SessionClient;
use guesser_core::error::ClientError;
use guesser_core::question::Question;
use guesser_core::session::{
    GameSettings, GameStateResponse, RemoteSummary, SessionCreated, SessionId,
};

/// Points awarded per correct answer by the scripted service.
const POINTS_PER_CORRECT: u32 = 10;

#[derive(Debug, Default)]
struct Script {
    session_id: Option<SessionId>,
    current_index: usize,
    score: u32,
    correct: usize,
    create_calls: usize,
    state_calls: usize,
    created: Vec<SessionId>,
    answers: Vec<AnswerRequest>,
    state_failing: bool,
}

/// A session client that plays a fixed list of questions and records every
/// call. Scores ten points per correct answer.
///
/// Optional delays let tests hold a request in flight while other events
/// arrive.
#[derive(Debug)]
pub struct ScriptedSessionClient {
    questions: Vec<Question>,
    create_delay: Option<Duration>,
    answer_delay: Option<Duration>,
    state_delay: Option<Duration>,
    fail_answers: bool,
    reported_scores: Vec<(usize, u32)>,
    script: Mutex<Script>,
}

impl ScriptedSessionClient {
    /// Create a client serving `questions` in order.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            create_delay: None,
            answer_delay: None,
            state_delay: None,
            fail_answers: false,
            reported_scores: Vec::new(),
            script: Mutex::new(Script::default()),
        }
    }

    /// Delay every `create_session` response.
    #[must_use]
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    /// Delay every `submit_answer` response.
    #[must_use]
    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = Some(delay);
        self
    }

    /// Delay every `get_state` response.
    #[must_use]
    pub fn with_state_delay(mut self, delay: Duration) -> Self {
        self.state_delay = Some(delay);
        self
    }

    /// Reject every `submit_answer` with a server error.
    #[must_use]
    pub fn with_failing_answers(mut self) -> Self {
        self.fail_answers = true;
        self
    }

    /// Report `score` in the response to the answer for `question_index`,
    /// whatever was earned.
    #[must_use]
    pub fn with_reported_score(mut self, question_index: usize, score: u32) -> Self {
        self.reported_scores.push((question_index, score));
        self
    }

    /// Make `get_state` fail with a transport error until switched back.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fail_state_requests(&self, failing: bool) {
        self.script.lock().unwrap().state_failing = failing;
    }

    /// Number of `create_session` calls received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn create_calls(&self) -> usize {
        self.script.lock().unwrap().create_calls
    }

    /// Number of `get_state` calls received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn state_calls(&self) -> usize {
        self.script.lock().unwrap().state_calls
    }

    /// Identifiers of every session created so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn created_sessions(&self) -> Vec<SessionId> {
        self.script.lock().unwrap().created.clone()
    }

    /// Every answer submitted, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn answers(&self) -> Vec<AnswerRequest> {
        self.script.lock().unwrap().answers.clone()
    }

    fn state_response(&self, script: &Script) -> Result<GameStateResponse, ClientError> {
        let question = self
            .questions
            .get(script.current_index)
            .cloned()
            .ok_or_else(|| ClientError::NotFound("no current question".to_owned()))?;
        Ok(GameStateResponse {
            current_index: script.current_index,
            total_questions: self.questions.len(),
            question,
            score: script.score,
        })
    }

    fn check_session(script: &Script, session_id: SessionId) -> Result<(), ClientError> {
        if script.session_id == Some(session_id) {
            Ok(())
        } else {
            Err(ClientError::NotFound(session_id.to_string()))
        }
    }
}

#[async_trait]
impl SessionClient for ScriptedSessionClient {
    async fn create_session(
        &self,
        _settings: &GameSettings,
    ) -> Result<SessionCreated, ClientError> {
        self.script.lock().unwrap().create_calls += 1;
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        let session_id = SessionId::new_random();
        let mut script = self.script.lock().unwrap();
        script.session_id = Some(session_id);
        script.current_index = 0;
        script.score = 0;
        script.correct = 0;
        script.created.push(session_id);
        Ok(SessionCreated {
            session_id,
            total_questions: self.questions.len(),
            started_at_epoch_seconds: 0.0,
        })
    }

    async fn start_session(&self, session_id: SessionId) -> Result<GameStateResponse, ClientError> {
        let script = self.script.lock().unwrap();
        Self::check_session(&script, session_id)?;
        self.state_response(&script)
    }

    async fn get_state(&self, session_id: SessionId) -> Result<GameStateResponse, ClientError> {
        self.script.lock().unwrap().state_calls += 1;
        if let Some(delay) = self.state_delay {
            tokio::time::sleep(delay).await;
        }
        let script = self.script.lock().unwrap();
        if script.state_failing {
            return Err(ClientError::Transport("state unavailable".to_owned()));
        }
        Self::check_session(&script, session_id)?;
        self.state_response(&script)
    }

    async fn submit_answer(&self, request: &AnswerRequest) -> Result<AnswerResponse, ClientError> {
        self.script.lock().unwrap().answers.push(request.clone());
        if let Some(delay) = self.answer_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_answers {
            return Err(ClientError::Rejected {
                status: 500,
                message: "answer store unavailable".to_owned(),
            });
        }

        let mut script = self.script.lock().unwrap();
        Self::check_session(&script, request.session_id)?;
        if request.question_index != script.current_index {
            return Err(ClientError::NotFound("invalid answer".to_owned()));
        }
        let question = self
            .questions
            .get(request.question_index)
            .ok_or_else(|| ClientError::NotFound("invalid answer".to_owned()))?;

        let correct = match request.choice {
            AnswerChoice::Timeout => false,
            AnswerChoice::Option(index) => index == question.correct_option_index,
        };
        let points_earned = if correct { POINTS_PER_CORRECT } else { 0 };
        script.score += points_earned;
        if let Some(&(_, reported)) = self
            .reported_scores
            .iter()
            .find(|(index, _)| *index == request.question_index)
        {
            script.score = reported;
        }
        if correct {
            script.correct += 1;
        }
        script.current_index += 1;
        let game_complete = script.current_index >= self.questions.len();

        Ok(AnswerResponse {
            correct,
            correct_option_index: question.correct_option_index,
            score: script.score,
            points_earned,
            next_question_index: (!game_complete).then_some(script.current_index),
            game_complete,
        })
    }

    async fn get_summary(&self, session_id: SessionId) -> Result<RemoteSummary, ClientError> {
        let script = self.script.lock().unwrap();
        Self::check_session(&script, session_id)?;
        let total = self.questions.len();
        #[allow(clippy::cast_precision_loss)]
        let accuracy = if total == 0 {
            0.0
        } else {
            script.correct as f64 / total as f64 * 100.0
        };
        Ok(RemoteSummary {
            session_id,
            score: script.score,
            total_questions: total,
            accuracy,
        })
    }
}

/// A session client that always fails with a transport error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingSessionClient;

#[async_trait]
impl SessionClient for FailingSessionClient {
    async fn create_session(
        &self,
        _settings: &GameSettings,
    ) -> Result<SessionCreated, ClientError> {
        Err(ClientError::Transport("connection refused".into()))
    }

    async fn start_session(
        &self,
        _session_id: SessionId,
    ) -> Result<GameStateResponse, ClientError> {
        Err(ClientError::Transport("connection refused".into()))
    }

    async fn get_state(&self, _session_id: SessionId) -> Result<GameStateResponse, ClientError> {
        Err(ClientError::Transport("connection refused".into()))
    }

    async fn submit_answer(&self, _request: &AnswerRequest) -> Result<AnswerResponse, ClientError> {
        Err(ClientError::Transport("connection refused".into()))
    }

    async fn get_summary(&self, _session_id: SessionId) -> Result<RemoteSummary, ClientError> {
        Err(ClientError::Transport("connection refused".into()))
    }
}
