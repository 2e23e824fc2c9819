//! The game session orchestrator.
//!
//! Three things complete asynchronously for every question: the service's
//! responses, the countdown and the player. All of them funnel through one
//! `parking_lot::Mutex<GameState>` that is never held across an `.await`.
//! Every late completion carries the `(epoch, question_index)` it was started
//! for and is dropped if either has moved on.

use std::sync::{Arc, Weak};

use guesser_core::answer::{
    AnswerChoice, AnswerOutcome, AnswerRequest, AnswerResponse, AnsweredRecord, PlayerAnswer,
};
use guesser_core::client::SessionClient;
use guesser_core::clock::Clock;
use guesser_core::error::ClientError;
use guesser_core::question::Question;
use guesser_core::session::{GameSettings, RemoteSummary, Session, SessionId};
use guesser_core::summary::GameSummary;
use guesser_playback::{AudioDevice, AudioState, PlaybackController};
use guesser_timer::{CountdownTimer, TimerState};
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, instrument, warn};

use super::gate::{Readiness, await_readiness};
use super::state::{GameState, LiveQuestion};
use crate::config::OrchestratorConfig;
use crate::domain::events::GameEvent;
use crate::domain::phase::{QuestionPhase, SessionPhase};
use crate::domain::snapshot::{Feedback, GameSnapshot, QuestionView};
use crate::error::GameError;

struct Inner {
    client: Arc<dyn SessionClient>,
    clock: Arc<dyn Clock>,
    playback: PlaybackController,
    timer: CountdownTimer,
    config: OrchestratorConfig,
    state: Mutex<GameState>,
    events: broadcast::Sender<GameEvent>,
}

/// Drives one game at a time from creation to summary.
///
/// Cloning is cheap; clones share the same game.
#[derive(Clone)]
pub struct GameOrchestrator {
    inner: Arc<Inner>,
}

impl GameOrchestrator {
    /// Builds an orchestrator with no session. The configured default volume
    /// is applied to `device` immediately.
    ///
    /// # Errors
    ///
    /// Returns `GameError::TimerInternal` if the tick interval is unusable.
    pub fn new(
        client: Arc<dyn SessionClient>,
        device: Arc<dyn AudioDevice>,
        clock: Arc<dyn Clock>,
        config: OrchestratorConfig,
    ) -> Result<Self, GameError> {
        let timer = CountdownTimer::new(config.tick_interval)?;
        let playback = PlaybackController::new(device);
        playback.set_volume(config.default_volume);
        let (events, _rx) = broadcast::channel(config.event_buffer.max(1));
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                clock,
                playback,
                timer,
                config,
                state: Mutex::new(GameState::default()),
                events,
            }),
        })
    }

    /// Creates a session and presents its first question.
    ///
    /// Returns `Ok(None)` without contacting the service when a session is
    /// already being created or played, and when the game was exited while
    /// the request was in flight.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SessionCreation` if the service fails to create or
    /// start the session. The orchestrator is back to `Uninitialized`.
    #[instrument(
        skip(self, settings),
        fields(song_count = settings.song_count, option_count = settings.option_count)
    )]
    pub async fn create_session(
        &self,
        settings: GameSettings,
    ) -> Result<Option<SessionId>, GameError> {
        let inner = &self.inner;
        let epoch = {
            let mut state = inner.state.lock();
            if state.phase.is_active() {
                debug!(phase = ?state.phase, "session already active, ignoring create");
                return Ok(None);
            }
            if state.phase == SessionPhase::Completed {
                inner.halt_media();
                state.discard();
            }
            state.phase = SessionPhase::Creating;
            state.loading = true;
            state.error = None;
            state.settings = Some(settings.clone());
            state.epoch
        };

        let started = async {
            let created = inner.client.create_session(&settings).await?;
            let first = inner.client.start_session(created.session_id).await?;
            Ok::<_, ClientError>((created, first))
        }
        .await;
        let (created, first) = match started {
            Ok(started) => started,
            Err(error) => return inner.fail_creation(epoch, error),
        };

        let mut state = inner.state.lock();
        if state.epoch != epoch || state.phase != SessionPhase::Creating {
            debug!(epoch, "dropping session created after exit");
            return Ok(None);
        }
        let mut session = Session::from_created(&created, inner.clock.now());
        session.current_index = first.current_index;
        if session.total_questions == 0 {
            session.total_questions = first.total_questions;
        }
        let session_id = session.session_id;
        let total_questions = session.total_questions;
        let index = session.current_index;

        state.clear_question();
        state.history.clear();
        state.session = Some(session);
        state.phase = SessionPhase::InProgress;
        state.loading = false;
        state.live = Some(LiveQuestion {
            index,
            question: first.question.clone(),
        });
        state.displayed = Some(first.question);
        info!(%session_id, total_questions, epoch, "game session started");
        inner.emit(GameEvent::SessionStarted {
            session_id,
            total_questions,
        });
        inner.present(&mut state, epoch, index);
        Ok(Some(session_id))
    }

    /// Resolves the displayed question with the player's choice, or with
    /// [`AnswerChoice::Timeout`].
    ///
    /// Only the first resolution of a question reaches the service; later
    /// calls, calls without a displayed question and out-of-range options
    /// return `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `GameError::AnswerSubmission` if the service rejects the
    /// answer. The question stays locked until the player exits or restarts.
    #[instrument(skip(self))]
    pub async fn submit_answer(
        &self,
        choice: AnswerChoice,
    ) -> Result<Option<AnswerOutcome>, GameError> {
        self.inner.resolve(None, choice).await
    }

    /// Moves from a resolved question to the next one.
    ///
    /// Returns the new question index, or `Ok(None)` if the displayed
    /// question has no outcome yet, the game is over, an advance is already
    /// under way or the session changed while the question was being fetched.
    ///
    /// # Errors
    ///
    /// Returns `GameError::QuestionFetch` if the next question was not
    /// prefetched and fetching it fails. The resolved question stays on
    /// display and the advance can be retried.
    #[instrument(skip(self))]
    pub async fn advance_to_next_question(&self) -> Result<Option<usize>, GameError> {
        let inner = &self.inner;
        let (epoch, index, session_id, prefetched) = {
            let mut state = inner.state.lock();
            if state.phase != SessionPhase::InProgress
                || state.outcome.is_none()
                || state.question_phase != Some(QuestionPhase::Revealed)
            {
                debug!(phase = ?state.phase, "nothing to advance from");
                return Ok(None);
            }
            let Some((index, session_id)) = state
                .session
                .as_ref()
                .map(|s| (s.current_index, s.session_id))
            else {
                return Ok(None);
            };
            let prefetched = state
                .live
                .as_ref()
                .filter(|live| live.index == index + 1)
                .map(|live| live.question.clone());
            state.question_phase = Some(QuestionPhase::Advancing);
            (state.epoch, index, session_id, prefetched)
        };
        let next_index = index + 1;

        let question = match prefetched {
            Some(question) => question,
            None => {
                debug!(question_index = next_index, "next question not prefetched");
                let fetched = inner.client.get_state(session_id).await;
                match fetched {
                    Ok(next) => {
                        if next.current_index != next_index {
                            warn!(
                                question_index = next_index,
                                reported = next.current_index,
                                "service reports a different current question"
                            );
                        }
                        next.question
                    }
                    Err(error) => {
                        let mut state = inner.state.lock();
                        if !state.is_current(epoch, index)
                            || state.question_phase != Some(QuestionPhase::Advancing)
                        {
                            return Ok(None);
                        }
                        warn!(question_index = next_index, %error, "failed to fetch next question");
                        state.question_phase = Some(QuestionPhase::Revealed);
                        let error = GameError::QuestionFetch(error);
                        inner.record_failure(&mut state, &error);
                        return Err(error);
                    }
                }
            }
        };

        let mut state = inner.state.lock();
        if !state.is_current(epoch, index)
            || state.question_phase != Some(QuestionPhase::Advancing)
        {
            return Ok(None);
        }
        let Some(session) = state.session.as_mut() else {
            return Ok(None);
        };
        session.current_index = next_index;
        state.clear_question();
        inner.halt_media();
        state.error = None;
        state.live = Some(LiveQuestion {
            index: next_index,
            question: question.clone(),
        });
        state.displayed = Some(question);
        info!(question_index = next_index, "advanced to next question");
        inner.present(&mut state, epoch, next_index);
        Ok(Some(next_index))
    }

    /// Abandons the current session. Audio stops, the countdown resets and
    /// every response still in flight is discarded.
    #[instrument(skip(self))]
    pub fn exit_session(&self) {
        let mut state = self.inner.state.lock();
        let session_id = state.session.as_ref().map(|s| s.session_id);
        self.inner.halt_media();
        state.discard();
        info!(?session_id, epoch = state.epoch, "session exited");
    }

    /// Exits and creates a new session with the last settings.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SessionCreation` if the new session fails.
    pub async fn restart(&self) -> Result<Option<SessionId>, GameError> {
        let settings = self.inner.state.lock().settings.clone().unwrap_or_default();
        self.exit_session();
        self.create_session(settings).await
    }

    /// Summary of the questions answered so far.
    #[must_use]
    pub fn summary(&self) -> GameSummary {
        let state = self.inner.state.lock();
        GameSummary::from_history(state.score(), &state.history)
    }

    /// The service's own summary of the current session, for diagnostics.
    /// Returns `Ok(None)` without a session.
    ///
    /// # Errors
    ///
    /// Returns the client's error if the request fails.
    pub async fn fetch_remote_summary(&self) -> Result<Option<RemoteSummary>, ClientError> {
        let session_id = self
            .inner
            .state
            .lock()
            .session
            .as_ref()
            .map(|s| s.session_id);
        match session_id {
            Some(session_id) => self.inner.client.get_summary(session_id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Answer history in question order.
    #[must_use]
    pub fn history(&self) -> Vec<AnsweredRecord> {
        self.inner.state.lock().history.clone()
    }

    /// Current session record, if any.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.state.lock().session.clone()
    }

    /// Current session phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.inner.state.lock().phase
    }

    /// Sets the playback volume, clamped to `[0, 1]`.
    pub fn set_volume(&self, volume: f32) {
        self.inner.playback.set_volume(volume);
    }

    /// Current playback volume.
    #[must_use]
    pub fn volume(&self) -> f32 {
        self.inner.playback.volume()
    }

    /// Everything needed to render the game right now.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let state = self.inner.state.lock();
        let revealed = state.outcome.is_some();
        GameSnapshot {
            session_phase: state.phase,
            question_phase: state.question_phase,
            session_id: state.session.as_ref().map(|s| s.session_id),
            question_index: state.current_index(),
            total_questions: state.session.as_ref().map_or(0, |s| s.total_questions),
            question: state
                .displayed
                .as_ref()
                .map(|q| QuestionView::new(q, revealed)),
            timer: self.inner.timer.state(),
            audio: self.inner.playback.state(),
            selected: state.selected,
            submitted: state.answer_locked,
            feedback: state.outcome.as_ref().map(Feedback::from),
            ready_to_advance: state.ready_to_advance,
            score: state.score(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Subscribes to game events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.inner.events.subscribe()
    }

    /// Subscribes to countdown ticks.
    #[must_use]
    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.inner.timer.subscribe()
    }

    /// Subscribes to playback state changes.
    #[must_use]
    pub fn subscribe_audio(&self) -> watch::Receiver<AudioState> {
        self.inner.playback.subscribe()
    }
}

impl Inner {
    fn emit(&self, event: GameEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn halt_media(&self) {
        self.playback.stop();
        self.timer.reset();
    }

    fn record_failure(&self, state: &mut GameState, error: &GameError) {
        let message = error.to_string();
        state.error = Some(message.clone());
        state.loading = false;
        self.emit(GameEvent::SessionFailed { message });
    }

    fn fail_creation(
        &self,
        epoch: u64,
        error: ClientError,
    ) -> Result<Option<SessionId>, GameError> {
        let mut state = self.state.lock();
        if state.epoch != epoch || state.phase != SessionPhase::Creating {
            debug!(epoch, %error, "dropping creation failure after exit");
            return Ok(None);
        }
        warn!(%error, "failed to create game session");
        state.phase = SessionPhase::Uninitialized;
        let error = GameError::SessionCreation(error);
        self.record_failure(&mut state, &error);
        Err(error)
    }

    /// Binds the displayed question's clip and waits for it in the
    /// background. A question without a clip is armed on the spot.
    fn present(self: &Arc<Self>, state: &mut GameState, epoch: u64, index: usize) {
        let Some(audio_url) = state.displayed.as_ref().map(|q| q.audio_url.clone()) else {
            return;
        };
        state.question_phase = Some(QuestionPhase::AwaitingAudio);
        self.playback.set_source(&audio_url);
        self.emit(GameEvent::QuestionPresented {
            question_index: index,
        });

        if audio_url.is_empty() {
            debug!(question_index = index, "question has no clip");
            self.arm(state, epoch, index, false);
            return;
        }

        let weak = Arc::downgrade(self);
        let audio = self.playback.subscribe();
        state.tasks.gate = Some(tokio::spawn(async move {
            let Some(readiness) = await_readiness(audio).await else {
                return;
            };
            if let Some(inner) = weak.upgrade() {
                inner.on_ready(epoch, index, readiness).await;
            }
        }));
    }

    async fn on_ready(self: &Arc<Self>, epoch: u64, index: usize, readiness: Readiness) {
        let with_audio = match readiness {
            Readiness::Playable => true,
            Readiness::Silent(error) => {
                let error = GameError::AudioLoad(error);
                warn!(question_index = index, %error, "arming without audio");
                false
            }
        };
        let armed = {
            let mut state = self.state.lock();
            self.arm(&mut state, epoch, index, with_audio)
        };
        if armed && with_audio {
            self.playback.play().await;
        }
    }

    /// Starts the countdown for the displayed question. Returns whether this
    /// call armed it.
    fn arm(
        self: &Arc<Self>,
        state: &mut GameState,
        epoch: u64,
        index: usize,
        with_audio: bool,
    ) -> bool {
        if state.phase != SessionPhase::InProgress
            || !state.is_current(epoch, index)
            || state.question_phase != Some(QuestionPhase::AwaitingAudio)
        {
            return false;
        }
        let Some(time_limit) = state.displayed.as_ref().map(Question::time_limit) else {
            return false;
        };
        state.question_phase = Some(QuestionPhase::Armed);

        let weak: Weak<Self> = Arc::downgrade(self);
        self.timer.reset();
        self.timer.start(time_limit, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            tokio::spawn(async move {
                if let Err(error) = inner
                    .resolve(Some((epoch, index)), AnswerChoice::Timeout)
                    .await
                {
                    debug!(%error, "timeout submission failed");
                }
            });
        });
        info!(
            question_index = index,
            time_limit_secs = time_limit.as_secs(),
            with_audio,
            "question armed"
        );
        self.emit(GameEvent::QuestionArmed {
            question_index: index,
            with_audio,
        });
        true
    }

    /// The single resolution path for clicks and countdown expiry.
    /// `ticket` pins the resolution to an epoch and question.
    async fn resolve(
        self: &Arc<Self>,
        ticket: Option<(u64, usize)>,
        choice: AnswerChoice,
    ) -> Result<Option<AnswerOutcome>, GameError> {
        let (epoch, request, question) = {
            let mut state = self.state.lock();
            if state.phase != SessionPhase::InProgress {
                return Ok(None);
            }
            let Some((session_id, index)) = state
                .session
                .as_ref()
                .map(|s| (s.session_id, s.current_index))
            else {
                return Ok(None);
            };
            if let Some((epoch, ticket_index)) = ticket {
                if !state.is_current(epoch, ticket_index) {
                    debug!(epoch, question_index = ticket_index, "dropping stale resolution");
                    return Ok(None);
                }
            }
            if state.answer_locked
                || !state
                    .question_phase
                    .is_some_and(QuestionPhase::accepts_answers)
            {
                return Ok(None);
            }
            let Some(question) = state.displayed.clone() else {
                return Ok(None);
            };
            if let AnswerChoice::Option(option) = choice {
                if question.option(option).is_none() {
                    debug!(option, "ignoring out-of-range option");
                    return Ok(None);
                }
            }

            state.answer_locked = true;
            state.selected = Some(choice);
            state.question_phase = Some(QuestionPhase::Submitted);
            self.timer.pause();
            if choice.is_timeout() {
                self.playback.pause();
            }
            let request = AnswerRequest {
                session_id,
                question_index: index,
                choice,
            };
            (state.epoch, request, question)
        };

        let response = self.client.submit_answer(&request).await;

        let index = request.question_index;
        let mut state = self.state.lock();
        if !state.is_current(epoch, index) {
            debug!(epoch, question_index = index, "dropping answer for a discarded question");
            return Ok(None);
        }
        let response = match response {
            Ok(response) => response,
            Err(error) => {
                warn!(question_index = index, %error, "answer submission failed");
                let error = GameError::AnswerSubmission(error);
                self.record_failure(&mut state, &error);
                return Err(error);
            }
        };
        let Some(outcome) = Self::record_outcome(&mut state, &question, &request, &response)
        else {
            return Ok(None);
        };

        info!(
            question_index = index,
            correct = outcome.correct,
            score = outcome.score_after,
            "answer resolved"
        );
        self.emit(GameEvent::AnswerResolved(outcome.clone()));
        if outcome.game_complete {
            state.phase = SessionPhase::Completed;
            let summary = GameSummary::from_history(outcome.score_after, &state.history);
            info!(
                score = summary.score,
                correct_answers = summary.correct_answers,
                accuracy = summary.accuracy,
                "game completed"
            );
            self.emit(GameEvent::GameCompleted(summary));
        } else {
            self.schedule_feedback(&mut state, epoch, index);
            self.prefetch(&mut state, epoch, index, request.session_id);
        }
        Ok(Some(outcome))
    }

    fn record_outcome(
        state: &mut GameState,
        question: &Question,
        request: &AnswerRequest,
        response: &AnswerResponse,
    ) -> Option<AnswerOutcome> {
        let timed_out = request.choice.is_timeout();
        let correct = response.correct && !timed_out;
        let session = state.session.as_mut()?;
        if response.score < session.score {
            warn!(
                previous = session.score,
                reported = response.score,
                "service lowered the score, keeping the previous value"
            );
        }
        session.score = session.score.max(response.score);
        if correct {
            session.correct_count += 1;
        }
        let score_after = session.score;

        let player_answer = match request.choice {
            AnswerChoice::Option(option) => PlayerAnswer::Picked(
                question
                    .option(option)
                    .map(|o| o.label.clone())
                    .unwrap_or_default(),
            ),
            AnswerChoice::Timeout => PlayerAnswer::Timeout,
        };
        let correct_label = question
            .option(response.correct_option_index)
            .or_else(|| question.correct_option())
            .map(|o| o.label.clone())
            .unwrap_or_default();
        state.history.push(AnsweredRecord {
            question_id: question.song_id,
            player_answer,
            correct_label,
            correct,
        });

        let outcome = AnswerOutcome {
            question_index: request.question_index,
            correct,
            score_after,
            points_earned: if timed_out { 0 } else { response.points_earned },
            correct_option_index: response.correct_option_index,
            game_complete: response.game_complete,
            next_index: response.next_question_index,
        };
        state.outcome = Some(outcome.clone());
        state.question_phase = Some(QuestionPhase::Revealed);
        Some(outcome)
    }

    fn schedule_feedback(self: &Arc<Self>, state: &mut GameState, epoch: u64, index: usize) {
        let weak = Arc::downgrade(self);
        let grace = self.config.feedback_grace;
        state.tasks.feedback = Some(tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.state.lock();
            if state.is_current(epoch, index) && state.outcome.is_some() {
                state.ready_to_advance = true;
                inner.emit(GameEvent::ReadyToAdvance {
                    question_index: index,
                });
            }
        }));
    }

    /// Fetches the question after `index` into the live slot. The displayed
    /// question is left alone.
    fn prefetch(
        self: &Arc<Self>,
        state: &mut GameState,
        epoch: u64,
        index: usize,
        session_id: SessionId,
    ) {
        let weak = Arc::downgrade(self);
        let client = Arc::clone(&self.client);
        state.tasks.prefetch = Some(tokio::spawn(async move {
            let fetched = client.get_state(session_id).await;
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.state.lock();
            if !state.is_current(epoch, index) {
                return;
            }
            match fetched {
                Ok(next) if next.current_index > index => {
                    debug!(question_index = next.current_index, "next question prefetched");
                    state.live = Some(LiveQuestion {
                        index: next.current_index,
                        question: next.question,
                    });
                }
                Ok(next) => {
                    debug!(
                        reported = next.current_index,
                        "service has not moved past the answered question"
                    );
                }
                Err(error) => {
                    warn!(question_index = index, %error, "prefetch failed, will fetch on advance");
                }
            }
        }));
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.state.get_mut().tasks.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use guesser_core::answer::{AnswerChoice, PlayerAnswer};
    use guesser_core::client::SessionClient;
    use guesser_core::error::ClientError;
    use guesser_core::question::DEFAULT_ACCENT_COLOR;
    use guesser_core::session::GameSettings;
    use guesser_playback::AudioDevice;
    use guesser_test_support::{
        FailingSessionClient, FakeAudioDevice, ManualClock, ScriptedSessionClient, fixed_now,
        sample_question, sample_questions,
    };
    use guesser_timer::TimerPhase;
    use tokio::sync::broadcast;
    use tokio::time::sleep;

    use super::*;

    fn orchestrator(
        client: Arc<dyn SessionClient>,
        device: &Arc<FakeAudioDevice>,
    ) -> GameOrchestrator {
        orchestrator_with_clock(
            client,
            device,
            Arc::new(ManualClock::starting_at(fixed_now())),
        )
    }

    fn orchestrator_with_clock(
        client: Arc<dyn SessionClient>,
        device: &Arc<FakeAudioDevice>,
        clock: Arc<ManualClock>,
    ) -> GameOrchestrator {
        GameOrchestrator::new(
            client,
            Arc::clone(device) as Arc<dyn AudioDevice>,
            clock,
            OrchestratorConfig::default(),
        )
        .unwrap()
    }

    fn scripted(
        client: ScriptedSessionClient,
        device: FakeAudioDevice,
    ) -> (GameOrchestrator, Arc<ScriptedSessionClient>, Arc<FakeAudioDevice>) {
        let client = Arc::new(client);
        let device = Arc::new(device);
        let game = orchestrator(Arc::clone(&client) as Arc<dyn SessionClient>, &device);
        (game, client, device)
    }

    fn settings(song_count: u32) -> GameSettings {
        GameSettings::new(song_count, 4)
    }

    async fn wait_for<F>(events: &mut broadcast::Receiver<GameEvent>, matches: F) -> GameEvent
    where
        F: Fn(&GameEvent) -> bool,
    {
        loop {
            let event = events.recv().await.unwrap();
            if matches(&event) {
                return event;
            }
        }
    }

    async fn wait_armed(events: &mut broadcast::Receiver<GameEvent>, index: usize) -> GameEvent {
        wait_for(events, |e| {
            matches!(e, GameEvent::QuestionArmed { question_index, .. } if *question_index == index)
        })
        .await
    }

    async fn wait_resolved(events: &mut broadcast::Receiver<GameEvent>) -> AnswerOutcome {
        match wait_for(events, |e| matches!(e, GameEvent::AnswerResolved(_))).await {
            GameEvent::AnswerResolved(outcome) => outcome,
            other => panic!("unexpected event {other:?}"),
        }
    }

    /// Lets spawned tasks run without reaching the next countdown tick.
    async fn settle() {
        sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_session_presents_first_question_and_arms_when_audio_ready() {
        // Arrange
        let (game, client, device) =
            scripted(ScriptedSessionClient::new(sample_questions(3)), FakeAudioDevice::new());
        let mut events = game.subscribe();

        // Act
        let session_id = game.create_session(settings(3)).await.unwrap().unwrap();
        let presented = game.snapshot();
        device.finish_loading(30.0);
        let armed = wait_armed(&mut events, 0).await;
        settle().await;
        let live = game.snapshot();

        // Assert
        assert_eq!(client.created_sessions(), vec![session_id]);
        assert_eq!(presented.session_phase, SessionPhase::InProgress);
        assert_eq!(presented.session_id, Some(session_id));
        assert_eq!(presented.total_questions, 3);
        assert!(presented.is_question_loading());
        assert!(!presented.loading);
        assert_eq!(presented.timer.phase, TimerPhase::Idle);
        let view = presented.question.unwrap();
        assert_eq!(view.song_id, 1);
        assert_eq!(view.cover_url, "https://cdn.example/cover/1-medium.jpg");
        assert_eq!(view.accent_color, DEFAULT_ACCENT_COLOR);
        assert_eq!(
            armed,
            GameEvent::QuestionArmed {
                question_index: 0,
                with_audio: true
            }
        );
        assert_eq!(live.question_phase, Some(QuestionPhase::Armed));
        assert!(live.timer.running);
        assert!(live.audio.playing);
        assert_eq!(device.play_count(), 1);
        assert_eq!(game.session().unwrap().created_at, fixed_now());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_session_while_creating_is_noop() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(2))
                .with_create_delay(Duration::from_secs(1)),
            FakeAudioDevice::new(),
        );

        // Act
        let (first, second) =
            tokio::join!(game.create_session(settings(2)), game.create_session(settings(2)));

        // Assert
        assert!(first.unwrap().is_some());
        assert_eq!(second.unwrap(), None);
        assert_eq!(client.create_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_session_while_in_progress_is_noop() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new(),
        );
        let session_id = game.create_session(settings(2)).await.unwrap();

        // Act
        let again = game.create_session(settings(2)).await.unwrap();

        // Assert
        assert!(session_id.is_some());
        assert_eq!(again, None);
        assert_eq!(client.create_calls(), 1);
        assert_eq!(game.snapshot().session_id, session_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_session_failure_returns_to_uninitialized() {
        // Arrange
        let device = Arc::new(FakeAudioDevice::new());
        let game = orchestrator(Arc::new(FailingSessionClient), &device);
        let mut events = game.subscribe();

        // Act
        let result = game.create_session(settings(5)).await;

        // Assert
        assert_eq!(
            result,
            Err(GameError::SessionCreation(ClientError::Transport(
                "connection refused".to_owned()
            )))
        );
        let snapshot = game.snapshot();
        assert_eq!(snapshot.session_phase, SessionPhase::Uninitialized);
        assert!(!snapshot.loading);
        assert!(snapshot.error.unwrap().contains("connection refused"));
        assert!(matches!(
            events.try_recv(),
            Ok(GameEvent::SessionFailed { .. })
        ));
        assert!(device.loads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_resolves_once_and_second_click_is_ignored() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;

        // Act
        let first = game.submit_answer(AnswerChoice::Option(0)).await.unwrap();
        let second = game.submit_answer(AnswerChoice::Option(1)).await.unwrap();

        // Assert
        let outcome = first.unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.score_after, 10);
        assert_eq!(outcome.points_earned, 10);
        assert_eq!(outcome.next_index, Some(1));
        assert_eq!(second, None);
        assert_eq!(client.answers().len(), 1);
        let history = game.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].player_answer, PlayerAnswer::Picked("Song 1".to_owned()));
        assert!(history[0].correct);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.selected, Some(AnswerChoice::Option(0)));
        assert!(snapshot.submitted);
        assert_eq!(snapshot.timer.phase, TimerPhase::Paused);
        assert_eq!(snapshot.score, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_resolves_as_incorrect_with_timeout_record() {
        // Arrange
        let (game, client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;

        // Act
        let outcome = wait_resolved(&mut events).await;

        // Assert
        assert!(!outcome.correct);
        assert_eq!(outcome.points_earned, 0);
        let answers = client.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].choice, AnswerChoice::Timeout);
        assert_eq!(answers[0].choice.wire_index(), -1);
        let history = game.history();
        assert_eq!(history[0].player_answer, PlayerAnswer::Timeout);
        assert_eq!(history[0].player_answer.to_string(), "timeout");
        assert_eq!(history[0].correct_label, "Song 1");
        assert!(!history[0].correct);
        assert_eq!(device.pause_count(), 1);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.timer.phase, TimerPhase::Expired);
        assert!(!snapshot.audio.playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_just_before_expiry_suppresses_timeout() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3))
                .with_answer_delay(Duration::from_secs(2)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        sleep(Duration::from_millis(29_950)).await;

        // Act
        let outcome = game.submit_answer(AnswerChoice::Option(3)).await.unwrap();
        sleep(Duration::from_secs(1)).await;

        // Assert
        assert!(!outcome.unwrap().correct);
        let answers = client.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].choice, AnswerChoice::Option(3));
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.snapshot().timer.phase, TimerPhase::Paused);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_after_expiry_is_ignored() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3))
                .with_answer_delay(Duration::from_secs(1)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        sleep(Duration::from_millis(30_050)).await;

        // Act
        let click = game.submit_answer(AnswerChoice::Option(0)).await.unwrap();
        let outcome = wait_resolved(&mut events).await;

        // Assert
        assert_eq!(click, None);
        assert!(!outcome.correct);
        let answers = client.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].choice, AnswerChoice::Timeout);
        assert_eq!(game.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_option_is_ignored() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();
        wait_armed(&mut events, 0).await;

        // Act
        let result = game.submit_answer(AnswerChoice::Option(4)).await.unwrap();

        // Assert
        assert_eq!(result, None);
        assert!(client.answers().is_empty());
        assert!(!game.snapshot().submitted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_without_session_is_ignored() {
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new(),
        );

        let result = game.submit_answer(AnswerChoice::Option(0)).await.unwrap();

        assert_eq!(result, None);
        assert!(client.answers().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_answer_keeps_question_locked() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)).with_failing_answers(),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();
        wait_armed(&mut events, 0).await;

        // Act
        let failed = game.submit_answer(AnswerChoice::Option(0)).await;
        let retry = game.submit_answer(AnswerChoice::Option(1)).await;
        let advanced = game.advance_to_next_question().await;

        // Assert
        assert!(matches!(
            failed,
            Err(GameError::AnswerSubmission(ClientError::Rejected { status: 500, .. }))
        ));
        assert_eq!(retry, Ok(None));
        assert_eq!(advanced, Ok(None));
        assert_eq!(client.answers().len(), 1);
        let snapshot = game.snapshot();
        assert!(snapshot.submitted);
        assert!(snapshot.error.is_some());
        assert!(game.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_to_advance_after_feedback_grace() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(0)).await.unwrap();

        // Act
        sleep(Duration::from_millis(1700)).await;
        let during_grace = game.snapshot().ready_to_advance;
        let event = wait_for(&mut events, |e| matches!(e, GameEvent::ReadyToAdvance { .. })).await;

        // Assert
        assert!(!during_grace);
        assert_eq!(event, GameEvent::ReadyToAdvance { question_index: 0 });
        assert!(game.snapshot().ready_to_advance);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_requires_an_outcome() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;

        // Act
        let advanced = game.advance_to_next_question().await.unwrap();

        // Assert
        assert_eq!(advanced, None);
        assert_eq!(game.snapshot().question_index, Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_swaps_in_prefetched_question() {
        // Arrange
        let (game, client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(0)).await.unwrap();
        settle().await;
        let revealed = game.snapshot();

        // Act
        let advanced = game.advance_to_next_question().await.unwrap();
        let presented = game.snapshot();
        wait_armed(&mut events, 1).await;

        // Assert
        assert_eq!(client.state_calls(), 1);
        assert_eq!(revealed.question.unwrap().song_id, 1);
        assert_eq!(advanced, Some(1));
        assert_eq!(presented.question_index, Some(1));
        assert_eq!(presented.question.as_ref().unwrap().song_id, 2);
        assert!(presented.is_question_loading());
        assert_eq!(presented.selected, None);
        assert!(!presented.submitted);
        assert_eq!(presented.feedback, None);
        assert!(!presented.ready_to_advance);
        assert_eq!(presented.timer.phase, TimerPhase::Idle);
        assert_eq!(presented.score, 10);
        assert_eq!(
            device.loads(),
            vec![
                "https://cdn.example/preview/1.mp3".to_owned(),
                "https://cdn.example/preview/2.mp3".to_owned(),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_fetches_when_prefetch_has_not_landed() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3))
                .with_state_delay(Duration::from_secs(5)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(2)).await.unwrap();

        // Act
        let advanced = game.advance_to_next_question().await.unwrap();

        // Assert
        assert_eq!(advanced, Some(1));
        let snapshot = game.snapshot();
        assert_eq!(snapshot.question.unwrap().song_id, 2);
        assert_eq!(snapshot.question_phase, Some(QuestionPhase::AwaitingAudio));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_advance_keeps_question_and_can_be_retried() {
        // Arrange
        let client = ScriptedSessionClient::new(sample_questions(3));
        client.fail_state_requests(true);
        let (game, client, _device) =
            scripted(client, FakeAudioDevice::new().with_auto_load(30.0));
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(0)).await.unwrap();
        settle().await;

        // Act
        let failed = game.advance_to_next_question().await;
        let stuck = game.snapshot();
        client.fail_state_requests(false);
        let retried = game.advance_to_next_question().await.unwrap();

        // Assert
        assert!(matches!(
            failed,
            Err(GameError::QuestionFetch(ClientError::Transport(_)))
        ));
        assert_eq!(stuck.question_index, Some(0));
        assert_eq!(stuck.question.as_ref().unwrap().song_id, 1);
        assert_eq!(stuck.question_phase, Some(QuestionPhase::Revealed));
        assert!(stuck.feedback.is_some());
        assert!(stuck.error.is_some());
        assert_eq!(retried, Some(1));
        let snapshot = game.snapshot();
        assert_eq!(snapshot.question_index, Some(1));
        assert_eq!(snapshot.question.as_ref().unwrap().song_id, 2);
        assert_eq!(snapshot.error, None);
        assert_eq!(snapshot.session_phase, SessionPhase::InProgress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ten_question_game_completes_with_full_history() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(10)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(10)).await.unwrap();

        // Act
        for index in 0..10 {
            wait_armed(&mut events, index).await;
            let outcome = game
                .submit_answer(AnswerChoice::Option(index % 4))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(outcome.question_index, index);
            if index < 9 {
                assert!(!outcome.game_complete);
                assert_eq!(game.advance_to_next_question().await.unwrap(), Some(index + 1));
            } else {
                assert!(outcome.game_complete);
            }
        }
        let completed = wait_for(&mut events, |e| matches!(e, GameEvent::GameCompleted(_))).await;

        // Assert
        assert_eq!(game.phase(), SessionPhase::Completed);
        assert_eq!(game.history().len(), 10);
        assert_eq!(client.answers().len(), 10);
        let summary = game.summary();
        assert_eq!(summary.total_questions, 10);
        assert_eq!(summary.correct_answers, 10);
        assert_eq!(summary.score, 100);
        assert_eq!(completed, GameEvent::GameCompleted(summary));
        assert_eq!(game.advance_to_next_question().await.unwrap(), None);
        assert_eq!(game.submit_answer(AnswerChoice::Option(0)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lower_service_score_never_reduces_score() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)).with_reported_score(1, 4),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        let first = game.submit_answer(AnswerChoice::Option(0)).await.unwrap();
        game.advance_to_next_question().await.unwrap();
        wait_armed(&mut events, 1).await;

        // Act
        let second = game.submit_answer(AnswerChoice::Option(0)).await.unwrap();

        // Assert
        assert_eq!(first.unwrap().score_after, 10);
        assert_eq!(second.unwrap().score_after, 10);
        assert_eq!(game.snapshot().score, 10);
        assert_eq!(game.summary().score, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_counts_mixed_answers() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(4)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(4)).await.unwrap();
        let picks = [0, 0, 2, 3];

        // Act
        for (index, pick) in picks.into_iter().enumerate() {
            wait_armed(&mut events, index).await;
            game.submit_answer(AnswerChoice::Option(pick)).await.unwrap();
            game.advance_to_next_question().await.unwrap();
        }

        // Assert
        let correct: Vec<bool> = game.history().iter().map(|r| r.correct).collect();
        assert_eq!(correct, vec![true, false, true, true]);
        let summary = game.summary();
        assert_eq!(summary.correct_answers, 3);
        assert!((summary.accuracy - 75.0).abs() < f64::EPSILON);
        assert_eq!(summary.score, 30);
        assert_eq!(game.phase(), SessionPhase::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_drops_answer_still_in_flight() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3))
                .with_answer_delay(Duration::from_secs(1)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        let pending = tokio::spawn({
            let game = game.clone();
            async move { game.submit_answer(AnswerChoice::Option(0)).await }
        });
        settle().await;

        // Act
        game.exit_session();
        let late = pending.await.unwrap();

        // Assert
        assert_eq!(late, Ok(None));
        let snapshot = game.snapshot();
        assert_eq!(snapshot.session_phase, SessionPhase::Uninitialized);
        assert_eq!(snapshot.question, None);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.timer.phase, TimerPhase::Idle);
        assert!(!snapshot.audio.playing);
        assert!(game.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_during_creation_discards_new_session() {
        // Arrange
        let (game, _client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(3))
                .with_create_delay(Duration::from_secs(1)),
            FakeAudioDevice::new(),
        );
        let pending = tokio::spawn({
            let game = game.clone();
            async move { game.create_session(settings(3)).await }
        });
        settle().await;

        // Act
        game.exit_session();
        let late = pending.await.unwrap();

        // Assert
        assert_eq!(late, Ok(None));
        assert_eq!(game.phase(), SessionPhase::Uninitialized);
        assert!(device.loads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timeout_ticket_is_dropped() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(3)).await.unwrap();
        wait_armed(&mut events, 0).await;
        let epoch = game.inner.state.lock().epoch;

        // Act
        let other_question = game
            .inner
            .resolve(Some((epoch, 1)), AnswerChoice::Timeout)
            .await
            .unwrap();
        let old_epoch = game
            .inner
            .resolve(Some((epoch + 1, 0)), AnswerChoice::Timeout)
            .await
            .unwrap();

        // Assert
        assert_eq!(other_question, None);
        assert_eq!(old_epoch, None);
        assert!(client.answers().is_empty());
        assert!(!game.snapshot().submitted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_audio_failure_arms_timer_only() {
        // Arrange
        let (game, client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new(),
        );
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();

        // Act
        device.fail_loading("unsupported codec");
        let armed = wait_armed(&mut events, 0).await;
        let outcome = wait_resolved(&mut events).await;

        // Assert
        assert_eq!(
            armed,
            GameEvent::QuestionArmed {
                question_index: 0,
                with_audio: false
            }
        );
        assert_eq!(device.play_count(), 0);
        assert!(!outcome.correct);
        assert_eq!(client.answers()[0].choice, AnswerChoice::Timeout);
        let snapshot = game.snapshot();
        assert!(snapshot.audio.error.is_some());
        assert_eq!(snapshot.error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_stream_arms_with_audio_and_times_out() {
        // Arrange
        let (game, client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new(),
        );
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();

        // Act
        device.finish_loading(f64::INFINITY);
        let armed = wait_armed(&mut events, 0).await;
        let outcome = wait_resolved(&mut events).await;

        // Assert
        assert_eq!(
            armed,
            GameEvent::QuestionArmed {
                question_index: 0,
                with_audio: true
            }
        );
        assert_eq!(device.play_count(), 1);
        assert!(!outcome.correct);
        assert_eq!(client.answers()[0].choice, AnswerChoice::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metadata_without_duration_arms_timer_only() {
        // Arrange
        let (game, client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new(),
        );
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();

        // Act
        device.finish_loading(f64::NAN);
        let armed = wait_armed(&mut events, 0).await;
        let outcome = wait_resolved(&mut events).await;

        // Assert
        assert_eq!(
            armed,
            GameEvent::QuestionArmed {
                question_index: 0,
                with_audio: false
            }
        );
        assert_eq!(device.play_count(), 0);
        assert!(!outcome.correct);
        assert_eq!(client.answers()[0].choice, AnswerChoice::Timeout);
    }

    #[tokio::test(start_paused = true)]
    async fn test_question_without_clip_is_armed_immediately() {
        // Arrange
        let mut question = sample_question(7, 1, 4);
        question.audio_url = String::new();
        let (game, _client, device) = scripted(
            ScriptedSessionClient::new(vec![question]),
            FakeAudioDevice::new(),
        );

        // Act
        game.create_session(settings(1)).await.unwrap();

        // Assert
        let snapshot = game.snapshot();
        assert_eq!(snapshot.question_phase, Some(QuestionPhase::Armed));
        assert!(snapshot.timer.running);
        assert!(device.loads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reveals_clear_cover_after_answer() {
        // Arrange
        let mut question = sample_question(4, 2, 4);
        question.accent_color = "ff8800".to_owned();
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(vec![question, sample_question(5, 0, 4)]),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();
        wait_armed(&mut events, 0).await;

        // Act
        game.submit_answer(AnswerChoice::Option(1)).await.unwrap();

        // Assert
        let snapshot = game.snapshot();
        let view = snapshot.question.unwrap();
        assert_eq!(view.cover_url, "https://cdn.example/cover/4-big.jpg");
        assert_eq!(view.accent_color, "ff8800");
        assert_eq!(
            snapshot.feedback,
            Some(Feedback {
                correct: false,
                points_earned: 0,
                correct_option_index: 2,
            })
        );
        assert_eq!(snapshot.question_phase, Some(QuestionPhase::Revealed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_starts_fresh_session() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(3)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        let first = game.create_session(settings(3)).await.unwrap().unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(0)).await.unwrap();

        // Act
        let second = game.restart().await.unwrap().unwrap();

        // Assert
        assert_ne!(first, second);
        assert_eq!(client.created_sessions(), vec![first, second]);
        let snapshot = game.snapshot();
        assert_eq!(snapshot.session_phase, SessionPhase::InProgress);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.question_index, Some(0));
        assert!(!snapshot.submitted);
        assert!(game.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_stamps_session_with_current_time() {
        // Arrange
        let clock = Arc::new(ManualClock::starting_at(fixed_now()));
        let device = Arc::new(FakeAudioDevice::new().with_auto_load(30.0));
        let game = orchestrator_with_clock(
            Arc::new(ScriptedSessionClient::new(sample_questions(2))),
            &device,
            Arc::clone(&clock),
        );
        game.create_session(settings(2)).await.unwrap();
        clock.advance(chrono::TimeDelta::minutes(3));

        // Act
        game.restart().await.unwrap();

        // Assert
        assert_eq!(
            game.session().unwrap().created_at,
            fixed_now() + chrono::TimeDelta::minutes(3)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_after_completion_starts_new_game() {
        // Arrange
        let (game, client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(1)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let mut events = game.subscribe();
        game.create_session(settings(1)).await.unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(0)).await.unwrap();

        // Act
        let next = game.create_session(settings(1)).await.unwrap();

        // Assert
        assert!(next.is_some());
        assert_eq!(client.create_calls(), 2);
        assert_eq!(game.phase(), SessionPhase::InProgress);
        assert!(game.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_volume_defaults_and_forwards_to_device() {
        // Arrange
        let (game, _client, device) = scripted(
            ScriptedSessionClient::new(sample_questions(1)),
            FakeAudioDevice::new(),
        );
        let initial = device.last_volume();

        // Act
        game.set_volume(0.3);

        // Assert
        assert_eq!(initial, Some(0.7));
        assert_eq!(device.last_volume(), Some(0.3));
        assert!((game.volume() - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_remote_summary_passes_through() {
        // Arrange
        let (game, _client, _device) = scripted(
            ScriptedSessionClient::new(sample_questions(2)),
            FakeAudioDevice::new().with_auto_load(30.0),
        );
        let before = game.fetch_remote_summary().await.unwrap();
        let mut events = game.subscribe();
        game.create_session(settings(2)).await.unwrap();
        wait_armed(&mut events, 0).await;
        game.submit_answer(AnswerChoice::Option(0)).await.unwrap();

        // Act
        let remote = game.fetch_remote_summary().await.unwrap().unwrap();

        // Assert
        assert_eq!(before, None);
        assert_eq!(remote.score, 10);
        assert_eq!(remote.total_questions, 2);
        assert_eq!(game.summary().total_questions, 1);
    }
}
