use crate::core::renderer::{QuestionRenderer, UiState, ViewState};
use crate::domain::model::{
    AnswerSubmission, AnswerValue, GenerateRequest, Question, Session, SessionSummary,
    VerificationResult,
};
use crate::domain::ports::{ConfigProvider, Presenter, QuestionService};
use crate::domain::view::{Message, Screen, SetupDefaults};
use crate::utils::error::{QuizError, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const INCORRECT_MESSAGE: &str = "Incorrect, try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Setup,
    Loading,
    InProgress,
    Complete,
}

impl std::fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            QuizPhase::Setup => "in setup",
            QuizPhase::Loading => "loading questions",
            QuizPhase::InProgress => "a quiz is in progress",
            QuizPhase::Complete => "the quiz is complete",
        };
        f.write_str(text)
    }
}

/// Retry and pacing rules for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPolicy {
    /// `None` allows unlimited attempts per question.
    pub max_attempts: Option<u32>,
    /// How long the explanation stays up before the next question.
    pub advance_delay: Duration,
}

impl Default for QuizPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            advance_delay: Duration::from_millis(1500),
        }
    }
}

impl QuizPolicy {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self {
            max_attempts: config.max_attempts(),
            advance_delay: config.advance_delay(),
        }
    }

    fn attempts_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Correct { explanation: String },
    Incorrect { attempts: u32 },
    /// The attempt limit was reached; the question was advanced past unscored.
    OutOfAttempts { expected: Option<AnswerValue> },
    /// The result belonged to a session or question that is no longer active.
    Discarded,
}

/// Drives one quiz at a time through setup, loading, answering and summary.
pub struct SessionController<S: QuestionService, P: Presenter> {
    service: Arc<S>,
    presenter: P,
    policy: QuizPolicy,
    language: String,
    defaults: SetupDefaults,
    phase: QuizPhase,
    session: Option<Session>,
    ui: UiState,
    pending: Option<AnswerSubmission>,
    /// Background `end_quiz` notification for the last discarded session.
    ending: Option<JoinHandle<()>>,
}

impl<S: QuestionService, P: Presenter> SessionController<S, P> {
    pub fn new(service: S, presenter: P, defaults: SetupDefaults, policy: QuizPolicy) -> Self {
        Self {
            service: Arc::new(service),
            presenter,
            policy,
            language: "javascript".to_string(),
            defaults,
            phase: QuizPhase::Setup,
            session: None,
            ui: UiState::default(),
            pending: None,
            ending: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn defaults(&self) -> &SetupDefaults {
        &self.defaults
    }

    pub fn policy(&self) -> &QuizPolicy {
        &self.policy
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn screen(&self) -> Screen {
        QuestionRenderer::render(ViewState {
            phase: self.phase,
            session: self.session.as_ref(),
            ui: &self.ui,
            defaults: &self.defaults,
        })
    }

    /// Push the current screen to the presenter.
    pub fn show(&mut self) {
        let screen = self.screen();
        self.presenter.present(&screen);
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        match (self.phase, &self.session, self.ui.completed_at) {
            (QuizPhase::Complete, Some(session), Some(completed_at)) => {
                Some(session.summary(completed_at))
            }
            _ => None,
        }
    }

    /// Load a fresh batch of questions and begin the quiz.
    ///
    /// On failure the controller returns to setup with the error displayed;
    /// no partial session is kept.
    pub async fn start_session(&mut self, topic: &str, difficulty: &str, count: u32) -> Result<()> {
        if self.phase != QuizPhase::Setup {
            return Err(QuizError::invalid_state("start a quiz", self.phase));
        }

        self.defaults = SetupDefaults {
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            count,
        };
        self.phase = QuizPhase::Loading;
        self.ui = UiState::default();
        self.show();

        let request = GenerateRequest {
            language: self.language.clone(),
            topic: topic.to_string(),
            difficulty: difficulty.to_string(),
            n: count,
        };
        tracing::info!(
            "Requesting {} {} questions about {} ({})",
            count,
            difficulty,
            topic,
            self.language
        );

        let loaded = match self.service.generate_questions(&request).await {
            Ok(batch) => Session::from_batch(batch, Utc::now()),
            Err(e) => Err(e),
        };

        match loaded {
            Ok(session) => {
                tracing::info!(
                    "Session {} started with {} questions",
                    session.session_id(),
                    session.total()
                );
                self.session = Some(session);
                self.phase = QuizPhase::InProgress;
                self.ui = UiState::default();
                self.show();
                Ok(())
            }
            Err(e) => {
                tracing::error!("Loading questions failed: {} (Category: {:?})", e, e.category());
                self.phase = QuizPhase::Setup;
                self.ui = UiState {
                    message: Some(Message::error(e.user_friendly_message())),
                    ..UiState::default()
                };
                self.show();
                Err(e)
            }
        }
    }

    /// The question to answer next, or `None` once the session is complete.
    pub fn current_question(&self) -> Result<Option<&Question>> {
        let session = self
            .session
            .as_ref()
            .ok_or_else(|| QuizError::invalid_state("read the current question", self.phase))?;
        Ok(session.current_question())
    }

    /// Check an answer for the current question and apply the verdict.
    pub async fn submit_answer(&mut self, answer: AnswerValue) -> Result<SubmitOutcome> {
        let submission = self.prepare_submission(answer)?;
        let result = self.service.check_answer(&submission).await;
        self.apply_verification(&submission, result).await
    }

    /// Claim the submission slot for the current question.
    ///
    /// Fails with [`QuizError::BusyError`] while another answer is pending or
    /// the current question is waiting to be advanced past.
    pub fn prepare_submission(&mut self, answer: AnswerValue) -> Result<AnswerSubmission> {
        if self.phase != QuizPhase::InProgress {
            return Err(QuizError::invalid_state("submit an answer", self.phase));
        }
        if self.pending.is_some() || self.ui.answered {
            return Err(QuizError::BusyError);
        }

        let session = self
            .session
            .as_ref()
            .ok_or_else(|| QuizError::invalid_state("submit an answer", self.phase))?;
        let question = session
            .current_question()
            .ok_or_else(|| QuizError::invalid_state("submit an answer", QuizPhase::Complete))?;

        let submission = AnswerSubmission {
            session_id: session.session_id().to_string(),
            question_id: question.question_id.clone(),
            user_answer: answer,
            language: Some(self.language.clone()),
        };
        tracing::debug!(
            "Submitting answer for question {} in session {}",
            submission.question_id,
            submission.session_id
        );
        self.pending = Some(submission.clone());
        Ok(submission)
    }

    /// Apply a verification result obtained for `submission`.
    ///
    /// Results for a submission that is no longer pending (the session was
    /// restarted or replaced) are discarded without touching any state.
    pub async fn apply_verification(
        &mut self,
        submission: &AnswerSubmission,
        result: Result<VerificationResult>,
    ) -> Result<SubmitOutcome> {
        if !self.is_pending(submission) {
            tracing::warn!(
                "Discarding stale result for question {} in session {}",
                submission.question_id,
                submission.session_id
            );
            return Ok(SubmitOutcome::Discarded);
        }
        self.pending = None;

        let verification = match result {
            Ok(verification) => verification,
            Err(e) => {
                tracing::error!("Checking answer failed: {} (Category: {:?})", e, e.category());
                self.ui.message = Some(Message::error(e.user_friendly_message()));
                self.show();
                return Err(e);
            }
        };

        let Some(session) = self.session.as_mut() else {
            return Ok(SubmitOutcome::Discarded);
        };

        if verification.correct {
            session.record_correct();
            tracing::info!(
                "Question {} answered correctly (score {})",
                submission.question_id,
                session.score()
            );
            let text = if verification.explanation.is_empty() {
                "Correct!".to_string()
            } else {
                format!("Correct! {}", verification.explanation)
            };
            self.ui.message = Some(Message::success(text));
            self.ui.answered = true;
            self.show();

            self.advance_after_delay().await;
            return Ok(SubmitOutcome::Correct {
                explanation: verification.explanation,
            });
        }

        let attempts = session.record_incorrect();
        tracing::info!(
            "Question {} answered incorrectly (attempt {})",
            submission.question_id,
            attempts
        );

        if self.policy.attempts_exhausted(attempts) {
            let mut text = "Out of attempts.".to_string();
            if let Some(expected) = &verification.expected {
                text.push_str(&format!(" The answer was: {}", expected));
            }
            self.ui.message = Some(Message::error(text));
            self.ui.answered = true;
            self.show();

            self.advance_after_delay().await;
            return Ok(SubmitOutcome::OutOfAttempts {
                expected: verification.expected,
            });
        }

        self.ui.message = Some(Message::error(INCORRECT_MESSAGE));
        self.show();
        Ok(SubmitOutcome::Incorrect { attempts })
    }

    /// Drop the current session and go back to setup, keeping the defaults.
    ///
    /// The service is told about the discarded session in the background; the
    /// setup screen never waits on it.
    pub async fn restart(&mut self) {
        let ended = self.session.take();
        self.pending = None;
        self.phase = QuizPhase::Setup;
        self.ui = UiState::default();
        self.show();

        if let Some(session) = ended {
            let session_id = session.session_id().to_string();
            let service = Arc::clone(&self.service);
            tracing::info!("Ending session {}", session_id);
            self.ending = Some(tokio::spawn(async move {
                if let Err(e) = service.end_quiz(&session_id).await {
                    tracing::warn!("Could not end session {}: {}", session_id, e);
                }
            }));
        }
    }

    /// Wait for the notification sent by the last [`restart`](Self::restart).
    pub async fn wait_for_session_end(&mut self) {
        if let Some(ending) = self.ending.take() {
            if let Err(e) = ending.await {
                tracing::warn!("Session end notification did not finish: {}", e);
            }
        }
    }

    fn is_pending(&self, submission: &AnswerSubmission) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        let current = self
            .session
            .as_ref()
            .and_then(|s| s.current_question().map(|q| (s.session_id(), q.question_id.as_str())));

        pending.session_id == submission.session_id
            && pending.question_id == submission.question_id
            && current == Some((submission.session_id.as_str(), submission.question_id.as_str()))
    }

    async fn advance_after_delay(&mut self) {
        if !self.policy.advance_delay.is_zero() {
            tokio::time::sleep(self.policy.advance_delay).await;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.advance();
        self.ui.answered = false;
        self.ui.message = None;

        if session.is_complete() {
            let completed_at = Utc::now();
            tracing::info!(
                "Session {} complete: {} / {}",
                session.session_id(),
                session.score(),
                session.total()
            );
            self.ui.completed_at = Some(completed_at);
            self.phase = QuizPhase::Complete;
        }
        self.show();
    }
}
