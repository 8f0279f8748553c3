use crate::utils::error::{QuizError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interaction style of a question. The aliases are the names the question
/// generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "multiple_choice", alias = "mcq")]
    MultipleChoice,
    #[serde(rename = "fill_in_blank", alias = "fill_code", alias = "fill_blank")]
    FillInBlank,
    #[serde(rename = "ordering", alias = "drag_drop")]
    Ordering,
}

impl QuestionKind {
    pub fn requires_options(self) -> bool {
        matches!(self, QuestionKind::MultipleChoice | QuestionKind::Ordering)
    }
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QuestionKind::MultipleChoice => "multiple_choice",
            QuestionKind::FillInBlank => "fill_in_blank",
            QuestionKind::Ordering => "ordering",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "question")]
    pub prompt: String,
    #[serde(
        rename = "code_with_blanks",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Question {
    /// Options as a slice; empty for question kinds without options.
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or(&[])
    }

    pub fn check_shape(&self) -> Result<()> {
        if self.kind.requires_options() && self.options().is_empty() {
            return Err(QuizError::protocol(format!(
                "Question {} ({}) arrived without options",
                self.question_id, self.kind
            )));
        }
        Ok(())
    }
}

/// An answer as it travels on the wire: free text for choice and blank
/// questions, an ordered list for ordering questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Sequence(Vec<String>),
}

impl std::fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerValue::Text(text) => f.write_str(text),
            AnswerValue::Sequence(items) => f.write_str(&items.join(" → ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateRequest {
    pub language: String,
    pub topic: String,
    pub difficulty: String,
    pub n: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBatch {
    pub session_id: String,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSubmission {
    pub session_id: String,
    pub question_id: String,
    pub user_answer: AnswerValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub correct: bool,
    pub explanation: String,
    pub expected: Option<AnswerValue>,
}

/// One quiz attempt over a fixed, ordered set of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    session_id: String,
    questions: Vec<Question>,
    current_index: usize,
    score: usize,
    attempts: u32,
    started_at: DateTime<Utc>,
}

impl Session {
    /// Build a session from a freshly loaded batch.
    ///
    /// Rejects empty batches and questions missing required options, so a
    /// failed load never yields a partial session.
    pub fn from_batch(batch: QuestionBatch, started_at: DateTime<Utc>) -> Result<Self> {
        if batch.session_id.trim().is_empty() {
            return Err(QuizError::protocol("Response is missing a session id"));
        }
        if batch.questions.is_empty() {
            return Err(QuizError::protocol("No questions were generated"));
        }
        for question in &batch.questions {
            question.check_shape()?;
        }

        Ok(Self {
            session_id: batch.session_id,
            questions: batch.questions,
            current_index: 0,
            score: 0,
            attempts: 0,
            started_at,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Number of questions in the session.
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Attempts already spent on the current question.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// `None` once every question has been advanced past.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    pub(crate) fn record_incorrect(&mut self) -> u32 {
        self.attempts = self.attempts.saturating_add(1);
        self.attempts
    }

    pub(crate) fn record_correct(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
        self.score += 1;
    }

    pub(crate) fn advance(&mut self) {
        if self.current_index < self.questions.len() {
            self.current_index += 1;
            self.attempts = 0;
        }
    }

    pub fn summary(&self, completed_at: DateTime<Utc>) -> SessionSummary {
        SessionSummary {
            score: self.score,
            total: self.questions.len(),
            started_at: self.started_at,
            completed_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: usize,
    pub total: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn headline(&self) -> String {
        format!("You scored {} / {}", self.score, self.total)
    }
}
