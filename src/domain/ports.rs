use crate::domain::model::{AnswerSubmission, GenerateRequest, QuestionBatch, VerificationResult};
use crate::domain::view::Screen;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// External collaborator that generates and verifies questions.
#[async_trait]
pub trait QuestionService: Send + Sync + 'static {
    async fn generate_questions(&self, request: &GenerateRequest) -> Result<QuestionBatch>;

    async fn check_answer(&self, submission: &AnswerSubmission) -> Result<VerificationResult>;

    /// Tell the service a session is no longer needed.
    async fn end_quiz(&self, _session_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Receives every screen the controller produces.
pub trait Presenter: Send {
    fn present(&mut self, screen: &Screen);
}

pub trait ConfigProvider: Send + Sync {
    fn service_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn language(&self) -> &str;
    fn topic(&self) -> &str;
    fn difficulty(&self) -> &str;
    fn question_count(&self) -> u32;
    fn max_attempts(&self) -> Option<u32>;
    fn advance_delay(&self) -> Duration;
}
