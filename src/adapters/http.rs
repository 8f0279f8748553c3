use crate::adapters::wire;
use crate::domain::model::{AnswerSubmission, GenerateRequest, QuestionBatch, VerificationResult};
use crate::domain::ports::{ConfigProvider, QuestionService};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Question Service reached over HTTP+JSON.
#[derive(Debug, Clone)]
pub struct HttpQuestionService {
    client: Client,
    base_url: String,
}

impl HttpQuestionService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(config.service_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<serde_json::Value> {
        let url = self.endpoint(path);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("{} answered {} ({} bytes)", path, status, text.len());

        wire::ok_envelope(status.as_u16(), &text)
    }

    /// Probe `GET /healthz`; any transport success with `ok: true` counts as healthy.
    pub async fn health(&self) -> Result<bool> {
        let response = self.client.get(self.endpoint("healthz")).send().await?;
        if !response.status().is_success() {
            return Ok(false);
        }
        let body: serde_json::Value = response.json().await?;
        Ok(body
            .get("ok")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false))
    }
}

#[async_trait]
impl QuestionService for HttpQuestionService {
    async fn generate_questions(&self, request: &GenerateRequest) -> Result<QuestionBatch> {
        let envelope = self.post_json("generate_questions", request).await?;
        wire::parse_batch(&envelope)
    }

    async fn check_answer(&self, submission: &AnswerSubmission) -> Result<VerificationResult> {
        let envelope = self.post_json("check_answer", submission).await?;
        wire::parse_verification(&envelope)
    }

    async fn end_quiz(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint("end_quiz");
        tracing::debug!("POST {} session={}", url, session_id);

        let response = self
            .client
            .post(&url)
            .query(&[("session_id", session_id)])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        wire::ok_envelope(status.as_u16(), &text)?;
        Ok(())
    }
}
