use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LANGUAGE: &str = "javascript";
pub const DEFAULT_TOPIC: &str = "loops";
pub const DEFAULT_DIFFICULTY: &str = "mixed";
pub const DEFAULT_COUNT: u32 = 10;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 1500;

pub const MAX_COUNT: u32 = 50;

/// Fully resolved settings after merging file and command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub service_url: String,
    pub timeout_seconds: u64,
    pub language: String,
    pub topic: String,
    pub difficulty: String,
    pub count: u32,
    pub max_attempts: Option<u32>,
    pub advance_delay_ms: u64,
    pub verbose: bool,
    pub log_json: bool,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            language: DEFAULT_LANGUAGE.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            count: DEFAULT_COUNT,
            max_attempts: None,
            advance_delay_ms: DEFAULT_ADVANCE_DELAY_MS,
            verbose: false,
            log_json: false,
        }
    }
}

impl ConfigProvider for QuizSettings {
    fn service_url(&self) -> &str {
        &self.service_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn language(&self) -> &str {
        &self.language
    }

    fn topic(&self) -> &str {
        &self.topic
    }

    fn difficulty(&self) -> &str {
        &self.difficulty
    }

    fn question_count(&self) -> u32 {
        self.count
    }

    fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

impl Validate for QuizSettings {
    fn validate(&self) -> Result<()> {
        validate_url("service_url", &self.service_url)?;
        validate_range("timeout_seconds", self.timeout_seconds, 1, 600)?;
        validate_non_empty_string("language", &self.language)?;
        validate_non_empty_string("topic", &self.topic)?;
        validate_non_empty_string("difficulty", &self.difficulty)?;
        validate_range("count", self.count, 1, MAX_COUNT)?;
        if let Some(max_attempts) = self.max_attempts {
            validate_range("max_attempts", max_attempts, 1, 100)?;
        }
        validate_range("advance_delay_ms", self.advance_delay_ms, 0, 60_000)?;
        Ok(())
    }
}
