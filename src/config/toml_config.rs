use crate::config::settings::QuizSettings;
use crate::utils::error::{QuizError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub service: ServiceConfig,
    pub quiz: Option<QuizConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub count: Option<u32>,
    pub max_attempts: Option<u32>,
    pub advance_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QuizError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QuizError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${QUIZ_SERVICE_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| QuizError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// File values layered over the built-in defaults.
    pub fn to_settings(&self) -> QuizSettings {
        let defaults = QuizSettings::default();
        let quiz = self.quiz.clone().unwrap_or_default();
        let logging = self.logging.clone().unwrap_or_default();

        QuizSettings {
            service_url: self.service.base_url.clone(),
            timeout_seconds: self
                .service
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
            language: self.service.language.clone().unwrap_or(defaults.language),
            topic: quiz.topic.unwrap_or(defaults.topic),
            difficulty: quiz.difficulty.unwrap_or(defaults.difficulty),
            count: quiz.count.unwrap_or(defaults.count),
            max_attempts: quiz.max_attempts,
            advance_delay_ms: quiz.advance_delay_ms.unwrap_or(defaults.advance_delay_ms),
            verbose: logging.verbose.unwrap_or(false),
            log_json: logging.json.unwrap_or(false),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.to_settings().validate()
    }
}
