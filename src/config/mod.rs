pub mod settings;
pub mod toml_config;

pub use settings::QuizSettings;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Command line flags. Anything left unset falls back to the TOML file given
/// with `--config`, then to the built-in defaults.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "code-quiz")]
#[command(about = "Play a generated programming quiz in the terminal")]
pub struct CliConfig {
    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Base URL of the question service")]
    pub service_url: Option<String>,

    #[arg(long)]
    pub topic: Option<String>,

    #[arg(long)]
    pub difficulty: Option<String>,

    #[arg(long, help = "Number of questions to request")]
    pub count: Option<u32>,

    #[arg(long, help = "Programming language the questions are about")]
    pub language: Option<String>,

    #[arg(long, help = "Attempts allowed per question (unlimited when unset)")]
    pub max_attempts: Option<u32>,

    #[arg(long, help = "Milliseconds the explanation stays up after a correct answer")]
    pub advance_delay_ms: Option<u64>,

    #[arg(long, help = "HTTP timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self) -> Result<QuizSettings> {
        let base = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                toml_config::TomlConfig::from_file(path)?.to_settings()
            }
            None => QuizSettings::default(),
        };
        Ok(self.overlay(base))
    }

    fn overlay(&self, base: QuizSettings) -> QuizSettings {
        QuizSettings {
            service_url: self.service_url.clone().unwrap_or(base.service_url),
            timeout_seconds: self.timeout_seconds.unwrap_or(base.timeout_seconds),
            language: self.language.clone().unwrap_or(base.language),
            topic: self.topic.clone().unwrap_or(base.topic),
            difficulty: self.difficulty.clone().unwrap_or(base.difficulty),
            count: self.count.unwrap_or(base.count),
            max_attempts: self.max_attempts.or(base.max_attempts),
            advance_delay_ms: self.advance_delay_ms.unwrap_or(base.advance_delay_ms),
            verbose: self.verbose || base.verbose,
            log_json: self.log_json || base.log_json,
        }
    }
}
