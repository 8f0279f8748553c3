pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::HttpQuestionService;
pub use crate::config::{toml_config::TomlConfig, QuizSettings};
pub use crate::core::controller::{QuizPhase, QuizPolicy, SessionController, SubmitOutcome};
pub use crate::core::renderer::QuestionRenderer;
pub use crate::utils::error::{QuizError, Result};
