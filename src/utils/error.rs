use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Question service unreachable: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Question service error: {message}")]
    ProtocolError { message: String },

    #[error("Cannot {action} while {phase}")]
    InvalidStateError { action: String, phase: String },

    #[error("An answer is already being checked")]
    BusyError,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Protocol,
    State,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl QuizError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolError {
            message: message.into(),
        }
    }

    pub fn invalid_state(action: &str, phase: impl std::fmt::Display) -> Self {
        Self::InvalidStateError {
            action: action.to_string(),
            phase: phase.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            QuizError::NetworkError(_) => ErrorCategory::Network,
            QuizError::ProtocolError { .. } => ErrorCategory::Protocol,
            QuizError::InvalidStateError { .. } | QuizError::BusyError => ErrorCategory::State,
            QuizError::ConfigError { .. } | QuizError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            QuizError::IoError(_) => ErrorCategory::System,
        }
    }

    /// Nothing a running quiz produces is fatal; only a broken setup stops the process.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::State => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Protocol => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Text shown inline to the player.
    pub fn user_friendly_message(&self) -> String {
        match self {
            QuizError::NetworkError(e) if e.is_timeout() => {
                "The question service took too long to answer.".to_string()
            }
            QuizError::NetworkError(_) => "Could not reach the question service.".to_string(),
            QuizError::ProtocolError { message } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            QuizError::NetworkError(_) => "Check that the question service is running and retry.",
            QuizError::ProtocolError { .. } => {
                "Retry the last action; restart the quiz if it keeps failing."
            }
            QuizError::InvalidStateError { .. } => "Restart the quiz to return to setup.",
            QuizError::BusyError => "Wait for the current answer to be checked.",
            QuizError::ConfigError { .. } | QuizError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags."
            }
            QuizError::IoError(_) => "Check file permissions and paths.",
        }
    }
}

pub type Result<T> = std::result::Result<T, QuizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_errors_show_service_message() {
        let err = QuizError::protocol("OpenAI API key is missing.");
        assert_eq!(err.category(), ErrorCategory::Protocol);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "OpenAI API key is missing.");
    }

    #[test]
    fn test_state_errors_are_low_severity() {
        let err = QuizError::invalid_state("submit an answer", "in setup");
        assert_eq!(err.to_string(), "Cannot submit an answer while in setup");
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(QuizError::BusyError.category(), ErrorCategory::State);
    }

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = QuizError::ConfigError {
            message: "missing field `base_url`".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("configuration"));
    }
}
