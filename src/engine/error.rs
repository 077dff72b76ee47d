//! Error types for the prompt engine

use thiserror::Error;

/// Result type for prompt engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while loading or running the prompt engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The request was rejected before any stage ran
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The pattern library or configuration is unusable; only raised at load time
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsafe SQL: {0}")]
    UnsafeSql(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Whether the error was caused by the caller's input rather than the deployment
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::InvalidInput(_) | EngineError::UnsafeSql(_))
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            EngineError::InvalidInput(msg) => {
                format!("Invalid prompt: {msg}. Describe what you need in a few words, e.g. \"top 5 customers by spending\".")
            }
            EngineError::Configuration(msg) => {
                format!("Configuration issue: {msg}. Check your config file.")
            }
            EngineError::UnsafeSql(msg) => format!("Query rejected by the read-only guard: {msg}"),
            EngineError::ConfigParse(e) => {
                format!("Could not parse config file: {e}. Fix or delete it to regenerate defaults.")
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(EngineError::InvalidInput("empty".into()).is_client_error());
        assert!(EngineError::UnsafeSql("DROP".into()).is_client_error());
        assert!(!EngineError::Configuration("bad regex".into()).is_client_error());
    }

    #[test]
    fn test_user_message_mentions_cause() {
        let err = EngineError::InvalidInput("prompt is empty".into());
        assert!(err.user_message().contains("prompt is empty"));
    }
}
