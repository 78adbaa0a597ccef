//! Error types for the chatdeck library.
//!
//! Recoverable failures exist only at the ambient edges (configuration
//! loading, logging setup); they compose via `?` and `From` conversions.
//! Structural misuse of the update engine — an out-of-range index inside a
//! committed batch — is a programmer error and panics at the replay site
//! rather than surfacing here, because the store cannot validate positional
//! operations against concurrent structural drift on the caller's behalf.

use thiserror::Error;

pub use crate::config::ConfigError;
pub use crate::logging::LoggingError;

/// Top-level library error wrapping all recoverable failure modes.
#[derive(Debug, Error)]
pub enum ChatdeckError {
    /// Configuration file could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_via_from() {
        let source = ConfigError::InvalidPath("\u{fffd}".to_string());
        let err: ChatdeckError = source.into();
        assert!(matches!(err, ChatdeckError::Config(_)));
    }

    #[test]
    fn error_messages_name_the_failing_layer() {
        let err = ChatdeckError::Config(ConfigError::InvalidPath("x".into()));
        assert!(err.to_string().contains("configuration"));
    }
}
