use std::fmt;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised around the layout engine: record supply, log parsing and configuration.
///
/// Building a view model never fails; these cover the collaborators that feed it.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Repository error: {message}")]
    Repository { message: String },

    #[error("Invalid input: {input} - {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Configuration error: {setting} - {reason}")]
    Configuration { setting: String, reason: String },

    #[error("Parse error in entry {entry}: {reason}")]
    Parse { entry: usize, reason: String },

    #[error("Git internal error: {0}")]
    Git2(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl GraphError {
    pub fn repository(message: impl Into<String>) -> Self {
        let message = message.into();
        error!("Repository error: {}", message);
        GraphError::Repository { message }
    }

    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        let input = input.into();
        let reason = reason.into();
        warn!("Invalid input '{}': {}", input, reason);
        GraphError::InvalidInput { input, reason }
    }

    pub fn configuration(setting: impl Into<String>, reason: impl Into<String>) -> Self {
        let setting = setting.into();
        let reason = reason.into();
        warn!("Configuration '{}' rejected: {}", setting, reason);
        GraphError::Configuration { setting, reason }
    }

    pub fn parse(entry: usize, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug!("Parse error in entry {}: {}", entry, reason);
        GraphError::Parse { entry, reason }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            GraphError::Repository { .. } => true,
            GraphError::InvalidInput { .. } => false,
            GraphError::Configuration { .. } => false,
            GraphError::Parse { .. } => true,
            GraphError::Git2(_) => true,
            GraphError::Io(_) => true,
            GraphError::Serialization(_) => false,
            GraphError::Regex(_) => false,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GraphError::Repository { .. } => ErrorSeverity::High,
            GraphError::InvalidInput { .. } => ErrorSeverity::Medium,
            GraphError::Configuration { .. } => ErrorSeverity::Medium,
            GraphError::Parse { .. } => ErrorSeverity::Low,
            GraphError::Git2(_) => ErrorSeverity::Medium,
            GraphError::Io(_) => ErrorSeverity::High,
            GraphError::Serialization(_) => ErrorSeverity::Low,
            GraphError::Regex(_) => ErrorSeverity::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Low => write!(f, "LOW"),
            ErrorSeverity::Medium => write!(f, "MEDIUM"),
            ErrorSeverity::High => write!(f, "HIGH"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Input validation utilities
pub struct InputValidator;

impl InputValidator {
    /// Validate commit ID format and length. Accepts abbreviated, SHA-1 and SHA-256 ids.
    pub fn validate_commit_id(id: &str) -> Result<(), GraphError> {
        if id.is_empty() {
            return Err(GraphError::invalid_input(id, "Commit ID cannot be empty"));
        }

        if id.len() < 4 {
            return Err(GraphError::invalid_input(id, "Commit ID too short (minimum 4 characters)"));
        }

        if id.len() > 64 {
            return Err(GraphError::invalid_input(id, "Commit ID too long (maximum 64 characters)"));
        }

        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(GraphError::invalid_input(id, "Commit ID contains non-hexadecimal characters"));
        }

        Ok(())
    }

    /// Validate reference name (branch/tag)
    pub fn validate_ref_name(name: &str) -> Result<(), GraphError> {
        if name.is_empty() {
            return Err(GraphError::invalid_input(name, "Reference name cannot be empty"));
        }

        if name.len() > 255 {
            return Err(GraphError::invalid_input(name, "Reference name too long (maximum 255 characters)"));
        }

        let invalid_chars = [' ', '~', '^', ':', '?', '*', '[', '\\', '\x7f', '\n', '\r', '\t'];
        for ch in &invalid_chars {
            if name.contains(*ch) {
                return Err(GraphError::invalid_input(
                    name,
                    format!("Reference name contains invalid character: {:?}", ch),
                ));
            }
        }

        if name.starts_with('-')
            || name.starts_with('/')
            || name.ends_with('/')
            || name.ends_with('.')
            || name.ends_with(".lock")
            || name.contains("..")
            || name.contains("//")
            || name.contains("@{")
        {
            return Err(GraphError::invalid_input(name, "Reference name violates Git naming rules"));
        }

        Ok(())
    }
}

/// Error reporting and logging utilities
pub struct ErrorReporter;

impl ErrorReporter {
    /// Log error with appropriate level based on severity
    pub fn log_error(error: &GraphError, context: &str) {
        match error.severity() {
            ErrorSeverity::Critical => {
                error!("[CRITICAL] {}: {}", context, error);
            }
            ErrorSeverity::High => {
                error!("[HIGH] {}: {}", context, error);
            }
            ErrorSeverity::Medium => {
                warn!("[MEDIUM] {}: {}", context, error);
            }
            ErrorSeverity::Low => {
                debug!("[LOW] {}: {}", context, error);
            }
        }
    }

    /// User-facing one-line message for the CLI
    pub fn user_friendly_message(error: &GraphError) -> String {
        match error {
            GraphError::Repository { message } => {
                format!("Repository error: {}", message)
            }
            GraphError::Configuration { setting, reason } => {
                format!("Invalid configuration for '{}': {}", setting, reason)
            }
            GraphError::Parse { entry, reason } => {
                format!("Could not read log entry {}: {}", entry, reason)
            }
            GraphError::Git2(e) => format!("Git error: {}", e.message()),
            GraphError::Io(e) => format!("File operation failed: {}", e),
            other => other.to_string(),
        }
    }
}
