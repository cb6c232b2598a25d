//! Error types for ruleset parsing, validation, and persistence.

use crate::service::ServiceError;
use crate::validation::ValidationReport;

/// Errors that can occur while editing and saving a ruleset.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Buffer is not well-formed JSON.
    #[error("Invalid JSON format: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document could not be rendered back to text.
    #[error("Failed to serialize rules: {0}")]
    Serialize(serde_json::Error),

    /// Well-formed JSON that does not have the ruleset shape.
    #[error("Invalid rule structure: {0}")]
    Validation(ValidationReport),

    /// Delete requested for a position past the end of `rules`.
    #[error("No rule at position {index} (ruleset has {len} rules)")]
    RuleIndexOutOfRange { index: usize, len: usize },

    /// The rules service failed or rejected the request.
    #[error("{0}")]
    Service(#[from] ServiceError),
}

/// The three failure families surfaced to operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Parse,
    Validation,
    Transport,
}

impl RuleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuleError::Parse(_) | RuleError::Serialize(_) => ErrorCategory::Parse,
            RuleError::Validation(_) | RuleError::RuleIndexOutOfRange { .. } => {
                ErrorCategory::Validation
            }
            RuleError::Service(_) => ErrorCategory::Transport,
        }
    }
}

/// Result alias for ruleset operations.
pub type Result<T> = std::result::Result<T, RuleError>;
