use thiserror::Error;

use crate::model::EntityId;

/// Stable error code constants.
///
/// Presentation matches on these, never on the message text.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const TRANSPORT: &str = "TRANSPORT";
}

/// Errors raised by the entity store, the facade and the form controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdminError {
    /// Update or delete referenced an id the collection does not hold.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: EntityId },

    /// A form field is missing or malformed.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// The facade could not reach its backend.
    #[error("transport: {0}")]
    Transport(String),
}

impl AdminError {
    pub fn not_found(kind: &'static str, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::NotFound { .. } => error_code::NOT_FOUND,
            AdminError::Validation { .. } => error_code::VALIDATION_FAILED,
            AdminError::Transport(_) => error_code::TRANSPORT,
        }
    }

    /// Validation errors stay inside the form; everything else becomes a notice.
    pub fn is_inline(&self) -> bool {
        matches!(self, AdminError::Validation { .. })
    }
}
