use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback text shown when a failure carries no usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Error, please try again";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No {entity} found with id '{id}'")]
    NotFound { entity: &'static str, id: String },

    #[error("Foreign key constraint failed: {0}")]
    ForeignKey(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// One field-level problem found while parsing untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub path: Vec<String>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: impl Into<String>, field: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            path: if field.is_empty() {
                Vec::new()
            } else {
                vec![field.to_string()]
            },
            message: message.into(),
        }
    }

    pub fn required(field: &str) -> Self {
        Self::new("invalid_type", field, "Required")
    }

    pub fn invalid_type(field: &str, expected: &str) -> Self {
        Self::new("invalid_type", field, format!("Expected {expected}"))
    }

    pub fn path_label(&self) -> String {
        self.path.join(".")
    }
}

/// The single error shape mutation functions hand back to their callers.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{error}")]
pub struct MutationError {
    pub error: String,
}

impl MutationError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self {
                error: GENERIC_ERROR_MESSAGE.to_string(),
            }
        } else {
            Self { error: message }
        }
    }
}

impl From<StoreError> for MutationError {
    fn from(err: StoreError) -> Self {
        let message = err.to_string();
        tracing::error!(error = %message, "entity store call failed");
        Self::new(message)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("validation failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error(transparent)]
    Mutation(#[from] MutationError),
}

impl From<Vec<ValidationIssue>> for ServiceError {
    fn from(issues: Vec<ValidationIssue>) -> Self {
        Self::Validation(issues)
    }
}
