// ⚠️ Errors for the service and storage boundary.
// The pure stats modules never return these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DashboardError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        DashboardError::Conflict(message.into())
    }
}

impl From<rusqlite::Error> for DashboardError {
    fn from(err: rusqlite::Error) -> Self {
        DashboardError::Storage(err.into())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

/// Text column or query value that does not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: &str) -> Self {
        UnknownVariant {
            kind,
            value: value.to_string(),
        }
    }
}

impl From<UnknownVariant> for DashboardError {
    fn from(err: UnknownVariant) -> Self {
        DashboardError::Validation {
            field: err.kind,
            reason: format!("unknown value '{}'", err.value),
        }
    }
}
