use serde::Serialize;

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse failure classes reported to clients so they can choose between
/// retrying, surfacing the message, or giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Malformed input; rejected before the store is touched.
    Validation,
    /// A precondition on the user or machine is not met. Retrying the same
    /// call without changing conditions fails the same way.
    Eligibility,
    /// The referenced entity does not exist.
    NotFound,
    /// Server-side data is inconsistent (broken odds table, unknown reward).
    Integrity,
    /// The request collides with existing state.
    Conflict,
    /// Lock or timeout failure. The identical call is safe to retry.
    Transient,
    /// Anything else.
    Internal,
}

impl ErrorClass {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Eligibility => "eligibility",
            Self::NotFound => "not_found",
            Self::Integrity => "integrity",
            Self::Conflict => "conflict",
            Self::Transient => "transient",
            Self::Internal => "internal",
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient)
    }
}

impl CoreError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::Validation(_) => ErrorClass::Validation,
            Self::Conflict(_) => ErrorClass::Conflict,
            Self::Unauthorized(_) | Self::Forbidden(_) => ErrorClass::Eligibility,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }
}
