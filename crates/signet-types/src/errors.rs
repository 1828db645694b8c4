//! Error taxonomy for Signet operations
//!
//! Every kind here is terminal for the request that raised it; the engine
//! never retries on its own. Messages are written to be shown directly in
//! a UI surface.

use thiserror::Error;

/// Errors surfaced by Signet operations
#[derive(Debug, Error)]
pub enum SignetError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Document has expired")]
    Expired,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl SignetError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn quota(msg: impl Into<String>) -> Self {
        Self::QuotaExceeded(msg.into())
    }
}

/// Result type alias for Signet operations
pub type SignetResult<T> = Result<T, SignetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_user_facing() {
        let err = SignetError::invalid_state("Only draft documents can be sent");
        assert_eq!(err.to_string(), "Only draft documents can be sent");

        let err = SignetError::not_found("Document");
        assert_eq!(err.to_string(), "Document not found");
    }
}
