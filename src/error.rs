use thiserror::Error;

/// Failure taxonomy for AIMS operations.
///
/// Every variant names the operation it originated from so callers can tell
/// bad input apart from a missing resource or an unavailable service.
/// `Validation` is always raised locally, before anything reaches the
/// transport; the remaining variants are raised by (or passed through from)
/// the transport unmodified.
#[derive(Debug, Error)]
pub enum AimsError {
    #[error("{operation}: invalid request: {message}")]
    Validation {
        operation: &'static str,
        message: String,
    },

    #[error("{operation}: authentication rejected: {message}")]
    Auth {
        operation: &'static str,
        message: String,
    },

    #[error("{operation}: resource not found at {path}")]
    NotFound {
        operation: &'static str,
        path: String,
    },

    #[error("{operation}: rate limited")]
    RateLimit {
        operation: &'static str,
        /// Seconds the caller should wait, when the service said so.
        retry_after: Option<u64>,
    },

    #[error("{operation}: transport failure: {source}")]
    Network {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{operation}: malformed response: {detail}")]
    ContractViolation {
        operation: &'static str,
        detail: String,
    },
}

impl AimsError {
    pub(crate) fn validation(operation: &'static str, message: impl Into<String>) -> Self {
        AimsError::Validation {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn auth(operation: &'static str, message: impl Into<String>) -> Self {
        AimsError::Auth {
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn contract(operation: &'static str, detail: impl Into<String>) -> Self {
        AimsError::ContractViolation {
            operation,
            detail: detail.into(),
        }
    }

    /// Operation the failure originated from.
    pub fn operation(&self) -> &'static str {
        match self {
            AimsError::Validation { operation, .. }
            | AimsError::Auth { operation, .. }
            | AimsError::NotFound { operation, .. }
            | AimsError::RateLimit { operation, .. }
            | AimsError::Network { operation, .. }
            | AimsError::ContractViolation { operation, .. } => operation,
        }
    }
}
