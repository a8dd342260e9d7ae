//! JSON-RPC error returned to the calling site

use authflow_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard and provider error codes
pub mod code {
    /// Request line is not valid JSON-RPC
    pub const PARSE_ERROR: i64 = -32700;
    /// Invalid method parameters
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error, also used for unknown methods
    pub const INTERNAL_ERROR: i64 = -32603;
    /// The user rejected the request
    pub const USER_REJECTED: i64 = 4001;
}

/// JSON-RPC error object
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_params(detail: &str) -> Self {
        Self::new(code::INVALID_PARAMS, format!("Invalid params: {detail}"))
    }

    #[must_use]
    pub fn parse_error(detail: &str) -> Self {
        Self::new(code::PARSE_ERROR, format!("Parse error: {detail}"))
    }

    #[must_use]
    pub fn user_rejected() -> Self {
        Self::new(code::USER_REJECTED, "User rejected the request.")
    }

    #[must_use]
    pub fn method_not_found() -> Self {
        Self::new(code::INTERNAL_ERROR, "Method not found.")
    }

    #[must_use]
    pub fn credential_not_found() -> Self {
        Self::new(code::INTERNAL_ERROR, "Credential not found.")
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(code::INTERNAL_ERROR, message)
    }
}

impl From<CoreError> for RpcError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UserRejected => Self::user_rejected(),
            CoreError::CredentialNotFound(_) => Self::credential_not_found(),
            CoreError::ValidationError(detail) => Self::invalid_params(&detail),
            other => Self::internal(other.to_string()),
        }
    }
}
