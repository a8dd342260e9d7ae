//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Credential not found
    #[error("Credential not found: {0}")]
    CredentialNotFound(String),

    /// No usable account could be resolved from the host wallet
    #[error("No usable account available")]
    AccountUnavailable,

    /// External identify plugin request failed (cause is logged, not exposed)
    #[error("Identify request '{method}' failed: likely external account not configured")]
    IdentifyUnavailable { method: String },

    /// Host state store error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Stale write rejected by the state store
    #[error("State conflict: expected version {expected}, found {actual}")]
    StateConflict { expected: u64, actual: u64 },

    /// Host RPC transport error
    #[error("Host request '{method}' failed: {message}")]
    HostError { method: String, message: String },

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Stored or remote data does not have the expected shape
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The user declined a confirmation dialog
    #[error("User rejected the request")]
    UserRejected,
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::CredentialNotFound(_)
                | Self::AccountUnavailable
                | Self::IdentifyUnavailable { .. }
                | Self::StateConflict { .. }
                | Self::ValidationError(_)
                | Self::UserRejected
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
