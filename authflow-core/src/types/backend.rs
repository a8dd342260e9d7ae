//! Identify plugin backend selection

use serde::{Deserialize, Serialize};

/// Default identify plugin id
pub const DEFAULT_IDENTIFY_SNAP_ID: &str = "npm:@tuum-tech/identify";

/// Storage location used by the identify plugin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    /// Plugin-local storage
    Snap,
    /// Cloud-drive backed storage (requires the user to link an account)
    GoogleDrive,
}

impl StorageBackend {
    /// Name understood by the identify plugin
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snap => "snap",
            Self::GoogleDrive => "googleDrive",
        }
    }
}

/// Two-tier backend list.
///
/// Requests go to `primary` first. On any failure they are repeated once
/// against `fallback`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendPolicy {
    pub primary: Vec<StorageBackend>,
    pub fallback: Vec<StorageBackend>,
}

impl Default for BackendPolicy {
    fn default() -> Self {
        Self {
            primary: vec![StorageBackend::Snap, StorageBackend::GoogleDrive],
            fallback: vec![StorageBackend::Snap],
        }
    }
}

/// Remote gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Identify plugin id passed to `wallet_invokeSnap`
    pub snap_id: String,
    /// Backend lists
    pub policy: BackendPolicy,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            snap_id: DEFAULT_IDENTIFY_SNAP_ID.to_string(),
            policy: BackendPolicy::default(),
        }
    }
}
