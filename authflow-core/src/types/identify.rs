//! Identify plugin request and sync result types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StorageBackend;

/// `options` object of an identify request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreOptions {
    pub store: Vec<StorageBackend>,
}

/// `getVCs` filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VcFilter {
    #[serde(rename = "type")]
    pub kind: String,
    pub filter: String,
}

impl VcFilter {
    /// Match a single credential by id
    #[must_use]
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            kind: "id".to_string(),
            filter: id.into(),
        }
    }
}

/// Parameters sent with every identify plugin method.
///
/// Only the fields a method needs are populated; unset fields are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyParams {
    pub metamask_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<VcFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vc_ids: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<StoreOptions>,
}

impl IdentifyParams {
    #[must_use]
    pub fn new(metamask_address: impl Into<String>) -> Self {
        Self {
            metamask_address: metamask_address.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_store(mut self, backends: &[StorageBackend]) -> Self {
        self.options = Some(StoreOptions {
            store: backends.to_vec(),
        });
        self
    }
}

/// Outcome of a reconciliation run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    /// Remote ids inserted locally
    pub added: Vec<String>,
    /// Local ids removed because they no longer exist remotely
    pub removed: Vec<String>,
}

impl SyncReport {
    /// True when the run changed nothing
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unset_fields_are_omitted() {
        let params = IdentifyParams::new("0xabc").with_store(&[StorageBackend::Snap]);
        assert_eq!(
            serde_json::to_value(params).unwrap(),
            json!({ "metamaskAddress": "0xabc", "options": { "store": ["snap"] } })
        );
    }

    #[test]
    fn id_filter_shape() {
        let params = IdentifyParams {
            filter: Some(VcFilter::by_id("vc-1")),
            ..IdentifyParams::new("0xabc")
        };
        assert_eq!(
            serde_json::to_value(params).unwrap()["filter"],
            json!({ "type": "id", "filter": "vc-1" })
        );
    }
}
