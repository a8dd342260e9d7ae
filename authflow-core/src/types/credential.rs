//! Credential record types
//!
//! Records are persisted as `{description, type, credentialData}` objects. The
//! `type` tag decides the shape of `credentialData`, so every record passes
//! through [`RawCredentialRecord`] and is validated on the way in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// Credential type tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Username/password pair
    #[serde(alias = "basic")]
    Basic,
    /// Pointer to a verifiable credential held by the identify plugin
    #[serde(alias = "identify")]
    Identify,
}

impl CredentialKind {
    /// Canonical tag as written to storage
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Identify => "Identify",
        }
    }
}

impl std::fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Username/password pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasicCredential {
    pub username: String,
    pub password: String,
}

/// Remote verifiable credential reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentifyCredential {
    /// Opaque id understood by the identify plugin
    pub id: String,
    /// Backend hint recorded by older revisions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

/// Variant payload of a credential record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialData {
    Basic(BasicCredential),
    Identify(IdentifyCredential),
}

/// A single stored credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCredentialRecord", into = "RawCredentialRecord")]
pub struct CredentialRecord {
    /// User-chosen display label, not unique
    pub description: String,
    /// Typed payload
    pub data: CredentialData,
}

impl CredentialRecord {
    /// Create a Basic record
    #[must_use]
    pub fn basic(
        description: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            data: CredentialData::Basic(BasicCredential {
                username: username.into(),
                password: password.into(),
            }),
        }
    }

    /// Create an Identify record pointing at a remote credential id
    #[must_use]
    pub fn identify(description: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            data: CredentialData::Identify(IdentifyCredential {
                id: id.into(),
                store: None,
            }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> CredentialKind {
        match self.data {
            CredentialData::Basic(_) => CredentialKind::Basic,
            CredentialData::Identify(_) => CredentialKind::Identify,
        }
    }

    #[must_use]
    pub fn as_basic(&self) -> Option<&BasicCredential> {
        match &self.data {
            CredentialData::Basic(basic) => Some(basic),
            CredentialData::Identify(_) => None,
        }
    }

    #[must_use]
    pub fn as_identify(&self) -> Option<&IdentifyCredential> {
        match &self.data {
            CredentialData::Identify(identify) => Some(identify),
            CredentialData::Basic(_) => None,
        }
    }

    /// Remote id, for Identify records only
    #[must_use]
    pub fn identify_id(&self) -> Option<&str> {
        self.as_identify().map(|identify| identify.id.as_str())
    }
}

/// Storage shape of a credential record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCredentialRecord {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: CredentialKind,
    pub credential_data: Value,
}

impl TryFrom<RawCredentialRecord> for CredentialRecord {
    type Error = CoreError;

    fn try_from(raw: RawCredentialRecord) -> CoreResult<Self> {
        let data = match raw.kind {
            CredentialKind::Basic => {
                CredentialData::Basic(serde_json::from_value(raw.credential_data).map_err(
                    |e| CoreError::MalformedData(format!("Basic credential data: {e}")),
                )?)
            }
            CredentialKind::Identify => {
                CredentialData::Identify(serde_json::from_value(raw.credential_data).map_err(
                    |e| CoreError::MalformedData(format!("Identify credential data: {e}")),
                )?)
            }
        };

        Ok(Self {
            description: raw.description,
            data,
        })
    }
}

impl From<CredentialRecord> for RawCredentialRecord {
    fn from(record: CredentialRecord) -> Self {
        let kind = record.kind();
        let credential_data = match record.data {
            CredentialData::Basic(basic) => serde_json::json!({
                "username": basic.username,
                "password": basic.password,
            }),
            CredentialData::Identify(identify) => match identify.store {
                Some(store) => serde_json::json!({ "id": identify.id, "store": store }),
                None => serde_json::json!({ "id": identify.id }),
            },
        };

        Self {
            description: record.description,
            kind,
            credential_data,
        }
    }
}

/// Credential mapping type: generated key (UUID) -> record
pub type CredentialCollection = HashMap<String, CredentialRecord>;

/// Host blob split into typed records and entries that could not be read
#[derive(Debug, Clone, Default)]
pub struct DecodedState {
    pub collection: CredentialCollection,
    /// Undecodable entries, written back unchanged by [`encode_state`]
    pub unreadable: Map<String, Value>,
}

/// Decode the host blob.
///
/// `None` and `null` decode to an empty state. Plain `"username password"`
/// strings stored under their description are read as Basic records. Other
/// entries that fail validation are logged and set aside in `unreadable`.
pub fn decode_state(state: Option<Value>) -> CoreResult<DecodedState> {
    let entries = match state {
        None | Some(Value::Null) => return Ok(DecodedState::default()),
        Some(Value::Object(entries)) => entries,
        Some(other) => {
            return Err(CoreError::MalformedData(format!(
                "Expected credential object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut decoded = DecodedState {
        collection: CredentialCollection::with_capacity(entries.len()),
        unreadable: Map::new(),
    };
    for (key, value) in entries {
        if let Value::String(text) = &value {
            log::info!("Reading plain-text credential {key} as Basic");
            let record = legacy_basic(&key, text);
            decoded.collection.insert(key, record);
            continue;
        }

        match serde_json::from_value::<CredentialRecord>(value.clone()) {
            Ok(record) => {
                decoded.collection.insert(key, record);
            }
            Err(e) => {
                log::warn!("Skipping malformed credential entry {key}: {e}");
                decoded.unreadable.insert(key, value);
            }
        }
    }

    Ok(decoded)
}

/// Typed view of the host blob, without the unreadable entries
pub fn decode_collection(state: Option<Value>) -> CoreResult<CredentialCollection> {
    decode_state(state).map(|decoded| decoded.collection)
}

/// Encode a decoded state, unreadable entries included
pub fn encode_state(decoded: &DecodedState) -> CoreResult<Value> {
    let mut entries = decoded.unreadable.clone();
    for (key, record) in &decoded.collection {
        entries.insert(key.clone(), serde_json::to_value(record)?);
    }
    Ok(Value::Object(entries))
}

/// `"username password"`, split on the first space
fn legacy_basic(description: &str, text: &str) -> CredentialRecord {
    let (username, password) = text.split_once(' ').unwrap_or((text, ""));
    CredentialRecord::basic(description, username, password)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
