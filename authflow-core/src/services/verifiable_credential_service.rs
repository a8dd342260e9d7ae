//! Verifiable credential lifecycle
//!
//! Operations that touch both the local Identify records and the identify
//! plugin.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, CredentialService, IdentifyGateway};
use crate::types::{
    CredentialData, CredentialKind, CredentialRecord, IdentifyCredential, StorageBackend,
};

/// Key of the demo credential created by [`VerifiableCredentialService::seed_sample_credential`]
pub const SAMPLE_CREDENTIAL_KEY: &str = "Sample Authflow Credential";

/// `name` field of the demo credential
pub const SAMPLE_CREDENTIAL_NAME: &str = "My Sample Authflow Credential";

pub struct VerifiableCredentialService {
    credentials: Arc<CredentialService>,
    gateway: Arc<IdentifyGateway>,
}

impl VerifiableCredentialService {
    #[must_use]
    pub fn new(credentials: Arc<CredentialService>, gateway: Arc<IdentifyGateway>) -> Self {
        Self {
            credentials,
            gateway,
        }
    }

    /// Remote credential behind the local Identify record labelled `description`.
    ///
    /// `None` when there is no such record or the remote lookup failed.
    pub async fn get_identity_credential_for_description(&self, description: &str) -> Option<Value> {
        let reference = self
            .credentials
            .get_identify_credential_for_description(description)
            .await?;

        match self.gateway.find_remote_credential(&reference.id).await {
            Ok(credential) => Some(credential),
            Err(e) => {
                log_failure("get_identity_credential_for_description", &e);
                None
            }
        }
    }

    /// Delete the Identify records labelled `description`, locally and remotely.
    ///
    /// Remote removal is best-effort; the next sync restores anything that
    /// could not be removed.
    ///
    /// # Returns
    /// * Ids of the removed records
    pub async fn delete_verified_credential(&self, description: &str) -> CoreResult<Vec<String>> {
        let removed = self
            .credentials
            .delete_by_description(description, CredentialKind::Identify)
            .await?;
        if removed.is_empty() {
            return Err(CoreError::CredentialNotFound(description.to_string()));
        }

        let ids: Vec<String> = removed
            .iter()
            .filter_map(CredentialRecord::identify_id)
            .map(str::to_string)
            .collect();
        for id in &ids {
            if let Err(e) = self.gateway.clear_remote(id).await {
                log::warn!("Could not remove remote credential {id}: {e}");
            }
        }

        Ok(ids)
    }

    /// Drop every local Identify record, then every remote credential
    ///
    /// # Returns
    /// * Number of local records removed
    pub async fn clear_verifiable_credentials(&self) -> CoreResult<usize> {
        let removed = self
            .credentials
            .clear_all_of_type(CredentialKind::Identify)
            .await?;
        self.gateway
            .clear_all_remote()
            .await
            .inspect_err(|e| log_failure("clear_verifiable_credentials", e))?;
        Ok(removed)
    }

    /// Create the demo credential remotely and reference it locally.
    ///
    /// The local record's description is the new credential id.
    ///
    /// # Returns
    /// * The new credential id
    pub async fn seed_sample_credential(&self) -> CoreResult<String> {
        let backend = StorageBackend::Snap;
        let created = self
            .gateway
            .create_vc(
                SAMPLE_CREDENTIAL_KEY,
                json!({ "name": SAMPLE_CREDENTIAL_NAME }),
                &[backend],
            )
            .await?;

        let id = created
            .pointer("/metadata/id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                CoreError::MalformedData("createVC result has no metadata.id".to_string())
            })
            .inspect_err(|e| log_failure("seed_sample_credential", e))?
            .to_string();

        self.credentials
            .set_credential(CredentialRecord {
                description: id.clone(),
                data: CredentialData::Identify(IdentifyCredential {
                    id: id.clone(),
                    store: Some(backend.as_str().to_string()),
                }),
            })
            .await?;

        log::info!("Seeded sample credential {id}");
        Ok(id)
    }
}
