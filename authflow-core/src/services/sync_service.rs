//! Reconciliation of local Identify records against the identify plugin

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, CredentialService, IdentifyGateway};
use crate::types::SyncReport;

/// Extract the credential ids from a `getVCs` payload.
///
/// Items without a string `metadata.id` are logged and skipped. Duplicates are
/// collapsed, first occurrence wins.
pub fn extract_remote_ids(payload: &Value) -> CoreResult<Vec<String>> {
    let items = payload.as_array().ok_or_else(|| {
        CoreError::MalformedData("Remote credential list is not an array".to_string())
    })?;

    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item.pointer("/metadata/id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => {
                if seen.insert(id) {
                    ids.push(id.to_string());
                }
            }
            _ => log::warn!("Skipping remote credential #{index}: missing metadata.id"),
        }
    }

    Ok(ids)
}

/// Reconciliation engine
pub struct SyncService {
    credentials: Arc<CredentialService>,
    gateway: Arc<IdentifyGateway>,
}

impl SyncService {
    #[must_use]
    pub fn new(credentials: Arc<CredentialService>, gateway: Arc<IdentifyGateway>) -> Self {
        Self {
            credentials,
            gateway,
        }
    }

    /// Align local Identify records with the remote credential id set.
    ///
    /// Missing remote ids are inserted with the id as description, local records
    /// whose id is gone remotely are removed. Basic records are never touched.
    pub async fn sync_credentials(&self) -> CoreResult<SyncReport> {
        if let Err(e) = self.gateway.sync_google_credentials().await {
            log::warn!("Cloud sync side effect failed, continuing: {e}");
        }

        let remote_ids = self
            .gateway
            .list_remote_credentials()
            .await
            .and_then(|payload| extract_remote_ids(&payload))
            .inspect_err(|e| log_failure("sync_credentials", e))?;

        let added = self.credentials.add_identify_references(&remote_ids).await?;

        let keep: HashSet<String> = remote_ids.into_iter().collect();
        let removed = self.credentials.retain_identify_references(&keep).await?;

        let report = SyncReport { added, removed };
        if report.is_noop() {
            log::info!("Credentials already in sync");
        } else {
            log::info!(
                "Sync added {} and removed {} identify credential(s)",
                report.added.len(),
                report.removed.len()
            );
        }
        Ok(report)
    }
}
