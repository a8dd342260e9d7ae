//! Credential store service
//!
//! CRUD and queries over the credential collection kept in the host blob.
//! Every operation reads the full collection, works on it in memory and, for
//! writes, replaces the full collection. Reads fail soft; writes are guarded by
//! the store's version token and re-run when another writer got there first.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_failure, ServiceContext};
use crate::types::{
    decode_collection, decode_state, encode_state, BasicCredential, CredentialCollection,
    CredentialKind, CredentialRecord, DecodedState, IdentifyCredential,
};

/// Read-modify-write attempts before a conflict is reported
const MAX_WRITE_ATTEMPTS: usize = 3;

/// Result of an in-memory mutation
struct Mutation<T> {
    value: T,
    changed: bool,
}

impl<T> Mutation<T> {
    fn changed(value: T) -> Self {
        Self {
            value,
            changed: true,
        }
    }

    fn unchanged(value: T) -> Self {
        Self {
            value,
            changed: false,
        }
    }
}

/// Credential store service
pub struct CredentialService {
    ctx: Arc<ServiceContext>,
}

impl CredentialService {
    /// Create a credential service instance
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== Queries =====

    /// Whole collection.
    ///
    /// `None` when nothing has been stored yet or the host read failed.
    pub async fn get_all(&self) -> Option<CredentialCollection> {
        match self.ctx.state_store().get().await {
            Ok(snapshot) => {
                let state = snapshot.state?;
                match decode_collection(Some(state)) {
                    Ok(collection) => Some(collection),
                    Err(e) => {
                        log_failure("get_all", &e);
                        None
                    }
                }
            }
            Err(e) => {
                log_failure("get_all", &e);
                None
            }
        }
    }

    /// Username/password of the first Basic record with `description`
    pub async fn get_basic_credentials_for_description(
        &self,
        description: &str,
    ) -> Option<BasicCredential> {
        self.get_all()
            .await?
            .into_values()
            .filter(|record| record.description == description)
            .find_map(|record| record.as_basic().cloned())
            .or_else(|| {
                log::debug!("No basic credential for description {description}");
                None
            })
    }

    /// Remote reference of the first Identify record with `description`
    pub async fn get_identify_credential_for_description(
        &self,
        description: &str,
    ) -> Option<IdentifyCredential> {
        self.get_all()
            .await?
            .into_values()
            .filter(|record| record.description == description)
            .find_map(|record| record.as_identify().cloned())
    }

    /// Resolve display labels to remote ids, in the order given.
    ///
    /// Names without a matching Identify record are skipped.
    pub async fn get_identify_ids_for_names(&self, names: &[String]) -> Vec<String> {
        let Some(collection) = self.get_all().await else {
            return Vec::new();
        };

        names
            .iter()
            .filter_map(|name| {
                let id = collection
                    .values()
                    .filter(|record| &record.description == name)
                    .find_map(CredentialRecord::identify_id);
                if id.is_none() {
                    log::warn!("No identify credential named {name}");
                }
                id.map(str::to_string)
            })
            .collect()
    }

    /// Records whose description contains `term`
    pub async fn search(&self, term: &str) -> CredentialCollection {
        let mut collection = self.get_all().await.unwrap_or_default();
        collection.retain(|_, record| record.description.contains(term));
        collection
    }

    /// Log every stored key, description and type. Secrets are never printed.
    pub async fn log_summary(&self) {
        let Some(collection) = self.get_all().await else {
            log::info!("No credentials found.");
            return;
        };

        log::info!("{} credential(s) stored", collection.len());
        for (key, record) in &collection {
            match record.identify_id() {
                Some(id) => log::info!(
                    "Key: {key}, Type: {}, Description: {}, Id: {id}",
                    record.kind(),
                    record.description
                ),
                None => log::info!(
                    "Key: {key}, Type: {}, Description: {}",
                    record.kind(),
                    record.description
                ),
            }
        }
    }

    // ===== Writes =====

    /// Store a new record under a freshly generated key
    ///
    /// # Returns
    /// * The generated key
    pub async fn set_credential(&self, record: CredentialRecord) -> CoreResult<String> {
        self.mutate("set_credential", |collection| {
            let mut key = uuid::Uuid::new_v4().to_string();
            while collection.contains_key(&key) {
                key = uuid::Uuid::new_v4().to_string();
            }
            collection.insert(key.clone(), record.clone());
            Mutation::changed(key)
        })
        .await
        .inspect(|key| log::info!("Stored {} credential {key}", record.kind()))
        .inspect_err(|e| log_failure("set_credential", e))
    }

    /// Delete every record of `kind` with `description`
    ///
    /// # Returns
    /// * The removed records
    pub async fn delete_by_description(
        &self,
        description: &str,
        kind: CredentialKind,
    ) -> CoreResult<Vec<CredentialRecord>> {
        self.mutate("delete_by_description", |collection| {
            let doomed: Vec<String> = collection
                .iter()
                .filter(|(_, record)| record.kind() == kind && record.description == description)
                .map(|(key, _)| key.clone())
                .collect();
            let removed: Vec<CredentialRecord> = doomed
                .iter()
                .filter_map(|key| collection.remove(key))
                .collect();
            let changed = !removed.is_empty();
            Mutation { value: removed, changed }
        })
        .await
        .inspect_err(|e| log_failure("delete_by_description", e))
    }

    /// Delete all records of `kind`, leaving the other kind untouched
    ///
    /// # Returns
    /// * Number of removed records
    pub async fn clear_all_of_type(&self, kind: CredentialKind) -> CoreResult<usize> {
        self.mutate("clear_all_of_type", |collection| {
            let before = collection.len();
            collection.retain(|_, record| record.kind() != kind);
            let removed = before - collection.len();
            Mutation {
                value: removed,
                changed: removed > 0,
            }
        })
        .await
        .inspect(|removed| log::info!("Cleared {removed} {kind} credential(s)"))
        .inspect_err(|e| log_failure("clear_all_of_type", e))
    }

    /// Drop the whole host blob
    pub async fn clear_all(&self) -> CoreResult<()> {
        self.ctx
            .state_store()
            .clear()
            .await
            .inspect_err(|e| log_failure("clear_all", e))
    }

    /// Set the description of the Identify record(s) pointing at `id`
    ///
    /// # Returns
    /// * `true` if at least one record matched
    pub async fn rename_identify_credential(&self, id: &str, new_name: &str) -> CoreResult<bool> {
        let renamed = self
            .mutate("rename_identify_credential", |collection| {
                let mut matched = false;
                for record in collection.values_mut() {
                    if record.identify_id() == Some(id) {
                        record.description = new_name.to_string();
                        matched = true;
                    }
                }
                if matched {
                    Mutation::changed(true)
                } else {
                    Mutation::unchanged(false)
                }
            })
            .await
            .inspect_err(|e| log_failure("rename_identify_credential", e))?;

        if !renamed {
            log::warn!("No identify credential with id {id}, nothing renamed");
        }
        Ok(renamed)
    }

    /// Insert an Identify record for every id not referenced locally yet.
    ///
    /// New records use the id as their description.
    ///
    /// # Returns
    /// * The ids that were inserted
    pub async fn add_identify_references(&self, ids: &[String]) -> CoreResult<Vec<String>> {
        self.mutate("add_identify_references", |collection| {
            let mut known: HashSet<String> = collection
                .values()
                .filter_map(CredentialRecord::identify_id)
                .map(str::to_string)
                .collect();

            let mut added = Vec::new();
            for id in ids {
                if known.insert(id.clone()) {
                    collection.insert(
                        uuid::Uuid::new_v4().to_string(),
                        CredentialRecord::identify(id.clone(), id.clone()),
                    );
                    added.push(id.clone());
                }
            }
            let changed = !added.is_empty();
            Mutation { value: added, changed }
        })
        .await
        .inspect_err(|e| log_failure("add_identify_references", e))
    }

    /// Remove every Identify record whose id is not in `ids`
    ///
    /// # Returns
    /// * The ids that were removed
    pub async fn retain_identify_references(
        &self,
        ids: &HashSet<String>,
    ) -> CoreResult<Vec<String>> {
        self.mutate("retain_identify_references", |collection| {
            let mut removed = Vec::new();
            collection.retain(|_, record| match record.identify_id() {
                Some(id) if !ids.contains(id) => {
                    removed.push(id.to_string());
                    false
                }
                _ => true,
            });
            let changed = !removed.is_empty();
            Mutation { value: removed, changed }
        })
        .await
        .inspect_err(|e| log_failure("retain_identify_references", e))
    }

    // ===== Internals =====

    async fn load(&self) -> CoreResult<(DecodedState, u64)> {
        let snapshot = self.ctx.state_store().get().await?;
        Ok((decode_state(snapshot.state)?, snapshot.version))
    }

    /// Run `apply` against the current collection and write the result back.
    ///
    /// Unchanged collections are not written. Entries that could not be
    /// decoded are written back as they were. On a version conflict the whole
    /// cycle is repeated against a fresh read.
    async fn mutate<T, F>(&self, operation: &str, mut apply: F) -> CoreResult<T>
    where
        F: FnMut(&mut CredentialCollection) -> Mutation<T> + Send,
        T: Send,
    {
        let mut attempt = 1;
        loop {
            let (mut state, version) = self.load().await?;
            let Mutation { value, changed } = apply(&mut state.collection);
            if !changed {
                log::debug!("{operation}: nothing changed, skipping write");
                return Ok(value);
            }

            let encoded = encode_state(&state)?;
            match self.ctx.state_store().update(encoded, version).await {
                Ok(_) => return Ok(value),
                Err(CoreError::StateConflict { expected, actual })
                    if attempt < MAX_WRITE_ATTEMPTS =>
                {
                    log::warn!(
                        "{operation}: state changed underneath (v{expected} -> v{actual}), retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
