//! Remote credential gateway
//!
//! Facade over the identify plugin reached through `wallet_invokeSnap`. Every
//! request carries the active account and a storage backend list; failures of
//! any kind surface as a single `IdentifyUnavailable` error while the cause is
//! only logged.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::services::{AccountResolver, CredentialService, ServiceContext};
use crate::types::{GatewayConfig, IdentifyParams, StorageBackend, VcFilter};
use crate::utils::truncate_for_log;

/// Identify plugin method names
mod method {
    pub const GET_VCS: &str = "getVCs";
    pub const CREATE_VC: &str = "createVC";
    pub const CREATE_VP: &str = "createVP";
    pub const DELETE_ALL_VCS: &str = "deleteAllVCs";
    pub const REMOVE_VC: &str = "removeVC";
    pub const SYNC_GOOGLE_VCS: &str = "syncGoogleVCs";
}

/// Longest remote error message kept in logs
const MAX_LOGGED_CAUSE: usize = 300;

/// Remote credential gateway
pub struct IdentifyGateway {
    ctx: Arc<ServiceContext>,
    accounts: AccountResolver,
    credentials: Arc<CredentialService>,
    config: GatewayConfig,
}

impl IdentifyGateway {
    #[must_use]
    pub fn new(
        ctx: Arc<ServiceContext>,
        credentials: Arc<CredentialService>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            accounts: AccountResolver::new(Arc::clone(&ctx)),
            ctx,
            credentials,
            config,
        }
    }

    /// Gateway configuration in use
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    // ===== Single-tier operations =====

    /// All remote credentials on `backends`, serialized to JSON text
    pub async fn get_verifiable_credentials(
        &self,
        backends: &[StorageBackend],
    ) -> CoreResult<String> {
        let result = self.invoke(method::GET_VCS, backends, |p| p).await?;
        Ok(result.to_string())
    }

    /// Remote credential with exactly `id`
    pub async fn get_vc_for_key(
        &self,
        backends: &[StorageBackend],
        id: &str,
    ) -> CoreResult<Value> {
        self.invoke(method::GET_VCS, backends, |p| IdentifyParams {
            filter: Some(VcFilter::by_id(id)),
            ..p
        })
        .await
    }

    /// Presentation over the credentials whose local labels are `names`
    pub async fn create_vp_from_vcs(
        &self,
        names: &[String],
        backends: &[StorageBackend],
    ) -> CoreResult<Value> {
        let ids = self.resolve_names(names).await?;
        self.invoke(method::CREATE_VP, backends, move |p| IdentifyParams {
            vc_ids: Some(ids),
            ..p
        })
        .await
    }

    /// Issue a new credential storing `value` under `key`
    pub async fn create_vc(
        &self,
        key: &str,
        value: Value,
        backends: &[StorageBackend],
    ) -> CoreResult<Value> {
        self.invoke(method::CREATE_VC, backends, move |p| IdentifyParams {
            vc_key: Some(key.to_string()),
            vc_value: Some(value),
            ..p
        })
        .await
    }

    /// Delete every remote credential on `backends`
    pub async fn clear_all_identify_credentials(
        &self,
        backends: &[StorageBackend],
    ) -> CoreResult<String> {
        let result = self.invoke(method::DELETE_ALL_VCS, backends, |p| p).await?;
        Ok(result.to_string())
    }

    /// Delete the remote credential `id` on `backends`
    pub async fn clear_identify_credential(
        &self,
        backends: &[StorageBackend],
        id: &str,
    ) -> CoreResult<String> {
        let result = self
            .invoke(method::REMOVE_VC, backends, |p| IdentifyParams {
                id: Some(vec![id.to_string()]),
                ..p
            })
            .await?;
        Ok(result.to_string())
    }

    /// Ask the plugin to pull credentials from the linked cloud drive
    pub async fn sync_google_credentials(&self) -> CoreResult<Value> {
        self.invoke(method::SYNC_GOOGLE_VCS, &[], |p| p).await
    }

    // ===== Policy-driven operations =====

    /// Remote credential list as returned by the plugin
    pub async fn list_remote_credentials(&self) -> CoreResult<Value> {
        self.invoke_with_fallback(method::GET_VCS, |p| p).await
    }

    pub async fn find_remote_credential(&self, id: &str) -> CoreResult<Value> {
        self.invoke_with_fallback(method::GET_VCS, |p| IdentifyParams {
            filter: Some(VcFilter::by_id(id)),
            ..p
        })
        .await
    }

    pub async fn create_presentation(&self, names: &[String]) -> CoreResult<Value> {
        let ids = self.resolve_names(names).await?;
        self.invoke_with_fallback(method::CREATE_VP, |p| IdentifyParams {
            vc_ids: Some(ids.clone()),
            ..p
        })
        .await
    }

    pub async fn create_remote_credential(&self, key: &str, value: Value) -> CoreResult<Value> {
        self.invoke_with_fallback(method::CREATE_VC, |p| IdentifyParams {
            vc_key: Some(key.to_string()),
            vc_value: Some(value.clone()),
            ..p
        })
        .await
    }

    pub async fn clear_all_remote(&self) -> CoreResult<String> {
        let result = self
            .invoke_with_fallback(method::DELETE_ALL_VCS, |p| p)
            .await?;
        Ok(result.to_string())
    }

    pub async fn clear_remote(&self, id: &str) -> CoreResult<String> {
        let result = self
            .invoke_with_fallback(method::REMOVE_VC, |p| IdentifyParams {
                id: Some(vec![id.to_string()]),
                ..p
            })
            .await?;
        Ok(result.to_string())
    }

    // ===== Internals =====

    async fn resolve_names(&self, names: &[String]) -> CoreResult<Vec<String>> {
        let ids = self.credentials.get_identify_ids_for_names(names).await;
        if ids.is_empty() {
            log::warn!("None of {names:?} resolve to an identify credential");
            return Err(CoreError::CredentialNotFound(names.join(",")));
        }
        Ok(ids)
    }

    /// Try the primary backend list, then the fallback list once
    async fn invoke_with_fallback<F>(&self, method: &str, customize: F) -> CoreResult<Value>
    where
        F: Fn(IdentifyParams) -> IdentifyParams + Send + Sync,
    {
        let policy = &self.config.policy;
        match self.invoke(method, &policy.primary, &customize).await {
            Ok(value) => Ok(value),
            Err(e) if policy.fallback.is_empty() || policy.fallback == policy.primary => Err(e),
            Err(_) => {
                log::warn!(
                    "{method} failed on {:?}, retrying with {:?}",
                    policy.primary,
                    policy.fallback
                );
                self.invoke(method, &policy.fallback, &customize).await
            }
        }
    }

    async fn invoke<F>(
        &self,
        method: &str,
        backends: &[StorageBackend],
        customize: F,
    ) -> CoreResult<Value>
    where
        F: FnOnce(IdentifyParams) -> IdentifyParams + Send,
    {
        let unavailable = || CoreError::IdentifyUnavailable {
            method: method.to_string(),
        };

        let Some(account) = self.accounts.current_account().await else {
            log::warn!("{method}: no account to act for");
            return Err(unavailable());
        };

        let mut params = IdentifyParams::new(account);
        if !backends.is_empty() {
            params = params.with_store(backends);
        }
        let params = serde_json::to_value(customize(params)).map_err(|e| {
            log::error!("{method}: could not encode params: {e}");
            unavailable()
        })?;

        log::debug!("Invoking {} {method} on {backends:?}", self.config.snap_id);
        self.ctx
            .snap_invoker()
            .invoke(&self.config.snap_id, method, params)
            .await
            .map_err(|e| {
                log::error!(
                    "Error in {method}: {}",
                    truncate_for_log(&e.to_string(), MAX_LOGGED_CAUSE)
                );
                unavailable()
            })
    }
}
