//! Platform-agnostic application bootstrap for AuthFlow.
//!
//! Provides `AppState` (service container) and `AppStateBuilder` (adapter
//! injection), plus the host bridge and local adapters in [`adapters`].

pub mod adapters;

use std::sync::Arc;

use authflow_core::error::{CoreError, CoreResult};
use authflow_core::services::{
    CredentialService, IdentifyGateway, ServiceContext, SyncService, VerifiableCredentialService,
};
use authflow_core::traits::{AccountProvider, SnapInvoker, StateStore};
use authflow_core::types::GatewayConfig;

use adapters::{HostAccountProvider, HostRpc, HostSnapInvoker, HostStateStore};

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all host adapters)
    pub ctx: Arc<ServiceContext>,
    /// Credential store
    pub credential_service: Arc<CredentialService>,
    /// Identify plugin gateway
    pub identify_gateway: Arc<IdentifyGateway>,
    /// Local + remote verifiable credential operations
    pub verifiable_credential_service: VerifiableCredentialService,
    /// Reconciliation engine
    pub sync_service: SyncService,
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - `state_store`: where the credential blob lives
/// - `account_provider`: how the active account is found
/// - `snap_invoker`: how the identify plugin is reached
///
/// # Optional
/// - `gateway_config`: defaults to `GatewayConfig::default()`
pub struct AppStateBuilder {
    state_store: Option<Arc<dyn StateStore>>,
    account_provider: Option<Arc<dyn AccountProvider>>,
    snap_invoker: Option<Arc<dyn SnapInvoker>>,
    gateway_config: Option<GatewayConfig>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state_store: None,
            account_provider: None,
            snap_invoker: None,
            gateway_config: None,
        }
    }

    /// Wire every host port to the wallet bridge
    #[must_use]
    pub fn host(self, rpc: &Arc<dyn HostRpc>) -> Self {
        self.state_store(Arc::new(HostStateStore::new(Arc::clone(rpc))))
            .account_provider(Arc::new(HostAccountProvider::new(Arc::clone(rpc))))
            .snap_invoker(Arc::new(HostSnapInvoker::new(Arc::clone(rpc))))
    }

    #[must_use]
    pub fn state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.state_store = Some(store);
        self
    }

    #[must_use]
    pub fn account_provider(mut self, provider: Arc<dyn AccountProvider>) -> Self {
        self.account_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn snap_invoker(mut self, invoker: Arc<dyn SnapInvoker>) -> Self {
        self.snap_invoker = Some(invoker);
        self
    }

    #[must_use]
    pub fn gateway_config(mut self, config: GatewayConfig) -> Self {
        self.gateway_config = Some(config);
        self
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<AppState> {
        let state_store = self
            .state_store
            .ok_or_else(|| CoreError::ValidationError("state_store is required".to_string()))?;
        let account_provider = self.account_provider.ok_or_else(|| {
            CoreError::ValidationError("account_provider is required".to_string())
        })?;
        let snap_invoker = self
            .snap_invoker
            .ok_or_else(|| CoreError::ValidationError("snap_invoker is required".to_string()))?;
        let gateway_config = self.gateway_config.unwrap_or_default();

        log::debug!(
            "Identify plugin {} with backends {:?} / {:?}",
            gateway_config.snap_id,
            gateway_config.policy.primary,
            gateway_config.policy.fallback
        );

        let ctx = Arc::new(ServiceContext::new(
            state_store,
            account_provider,
            snap_invoker,
        ));

        let credential_service = Arc::new(CredentialService::new(Arc::clone(&ctx)));
        let identify_gateway = Arc::new(IdentifyGateway::new(
            Arc::clone(&ctx),
            Arc::clone(&credential_service),
            gateway_config,
        ));
        let verifiable_credential_service = VerifiableCredentialService::new(
            Arc::clone(&credential_service),
            Arc::clone(&identify_gateway),
        );
        let sync_service = SyncService::new(
            Arc::clone(&credential_service),
            Arc::clone(&identify_gateway),
        );

        Ok(AppState {
            ctx,
            credential_service,
            identify_gateway,
            verifiable_credential_service,
            sync_service,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
