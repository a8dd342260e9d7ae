//! 业务逻辑服务层

mod account_resolver;
mod credential_service;
mod identify_gateway;
mod sync_service;
mod verifiable_credential_service;

pub use account_resolver::AccountResolver;
pub use credential_service::CredentialService;
pub use identify_gateway::IdentifyGateway;
pub use sync_service::{extract_remote_ids, SyncService};
pub use verifiable_credential_service::{
    VerifiableCredentialService, SAMPLE_CREDENTIAL_KEY, SAMPLE_CREDENTIAL_NAME,
};

use std::sync::Arc;

use crate::error::CoreError;
use crate::traits::{AccountProvider, SnapInvoker, StateStore};

/// 服务上下文 - 持有所有依赖
///
/// The platform layer creates this context and injects its host port implementations.
pub struct ServiceContext {
    state_store: Arc<dyn StateStore>,
    account_provider: Arc<dyn AccountProvider>,
    snap_invoker: Arc<dyn SnapInvoker>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        state_store: Arc<dyn StateStore>,
        account_provider: Arc<dyn AccountProvider>,
        snap_invoker: Arc<dyn SnapInvoker>,
    ) -> Self {
        Self {
            state_store,
            account_provider,
            snap_invoker,
        }
    }

    /// Host state store
    #[must_use]
    pub fn state_store(&self) -> &Arc<dyn StateStore> {
        &self.state_store
    }

    /// Host account enumeration
    #[must_use]
    pub fn account_provider(&self) -> &Arc<dyn AccountProvider> {
        &self.account_provider
    }

    /// Inter-plugin RPC
    #[must_use]
    pub fn snap_invoker(&self) -> &Arc<dyn SnapInvoker> {
        &self.snap_invoker
    }
}

/// Log a failed operation at a level matching its error class
pub(crate) fn log_failure(operation: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("Error in {operation}: {err}");
    } else {
        log::error!("Error in {operation}: {err}");
    }
}
