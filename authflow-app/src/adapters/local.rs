//! Stand-ins for host services when running outside a wallet

use async_trait::async_trait;
use authflow_core::error::{CoreError, CoreResult};
use authflow_core::traits::{AccountProvider, SnapInvoker};
use serde_json::Value;

/// Account provider returning a fixed account list
pub struct StaticAccountProvider {
    accounts: Vec<String>,
}

impl StaticAccountProvider {
    #[must_use]
    pub fn new(accounts: Vec<String>) -> Self {
        Self { accounts }
    }

    /// Provider exposing a single account, or none if `account` is `None`
    #[must_use]
    pub fn single(account: Option<String>) -> Self {
        Self::new(account.into_iter().collect())
    }
}

#[async_trait]
impl AccountProvider for StaticAccountProvider {
    async fn request_accounts(&self) -> CoreResult<Vec<String>> {
        Ok(self.accounts.clone())
    }
}

/// Invoker for environments without other plugins installed.
///
/// Every request fails, so gateway operations degrade the same way they do
/// when the identify plugin is missing from the wallet.
#[derive(Default)]
pub struct OfflineSnapInvoker;

#[async_trait]
impl SnapInvoker for OfflineSnapInvoker {
    async fn invoke(&self, snap_id: &str, method: &str, _params: Value) -> CoreResult<Value> {
        Err(CoreError::HostError {
            method: method.to_string(),
            message: format!("plugin {snap_id} is not installed"),
        })
    }
}
