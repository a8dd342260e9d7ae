//! Host account enumeration abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Account provider Trait (`eth_requestAccounts`)
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// List the accounts the host exposes to this plugin, most relevant first
    async fn request_accounts(&self) -> CoreResult<Vec<String>>;
}
