//! Host wallet bridge adapters
//!
//! The wallet exposes a single JSON-RPC entry point to the plugin. Each adapter
//! here maps one core port onto the corresponding host method.

use std::sync::Arc;

use async_trait::async_trait;
use authflow_core::error::{CoreError, CoreResult};
use authflow_core::traits::{AccountProvider, Dialog, SnapInvoker, StateStore, VersionedState};
use authflow_core::types::DialogContent;
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// Host method names
pub mod method {
    pub const MANAGE_STATE: &str = "snap_manageState";
    pub const DIALOG: &str = "snap_dialog";
    pub const INVOKE_SNAP: &str = "wallet_invokeSnap";
    pub const REQUEST_ACCOUNTS: &str = "eth_requestAccounts";
}

/// Outbound request channel to the host wallet
#[async_trait]
pub trait HostRpc: Send + Sync {
    /// Send `method` with `params` and wait for the result
    async fn request(&self, method: &str, params: Value) -> CoreResult<Value>;
}

// ===== State =====

/// `snap_manageState` backed state store.
///
/// The host keeps no version of its own, so the adapter tracks one and
/// serializes every operation behind an async mutex. All writers of the blob
/// must go through the same instance.
pub struct HostStateStore {
    rpc: Arc<dyn HostRpc>,
    version: Mutex<u64>,
}

impl HostStateStore {
    #[must_use]
    pub fn new(rpc: Arc<dyn HostRpc>) -> Self {
        Self {
            rpc,
            version: Mutex::new(0),
        }
    }
}

#[async_trait]
impl StateStore for HostStateStore {
    async fn get(&self) -> CoreResult<VersionedState> {
        let version = self.version.lock().await;
        let state = self
            .rpc
            .request(method::MANAGE_STATE, json!({ "operation": "get" }))
            .await?;

        Ok(VersionedState {
            state: (!state.is_null()).then_some(state),
            version: *version,
        })
    }

    async fn update(&self, new_state: Value, expected_version: u64) -> CoreResult<u64> {
        let mut version = self.version.lock().await;
        if *version != expected_version {
            return Err(CoreError::StateConflict {
                expected: expected_version,
                actual: *version,
            });
        }

        self.rpc
            .request(
                method::MANAGE_STATE,
                json!({ "operation": "update", "newState": new_state }),
            )
            .await?;
        *version += 1;
        Ok(*version)
    }

    async fn clear(&self) -> CoreResult<()> {
        let mut version = self.version.lock().await;
        self.rpc
            .request(method::MANAGE_STATE, json!({ "operation": "clear" }))
            .await?;
        *version += 1;
        Ok(())
    }
}

// ===== Accounts =====

/// `eth_requestAccounts` backed account provider
pub struct HostAccountProvider {
    rpc: Arc<dyn HostRpc>,
}

impl HostAccountProvider {
    #[must_use]
    pub fn new(rpc: Arc<dyn HostRpc>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl AccountProvider for HostAccountProvider {
    async fn request_accounts(&self) -> CoreResult<Vec<String>> {
        let result = self
            .rpc
            .request(method::REQUEST_ACCOUNTS, Value::Null)
            .await?;
        serde_json::from_value(result)
            .map_err(|e| CoreError::MalformedData(format!("Unexpected account list: {e}")))
    }
}

// ===== Inter-plugin RPC =====

/// `wallet_invokeSnap` backed invoker
pub struct HostSnapInvoker {
    rpc: Arc<dyn HostRpc>,
}

impl HostSnapInvoker {
    #[must_use]
    pub fn new(rpc: Arc<dyn HostRpc>) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl SnapInvoker for HostSnapInvoker {
    async fn invoke(&self, snap_id: &str, method: &str, params: Value) -> CoreResult<Value> {
        self.rpc
            .request(
                method::INVOKE_SNAP,
                json!({
                    "snapId": snap_id,
                    "request": { "method": method, "params": params },
                }),
            )
            .await
    }
}

// ===== Dialogs =====

/// `snap_dialog` backed dialogs
pub struct HostDialog {
    rpc: Arc<dyn HostRpc>,
}

impl HostDialog {
    #[must_use]
    pub fn new(rpc: Arc<dyn HostRpc>) -> Self {
        Self { rpc }
    }

    async fn show(&self, kind: &str, content: &DialogContent) -> CoreResult<Value> {
        self.rpc
            .request(
                method::DIALOG,
                json!({ "type": kind, "content": render_panel(content) }),
            )
            .await
    }
}

/// Render dialog content as a host UI panel
#[must_use]
pub fn render_panel(content: &DialogContent) -> Value {
    let mut children = vec![json!({ "type": "heading", "value": content.heading })];
    children.extend(
        content
            .lines
            .iter()
            .map(|line| json!({ "type": "text", "value": line })),
    );
    json!({ "type": "panel", "children": children })
}

#[async_trait]
impl Dialog for HostDialog {
    async fn confirm(&self, content: &DialogContent) -> CoreResult<bool> {
        let result = self.show("confirmation", content).await?;
        Ok(result.as_bool().unwrap_or(false))
    }

    async fn alert(&self, content: &DialogContent) -> CoreResult<()> {
        self.show("alert", content).await?;
        Ok(())
    }

    async fn prompt(&self, content: &DialogContent) -> CoreResult<Option<String>> {
        let result = self.show("prompt", content).await?;
        Ok(result.as_str().map(str::to_string))
    }
}
