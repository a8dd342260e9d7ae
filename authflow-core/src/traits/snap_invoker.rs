//! Inter-plugin RPC abstract Trait

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CoreResult;

/// Snap invoker Trait (`wallet_invokeSnap`)
///
/// Forwards a JSON-RPC request to another plugin installed in the host.
#[async_trait]
pub trait SnapInvoker: Send + Sync {
    /// Invoke `method` on plugin `snap_id`
    ///
    /// # Arguments
    /// * `snap_id` - Target plugin id
    /// * `method` - Remote method name
    /// * `params` - JSON params object
    async fn invoke(&self, snap_id: &str, method: &str, params: Value) -> CoreResult<Value>;
}
