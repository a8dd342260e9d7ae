//! Line-delimited JSON-RPC transport
//!
//! One request object per input line, one response object per output line.
//! Besides the site-facing RPC methods the transport accepts the two entry
//! points the wallet calls for the plugin's own page:
//! - `onHomePage` returns the home panel
//! - `onUserInput` takes a `UserInputEvent` as params

use std::sync::Arc;

use authflow_app::AppState;
use authflow_core::traits::Dialog;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::RpcError;
use crate::handler::RpcHandler;
use crate::schemas::{JsonRpcRequest, JsonRpcResponse, UserInputEvent};
use crate::ui::{home_page, UiHandler};

/// Wallet entry points other than site RPC
pub mod entry {
    pub const ON_HOME_PAGE: &str = "onHomePage";
    pub const ON_USER_INPUT: &str = "onUserInput";
}

/// Origin assumed when a request does not name one
pub const LOCAL_ORIGIN: &str = "local";

pub struct SnapServer {
    rpc: RpcHandler,
    ui: UiHandler,
}

impl SnapServer {
    #[must_use]
    pub fn new(app: Arc<AppState>, dialog: Arc<dyn Dialog>) -> Self {
        Self {
            rpc: RpcHandler::new(Arc::clone(&app), Arc::clone(&dialog)),
            ui: UiHandler::new(app, dialog),
        }
    }

    /// Route one request
    pub async fn dispatch(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = match request.method.as_str() {
            entry::ON_HOME_PAGE => Ok(home_page()),
            entry::ON_USER_INPUT => self.user_input(request.params).await,
            method => {
                let origin = request.origin.as_deref().unwrap_or(LOCAL_ORIGIN);
                self.rpc.on_rpc_request(origin, method, request.params).await
            }
        };

        if let Err(e) = &result {
            tracing::debug!("{} failed: {e}", request.method);
        }
        JsonRpcResponse::from_result(request.id, result)
    }

    async fn user_input(&self, params: Value) -> Result<Value, RpcError> {
        let event: UserInputEvent = serde_json::from_value(params)
            .map_err(|e| RpcError::invalid_params(&e.to_string()))?;
        self.ui.on_user_input(event).await.map_err(RpcError::from)
    }

    /// Handle one raw input line
    pub async fn handle_line(&self, line: &str) -> JsonRpcResponse {
        match serde_json::from_str::<JsonRpcRequest>(line) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => {
                tracing::warn!("Unparseable request: {e}");
                JsonRpcResponse::from_result(Value::Null, Err(RpcError::parse_error(&e.to_string())))
            }
        }
    }

    /// Serve requests until `reader` reaches end of input
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = self.handle_line(line).await;
            let mut out = serde_json::to_vec(&response).map_err(std::io::Error::other)?;
            out.push(b'\n');
            writer.write_all(&out).await?;
            writer.flush().await?;
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }
}
