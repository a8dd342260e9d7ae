//! Inbound JSON-RPC dispatch
//!
//! Every method that discloses a credential asks the user first. Declining
//! maps to the provider "user rejected" error.

use std::sync::Arc;

use authflow_app::AppState;
use authflow_core::traits::Dialog;
use authflow_core::types::DialogContent;
use serde_json::Value;

use crate::error::RpcError;
use crate::schemas::{BasicCredsResponse, CredsRequestParams};
use crate::views;

/// Inbound RPC method names
pub mod method {
    pub const HELLO: &str = "hello";
    pub const GET_BASIC_CREDS: &str = "getBasicCreds";
    pub const GET_VERIFIABLE_CREDS: &str = "getVerifiableCreds";
    pub const CREATE_VERIFIABLE_PRESENTATION: &str = "createVerifiablePresentation";
}

/// Handler for requests sent by sites through the wallet
pub struct RpcHandler {
    app: Arc<AppState>,
    dialog: Arc<dyn Dialog>,
}

impl RpcHandler {
    #[must_use]
    pub fn new(app: Arc<AppState>, dialog: Arc<dyn Dialog>) -> Self {
        Self { app, dialog }
    }

    /// Dispatch one request from `origin`
    pub async fn on_rpc_request(
        &self,
        origin: &str,
        method: &str,
        params: Value,
    ) -> Result<Value, RpcError> {
        tracing::debug!("RPC {method} from {origin}");
        match method {
            method::HELLO => {
                let approved = self.confirm(&views::hello(origin)).await?;
                Ok(Value::Bool(approved))
            }
            method::GET_BASIC_CREDS => {
                let description = required_description(params)?;
                self.require_approval(&views::retrieve_basic_creds(&description, origin))
                    .await?;

                let creds = self
                    .app
                    .credential_service
                    .get_basic_credentials_for_description(&description)
                    .await
                    .ok_or_else(RpcError::credential_not_found)?;
                tracing::info!("Released login for {description} to {origin}");
                Ok(serde_json::to_value(BasicCredsResponse {
                    username: creds.username,
                    password: creds.password,
                })
                .map_err(|e| RpcError::internal(e.to_string()))?)
            }
            method::GET_VERIFIABLE_CREDS => {
                let description = required_description(params)?;
                self.require_approval(&views::retrieve_verifiable_creds(&description, origin))
                    .await?;

                Ok(self
                    .app
                    .verifiable_credential_service
                    .get_identity_credential_for_description(&description)
                    .await
                    .map_or(Value::Null, |credential| Value::String(credential.to_string())))
            }
            method::CREATE_VERIFIABLE_PRESENTATION => {
                let description = required_description(params)?;
                self.require_approval(&views::create_presentation(&description, origin))
                    .await?;

                let names = split_names(&description);
                match self.app.identify_gateway.create_presentation(&names).await {
                    Ok(presentation) => Ok(presentation),
                    Err(e) => {
                        tracing::warn!("Presentation for {description} not created: {e}");
                        Ok(Value::Null)
                    }
                }
            }
            _ => {
                tracing::warn!("Unknown RPC method {method} from {origin}");
                Err(RpcError::method_not_found())
            }
        }
    }

    async fn confirm(&self, content: &DialogContent) -> Result<bool, RpcError> {
        self.dialog.confirm(content).await.map_err(|e| {
            tracing::error!("Dialog failed: {e}");
            RpcError::internal("Dialog failed.")
        })
    }

    async fn require_approval(&self, content: &DialogContent) -> Result<(), RpcError> {
        if self.confirm(content).await? {
            Ok(())
        } else {
            Err(RpcError::user_rejected())
        }
    }
}

fn required_description(params: Value) -> Result<String, RpcError> {
    let params: CredsRequestParams = if params.is_null() {
        CredsRequestParams::default()
    } else {
        serde_json::from_value(params)
            .map_err(|e| RpcError::invalid_params(&e.to_string()))?
    };

    params
        .credential_description
        .filter(|description| !description.is_empty())
        .ok_or_else(|| RpcError::invalid_params("credentialDescription is required"))
}

/// Split a comma-separated label list, dropping blanks
pub fn split_names(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_mocks::{create_test_app, TestApp};
    use authflow_core::types::CredentialRecord;
    use serde_json::json;

    fn handler(t: &TestApp) -> RpcHandler {
        RpcHandler::new(Arc::clone(&t.app), Arc::clone(&t.dialog) as Arc<dyn Dialog>)
    }

    #[tokio::test]
    async fn hello_returns_acknowledgement() {
        let t = create_test_app();
        t.dialog.answer_confirm(false).await;

        let result = handler(&t)
            .on_rpc_request("https://site.example", "hello", Value::Null)
            .await
            .unwrap();
        assert_eq!(result, Value::Bool(false));
        assert_eq!(
            t.dialog.last_shown().await.unwrap().heading,
            "Hello, https://site.example!"
        );
    }

    #[tokio::test]
    async fn basic_creds_released_after_approval() {
        let t = create_test_app();
        t.app
            .credential_service
            .set_credential(CredentialRecord::basic("site1", "u", "p"))
            .await
            .unwrap();

        let result = handler(&t)
            .on_rpc_request(
                "https://site1.example",
                method::GET_BASIC_CREDS,
                json!({ "credentialDescription": "site1" }),
            )
            .await
            .unwrap();
        assert_eq!(result, json!({ "username": "u", "password": "p" }));
    }

    #[tokio::test]
    async fn declined_basic_creds_is_user_rejected() {
        let t = create_test_app();
        t.app
            .credential_service
            .set_credential(CredentialRecord::basic("site1", "u", "p"))
            .await
            .unwrap();
        t.dialog.answer_confirm(false).await;

        let err = handler(&t)
            .on_rpc_request(
                "https://evil.example",
                method::GET_BASIC_CREDS,
                json!({ "credentialDescription": "site1" }),
            )
            .await
            .unwrap_err();
        assert_eq!(err, RpcError::user_rejected());
        assert_eq!(err.code, 4001);
    }

    #[tokio::test]
    async fn unknown_basic_creds_is_not_found() {
        let t = create_test_app();
        let err = handler(&t)
            .on_rpc_request(
                "https://site.example",
                method::GET_BASIC_CREDS,
                json!({ "credentialDescription": "nowhere" }),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, -32603);
        assert_eq!(err.message, "Credential not found.");
    }

    #[tokio::test]
    async fn missing_description_asks_nothing() {
        let t = create_test_app();
        let err = handler(&t)
            .on_rpc_request("https://site.example", method::GET_BASIC_CREDS, json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
        assert!(t.dialog.shown().await.is_empty());
    }

    #[tokio::test]
    async fn verifiable_creds_serialized_or_null() {
        let t = create_test_app();
        t.identify.add_remote("vc-9").await;
        t.app
            .credential_service
            .set_credential(CredentialRecord::identify("Passport", "vc-9"))
            .await
            .unwrap();
        let handler = handler(&t);

        let found = handler
            .on_rpc_request(
                "https://site.example",
                method::GET_VERIFIABLE_CREDS,
                json!({ "credentialDescription": "Passport" }),
            )
            .await
            .unwrap();
        let text = found.as_str().unwrap();
        assert!(text.contains("vc-9"));

        let missing = handler
            .on_rpc_request(
                "https://site.example",
                method::GET_VERIFIABLE_CREDS,
                json!({ "credentialDescription": "Licence" }),
            )
            .await
            .unwrap();
        assert_eq!(missing, Value::Null);
    }

    #[tokio::test]
    async fn presentation_built_from_names() {
        let t = create_test_app();
        for (name, id) in [("Passport", "vc-1"), ("Licence", "vc-2")] {
            t.identify.add_remote(id).await;
            t.app
                .credential_service
                .set_credential(CredentialRecord::identify(name, id))
                .await
                .unwrap();
        }

        let presentation = handler(&t)
            .on_rpc_request(
                "https://site.example",
                method::CREATE_VERIFIABLE_PRESENTATION,
                json!({ "credentialDescription": "Passport, Licence" }),
            )
            .await
            .unwrap();
        assert_eq!(presentation["vcIds"], json!(["vc-1", "vc-2"]));
    }

    #[tokio::test]
    async fn presentation_degrades_to_null() {
        let t = create_test_app();
        t.identify.set_offline(true);

        let presentation = handler(&t)
            .on_rpc_request(
                "https://site.example",
                method::CREATE_VERIFIABLE_PRESENTATION,
                json!({ "credentialDescription": "Unknown" }),
            )
            .await
            .unwrap();
        assert_eq!(presentation, Value::Null);
    }

    #[tokio::test]
    async fn unknown_method() {
        let t = create_test_app();
        let err = handler(&t)
            .on_rpc_request("https://site.example", "dropTables", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.code, -32603);
        assert_eq!(err.message, "Method not found.");
    }

    #[test]
    fn names_are_trimmed() {
        assert_eq!(
            split_names(" Passport, ,Licence "),
            vec!["Passport".to_string(), "Licence".to_string()]
        );
    }

    #[test]
    fn description_required() {
        let err = required_description(serde_json::json!({})).unwrap_err();
        assert_eq!(err.code, -32602);
        assert_eq!(
            err.message,
            "Invalid params: credentialDescription is required"
        );
        assert!(required_description(Value::Null).is_err());
    }
}
