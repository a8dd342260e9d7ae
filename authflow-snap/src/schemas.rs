//! Request, response and UI event shapes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

/// Params of `getBasicCreds`, `getVerifiableCreds` and `createVerifiablePresentation`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredsRequestParams {
    /// Credential label; a comma-separated list for presentations
    #[serde(default)]
    pub credential_description: Option<String>,
}

/// Returned by `getBasicCreds`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasicCredsResponse {
    pub username: String,
    pub password: String,
}

/// Event delivered by the host when the user interacts with plugin UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum UserInputEvent {
    #[serde(rename = "ButtonClickEvent")]
    ButtonClick { name: String },
    #[serde(rename = "FormSubmitEvent")]
    FormSubmit {
        name: String,
        #[serde(default)]
        value: HashMap<String, Option<String>>,
    },
}

/// One line-delimited JSON-RPC request on the development transport
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    /// Calling site; the wallet fills this in for real requests
    #[serde(default)]
    pub origin: Option<String>,
}

/// Reply to a [`JsonRpcRequest`]
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    #[must_use]
    pub fn from_result(id: Value, result: Result<Value, RpcError>) -> Self {
        match result {
            Ok(value) => Self {
                jsonrpc: "2.0",
                id,
                result: Some(value),
                error: None,
            },
            Err(error) => Self {
                jsonrpc: "2.0",
                id,
                result: None,
                error: Some(error),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creds_params_missing_description() {
        let params: CredsRequestParams = serde_json::from_value(json!({})).unwrap();
        assert!(params.credential_description.is_none());
    }

    #[test]
    fn form_submit_event_parses_null_fields() {
        let event: UserInputEvent = serde_json::from_value(json!({
            "type": "FormSubmitEvent",
            "name": "password-search-form",
            "value": { "search-term": null }
        }))
        .unwrap();

        let UserInputEvent::FormSubmit { name, value } = event else {
            panic!("expected form submit");
        };
        assert_eq!(name, "password-search-form");
        assert_eq!(value["search-term"], None);
    }

    #[test]
    fn error_response_omits_result() {
        let response =
            JsonRpcResponse::from_result(json!(7), Err(RpcError::method_not_found()));
        assert_eq!(
            serde_json::to_value(response).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 7,
                "error": { "code": -32603, "message": "Method not found." }
            })
        );
    }
}
