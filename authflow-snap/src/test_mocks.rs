//! Test doubles for the plugin surface

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use authflow_app::adapters::StaticAccountProvider;
use authflow_app::{AppState, AppStateBuilder};
use authflow_core::error::{CoreError, CoreResult};
use authflow_core::traits::{Dialog, InMemoryStateStore, SnapInvoker};
use authflow_core::types::DialogContent;
use serde_json::{json, Value};
use tokio::sync::Mutex;

/// Dialog answering from scripted queues and recording what it showed
#[derive(Default)]
pub struct ScriptedDialog {
    confirms: Mutex<VecDeque<bool>>,
    prompts: Mutex<VecDeque<Option<String>>>,
    shown: Mutex<Vec<DialogContent>>,
}

impl ScriptedDialog {
    /// Confirmations answer `true` unless scripted otherwise
    pub async fn answer_confirm(&self, answer: bool) {
        self.confirms.lock().await.push_back(answer);
    }

    /// Prompts are dismissed unless scripted otherwise
    pub async fn answer_prompt(&self, answer: Option<&str>) {
        self.prompts
            .lock()
            .await
            .push_back(answer.map(str::to_string));
    }

    pub async fn shown(&self) -> Vec<DialogContent> {
        self.shown.lock().await.clone()
    }

    pub async fn last_shown(&self) -> Option<DialogContent> {
        self.shown.lock().await.last().cloned()
    }
}

#[async_trait]
impl Dialog for ScriptedDialog {
    async fn confirm(&self, content: &DialogContent) -> CoreResult<bool> {
        self.shown.lock().await.push(content.clone());
        Ok(self.confirms.lock().await.pop_front().unwrap_or(true))
    }

    async fn alert(&self, content: &DialogContent) -> CoreResult<()> {
        self.shown.lock().await.push(content.clone());
        Ok(())
    }

    async fn prompt(&self, content: &DialogContent) -> CoreResult<Option<String>> {
        self.shown.lock().await.push(content.clone());
        Ok(self.prompts.lock().await.pop_front().flatten())
    }
}

/// In-memory identify plugin
#[derive(Default)]
pub struct FakeIdentify {
    remote: Mutex<Vec<Value>>,
    offline: AtomicBool,
    next_id: AtomicUsize,
}

impl FakeIdentify {
    pub async fn add_remote(&self, id: &str) {
        self.remote.lock().await.push(credential(id, json!({ "name": id })));
    }

    pub async fn remote_count(&self) -> usize {
        self.remote.lock().await.len()
    }

    /// Every request fails while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

fn credential(id: &str, data: Value) -> Value {
    json!({ "data": data, "metadata": { "id": id, "store": "snap" } })
}

#[async_trait]
impl SnapInvoker for FakeIdentify {
    async fn invoke(&self, _snap_id: &str, method: &str, params: Value) -> CoreResult<Value> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CoreError::HostError {
                method: method.to_string(),
                message: "offline".to_string(),
            });
        }

        let mut remote = self.remote.lock().await;
        match method {
            "getVCs" => {
                let wanted = params.pointer("/filter/filter").and_then(Value::as_str);
                Ok(Value::Array(
                    remote
                        .iter()
                        .filter(|vc| {
                            wanted.is_none_or(|id| {
                                vc.pointer("/metadata/id").and_then(Value::as_str) == Some(id)
                            })
                        })
                        .cloned()
                        .collect(),
                ))
            }
            "createVC" => {
                let id = format!("vc-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
                let vc = credential(&id, params.get("vcValue").cloned().unwrap_or(Value::Null));
                remote.push(vc.clone());
                Ok(vc)
            }
            "createVP" => Ok(json!({
                "type": ["VerifiablePresentation"],
                "vcIds": params.get("vcIds").cloned().unwrap_or(Value::Null),
            })),
            "deleteAllVCs" => {
                let removed = std::mem::take(&mut *remote);
                Ok(json!(removed.len()))
            }
            "removeVC" => {
                let ids: Vec<String> = params
                    .get("id")
                    .cloned()
                    .map(|ids| serde_json::from_value(ids).unwrap())
                    .unwrap_or_default();
                remote.retain(|vc| {
                    !vc.pointer("/metadata/id")
                        .and_then(Value::as_str)
                        .is_some_and(|id| ids.iter().any(|wanted| wanted == id))
                });
                Ok(json!(true))
            }
            "syncGoogleVCs" => Ok(json!(true)),
            other => Err(CoreError::HostError {
                method: other.to_string(),
                message: "unsupported".to_string(),
            }),
        }
    }
}

pub struct TestApp {
    pub app: Arc<AppState>,
    pub dialog: Arc<ScriptedDialog>,
    pub identify: Arc<FakeIdentify>,
}

pub fn create_test_app() -> TestApp {
    let identify = Arc::new(FakeIdentify::default());
    let app = AppStateBuilder::new()
        .state_store(Arc::new(InMemoryStateStore::new()))
        .account_provider(Arc::new(StaticAccountProvider::single(Some(
            "0x1234".to_string(),
        ))))
        .snap_invoker(Arc::clone(&identify) as Arc<dyn SnapInvoker>)
        .build()
        .unwrap();

    TestApp {
        app: Arc::new(app),
        dialog: Arc::new(ScriptedDialog::default()),
        identify,
    }
}
