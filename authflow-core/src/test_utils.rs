//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::services::{
    CredentialService, IdentifyGateway, ServiceContext, SyncService, VerifiableCredentialService,
};
use crate::traits::{AccountProvider, InMemoryStateStore, SnapInvoker, StateStore, VersionedState};
use crate::types::{GatewayConfig, StorageBackend};

// ===== MockStateStore =====

pub struct MockStateStore {
    inner: InMemoryStateStore,
    /// 如果 Some，get 时返回此错误
    get_error: RwLock<Option<String>>,
    /// 如果 Some，update 时返回此错误
    update_error: RwLock<Option<String>>,
    /// Written by "another writer" right before the next update
    concurrent_write: RwLock<Option<Value>>,
    /// Number of upcoming updates rejected as stale
    conflicts: AtomicUsize,
    updates: AtomicUsize,
}

impl MockStateStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryStateStore::new(),
            get_error: RwLock::new(None),
            update_error: RwLock::new(None),
            concurrent_write: RwLock::new(None),
            conflicts: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    /// Replace the stored blob without counting as an update
    pub async fn seed(&self, state: Value) {
        let current = self.inner.get().await.unwrap();
        self.inner.update(state, current.version).await.unwrap();
    }

    pub async fn set_get_error(&self, err: Option<String>) {
        *self.get_error.write().await = err;
    }

    pub async fn set_update_error(&self, err: Option<String>) {
        *self.update_error.write().await = err;
    }

    pub async fn inject_concurrent_write(&self, state: Value) {
        *self.concurrent_write.write().await = Some(state);
    }

    pub async fn set_conflicts(&self, count: usize) {
        self.conflicts.store(count, Ordering::SeqCst);
    }

    /// Successful updates so far
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for MockStateStore {
    async fn get(&self) -> CoreResult<VersionedState> {
        if let Some(ref msg) = *self.get_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        self.inner.get().await
    }

    async fn update(&self, new_state: Value, expected_version: u64) -> CoreResult<u64> {
        if let Some(ref msg) = *self.update_error.read().await {
            return Err(CoreError::StorageError(msg.clone()));
        }
        if let Some(other) = self.concurrent_write.write().await.take() {
            self.seed(other).await;
        }
        if self
            .conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CoreError::StateConflict {
                expected: expected_version,
                actual: expected_version + 1,
            });
        }

        let version = self.inner.update(new_state, expected_version).await?;
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(version)
    }

    async fn clear(&self) -> CoreResult<()> {
        self.inner.clear().await
    }
}

// ===== MockAccountProvider =====

pub struct MockAccountProvider {
    accounts: RwLock<Vec<String>>,
    error: RwLock<Option<String>>,
}

impl MockAccountProvider {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(vec!["0x1234".to_string()]),
            error: RwLock::new(None),
        }
    }

    pub async fn set_accounts(&self, accounts: Vec<String>) {
        *self.accounts.write().await = accounts;
    }

    pub async fn set_error(&self, err: Option<String>) {
        *self.error.write().await = err;
    }
}

#[async_trait]
impl AccountProvider for MockAccountProvider {
    async fn request_accounts(&self) -> CoreResult<Vec<String>> {
        if let Some(ref msg) = *self.error.read().await {
            return Err(CoreError::HostError {
                method: "eth_requestAccounts".to_string(),
                message: msg.clone(),
            });
        }
        Ok(self.accounts.read().await.clone())
    }
}

// ===== MockSnapInvoker =====

/// A request seen by [`MockSnapInvoker`]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub snap_id: String,
    pub method: String,
    pub params: Value,
}

/// Simulated identify plugin
pub struct MockSnapInvoker {
    remote: RwLock<Vec<Value>>,
    calls: RwLock<Vec<RecordedCall>>,
    failing_backends: RwLock<HashSet<StorageBackend>>,
    failing_methods: RwLock<HashSet<String>>,
    /// Canned responses, take precedence over the simulation
    responses: RwLock<HashMap<String, Value>>,
    next_id: AtomicUsize,
}

impl MockSnapInvoker {
    pub fn new() -> Self {
        Self {
            remote: RwLock::new(Vec::new()),
            calls: RwLock::new(Vec::new()),
            failing_backends: RwLock::new(HashSet::new()),
            failing_methods: RwLock::new(HashSet::new()),
            responses: RwLock::new(HashMap::new()),
            next_id: AtomicUsize::new(1),
        }
    }

    pub async fn add_remote(&self, id: &str) {
        self.remote.write().await.push(remote_credential(id, json!({ "name": id })));
    }

    pub async fn remote_ids(&self) -> Vec<String> {
        self.remote
            .read()
            .await
            .iter()
            .filter_map(|vc| vc.pointer("/metadata/id").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }

    /// Requests naming `backend` in their store list fail
    pub async fn fail_backend(&self, backend: StorageBackend) {
        self.failing_backends.write().await.insert(backend);
    }

    pub async fn fail_method(&self, method: &str) {
        self.failing_methods.write().await.insert(method.to_string());
    }

    pub async fn set_response(&self, method: &str, response: Value) {
        self.responses
            .write()
            .await
            .insert(method.to_string(), response);
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    pub async fn last_call(&self) -> Option<RecordedCall> {
        self.calls.read().await.last().cloned()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn uses_failing_backend(&self, params: &Value) -> bool {
        let failing = self.failing_backends.read().await;
        params
            .pointer("/options/store")
            .and_then(Value::as_array)
            .is_some_and(|store| {
                store.iter().any(|name| {
                    failing
                        .iter()
                        .any(|backend| name.as_str() == Some(backend.as_str()))
                })
            })
    }
}

fn remote_credential(id: &str, data: Value) -> Value {
    json!({ "data": data, "metadata": { "id": id, "store": "snap" } })
}

fn simulated_failure(method: &str) -> CoreError {
    CoreError::HostError {
        method: method.to_string(),
        message: "simulated failure".to_string(),
    }
}

#[async_trait]
impl SnapInvoker for MockSnapInvoker {
    async fn invoke(&self, snap_id: &str, method: &str, params: Value) -> CoreResult<Value> {
        self.calls.write().await.push(RecordedCall {
            snap_id: snap_id.to_string(),
            method: method.to_string(),
            params: params.clone(),
        });

        if self.failing_methods.read().await.contains(method)
            || self.uses_failing_backend(&params).await
        {
            return Err(simulated_failure(method));
        }
        if let Some(response) = self.responses.read().await.get(method) {
            return Ok(response.clone());
        }

        match method {
            "getVCs" => {
                let remote = self.remote.read().await;
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
                let id = format!("vc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
                let data = params.get("vcValue").cloned().unwrap_or(Value::Null);
                let vc = remote_credential(&id, data);
                self.remote.write().await.push(vc.clone());
                Ok(vc)
            }
            "createVP" => Ok(json!({
                "type": ["VerifiablePresentation"],
                "vcIds": params.get("vcIds").cloned().unwrap_or(Value::Null),
            })),
            "deleteAllVCs" => {
                let removed = std::mem::take(&mut *self.remote.write().await);
                Ok(json!(removed.len()))
            }
            "removeVC" => {
                let ids: Vec<String> = params
                    .get("id")
                    .and_then(Value::as_array)
                    .map(|ids| {
                        ids.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                self.remote.write().await.retain(|vc| {
                    vc.pointer("/metadata/id")
                        .and_then(Value::as_str)
                        .is_none_or(|id| !ids.iter().any(|wanted| wanted == id))
                });
                Ok(json!(true))
            }
            "syncGoogleVCs" => Ok(json!(true)),
            _ => Err(CoreError::HostError {
                method: method.to_string(),
                message: "Method not found".to_string(),
            }),
        }
    }
}

// ===== 工厂方法 =====

/// 创建测试用 `ServiceContext`
pub fn create_test_context() -> (
    Arc<ServiceContext>,
    Arc<MockStateStore>,
    Arc<MockAccountProvider>,
    Arc<MockSnapInvoker>,
) {
    let state_store = Arc::new(MockStateStore::new());
    let accounts = Arc::new(MockAccountProvider::new());
    let invoker = Arc::new(MockSnapInvoker::new());

    let ctx = Arc::new(ServiceContext::new(
        state_store.clone(),
        accounts.clone(),
        invoker.clone(),
    ));

    (ctx, state_store, accounts, invoker)
}

/// Fully wired service graph over the mocks
pub struct TestServices {
    pub state_store: Arc<MockStateStore>,
    pub accounts: Arc<MockAccountProvider>,
    pub invoker: Arc<MockSnapInvoker>,
    pub credentials: Arc<CredentialService>,
    pub gateway: Arc<IdentifyGateway>,
    pub sync: SyncService,
    pub verifiable: VerifiableCredentialService,
}

/// 创建测试用服务集合
pub fn create_test_services() -> TestServices {
    let (ctx, state_store, accounts, invoker) = create_test_context();
    let credentials = Arc::new(CredentialService::new(Arc::clone(&ctx)));
    let gateway = Arc::new(IdentifyGateway::new(
        ctx,
        Arc::clone(&credentials),
        GatewayConfig::default(),
    ));

    TestServices {
        sync: SyncService::new(Arc::clone(&credentials), Arc::clone(&gateway)),
        verifiable: VerifiableCredentialService::new(Arc::clone(&credentials), Arc::clone(&gateway)),
        state_store,
        accounts,
        invoker,
        credentials,
        gateway,
    }
}
