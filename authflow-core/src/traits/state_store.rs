//! Host state persistence abstract Trait

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{CoreError, CoreResult};

/// Snapshot of the host blob together with its version token
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedState {
    /// Stored object, `None` before the first write or after a clear
    pub state: Option<Value>,
    /// Token to pass back to [`StateStore::update`]
    pub version: u64,
}

/// Host state store Trait (`snap_manageState`)
///
/// The whole credential collection lives in one opaque blob. Writers must
/// present the version they read; a stale version is rejected with
/// `CoreError::StateConflict` so read-modify-write cycles never overwrite each
/// other silently.
///
/// Platform implementation:
/// - Host wallet: `HostStateStore` (`snap_manageState`)
/// - Local development: `JsonFileStateStore`
/// - Tests: `InMemoryStateStore`
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the whole blob
    async fn get(&self) -> CoreResult<VersionedState>;

    /// Replace the whole blob
    ///
    /// # Arguments
    /// * `new_state` - Object replacing the stored blob
    /// * `expected_version` - Version returned by the read this write is based on
    ///
    /// # Returns
    /// * The new version token
    async fn update(&self, new_state: Value, expected_version: u64) -> CoreResult<u64>;

    /// Drop the blob entirely
    async fn clear(&self) -> CoreResult<()>;
}

#[derive(Debug, Default)]
struct Slot {
    state: Option<Value>,
    version: u64,
}

/// In-memory state store
///
/// Default implementation, available on all platforms.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    slot: Arc<Mutex<Slot>>,
}

impl InMemoryStateStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `state`
    #[must_use]
    pub fn with_state(state: Value) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                state: Some(state),
                version: 0,
            })),
        }
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self) -> CoreResult<VersionedState> {
        let slot = self.slot.lock().await;
        Ok(VersionedState {
            state: slot.state.clone(),
            version: slot.version,
        })
    }

    async fn update(&self, new_state: Value, expected_version: u64) -> CoreResult<u64> {
        let mut slot = self.slot.lock().await;
        if slot.version != expected_version {
            return Err(CoreError::StateConflict {
                expected: expected_version,
                actual: slot.version,
            });
        }
        slot.state = Some(new_state);
        slot.version += 1;
        Ok(slot.version)
    }

    async fn clear(&self) -> CoreResult<()> {
        let mut slot = self.slot.lock().await;
        slot.state = None;
        slot.version += 1;
        Ok(())
    }
}
