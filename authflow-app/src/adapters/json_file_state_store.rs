//! JSON file backed state store for local development

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use authflow_core::error::{CoreError, CoreResult};
use authflow_core::traits::{StateStore, VersionedState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

const APP_DIR_NAME: &str = "authflow";
const STATE_FILE_NAME: &str = "state.json";
const MAX_STATE_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10MB

/// On-disk layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    version: u64,
    #[serde(default)]
    state: Option<Value>,
}

/// State store persisting the blob and its version to a single JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the target.
pub struct JsonFileStateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStateStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the platform data directory, e.g. `~/.local/share/authflow/state.json`
    pub fn at_default_location() -> CoreResult<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> CoreResult<PathBuf> {
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(STATE_FILE_NAME))
            .ok_or_else(|| {
                CoreError::StorageError("Failed to determine data directory".to_string())
            })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> CoreResult<StateFile> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("State file {} does not exist yet", self.path.display());
                return Ok(StateFile::default());
            }
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read state file metadata: {e}"
                )))
            }
        };

        if metadata.len() > MAX_STATE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "State file too large: {} bytes (max: {} bytes)",
                metadata.len(),
                MAX_STATE_FILE_SIZE
            )));
        }

        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read state file: {e}")))?;

        serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid state file: {e}")))
    }

    async fn write_file(&self, file: &StateFile) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to create state directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(file)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write state file: {e}")))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace state file: {e}")))
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn get(&self) -> CoreResult<VersionedState> {
        let _guard = self.lock.lock().await;
        let file = self.read_file().await?;
        Ok(VersionedState {
            state: file.state.filter(|state| !state.is_null()),
            version: file.version,
        })
    }

    async fn update(&self, new_state: Value, expected_version: u64) -> CoreResult<u64> {
        let _guard = self.lock.lock().await;
        let current = self.read_file().await?;
        if current.version != expected_version {
            return Err(CoreError::StateConflict {
                expected: expected_version,
                actual: current.version,
            });
        }

        let next = StateFile {
            version: current.version + 1,
            state: Some(new_state),
        };
        self.write_file(&next).await?;
        log::debug!("State file {} now at v{}", self.path.display(), next.version);
        Ok(next.version)
    }

    async fn clear(&self) -> CoreResult<()> {
        let _guard = self.lock.lock().await;
        let current = self.read_file().await?;
        self.write_file(&StateFile {
            version: current.version + 1,
            state: None,
        })
        .await
    }
}
