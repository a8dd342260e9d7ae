//! User dialog abstract Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::DialogContent;

/// Dialog Trait (`snap_dialog`)
#[async_trait]
pub trait Dialog: Send + Sync {
    /// Confirmation dialog, `true` when the user approved
    async fn confirm(&self, content: &DialogContent) -> CoreResult<bool>;

    /// Informational dialog
    async fn alert(&self, content: &DialogContent) -> CoreResult<()>;

    /// Text prompt, `None` when the user dismissed it
    async fn prompt(&self, content: &DialogContent) -> CoreResult<Option<String>>;
}
