//! AuthFlow Core Library
//!
//! Platform-independent logic behind the AuthFlow wallet plugin:
//! - Credential store over the host's single state blob (Credential Service)
//! - Facade over the external identify plugin (Identify Gateway)
//! - Reconciliation of local Identify records with the remote set (Sync Service)
//!
//! Host primitives (state storage, account enumeration, inter-plugin RPC, dialogs)
//! are abstracted through traits so the same services run inside the wallet,
//! against local files, or against mocks.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::ServiceContext;
pub use traits::{AccountProvider, Dialog, SnapInvoker, StateStore};
