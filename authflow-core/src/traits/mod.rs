//! Host port abstraction trait definition

mod account_provider;
mod dialog;
mod snap_invoker;
mod state_store;

pub use account_provider::AccountProvider;
pub use dialog::Dialog;
pub use snap_invoker::SnapInvoker;
pub use state_store::{InMemoryStateStore, StateStore, VersionedState};
