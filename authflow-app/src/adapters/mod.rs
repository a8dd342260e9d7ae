//! Platform adapters for the core host ports.

mod host;
mod json_file_state_store;
mod local;

pub use host::{
    method as host_method, render_panel, HostAccountProvider, HostDialog, HostRpc,
    HostSnapInvoker, HostStateStore,
};
pub use json_file_state_store::JsonFileStateStore;
pub use local::{OfflineSnapInvoker, StaticAccountProvider};
