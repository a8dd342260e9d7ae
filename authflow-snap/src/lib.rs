//! AuthFlow wallet plugin surface
//!
//! Maps site RPC requests, the home page and user input events onto the
//! services in `authflow-app`, and serves them over a line-delimited stdio
//! transport for local development.

pub mod config;
pub mod console;
pub mod error;
pub mod handler;
pub mod schemas;
pub mod server;
pub mod ui;
pub mod views;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test_mocks;

pub use error::RpcError;
pub use handler::RpcHandler;
pub use server::SnapServer;
pub use ui::UiHandler;
