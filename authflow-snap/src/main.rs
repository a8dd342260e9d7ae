//! Development host for the AuthFlow plugin
//!
//! Speaks line-delimited JSON-RPC on stdin/stdout. Credentials persist to a
//! local JSON file, dialogs are printed to stderr, and requests to other
//! plugins fail the way they do when the identify plugin is not installed.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use authflow_app::adapters::{JsonFileStateStore, OfflineSnapInvoker, StaticAccountProvider};
use authflow_app::AppStateBuilder;
use authflow_snap::config::SnapConfig;
use authflow_snap::console::ConsoleDialog;
use authflow_snap::SnapServer;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries the protocol
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("AuthFlow host failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = SnapConfig::load().context("loading configuration")?;

    let store = match &config.state_file {
        Some(path) => JsonFileStateStore::new(path.clone()),
        None => JsonFileStateStore::at_default_location()
            .context("resolving the default state file")?,
    };
    tracing::info!("Credential state at {}", store.path().display());

    let app = AppStateBuilder::new()
        .state_store(Arc::new(store))
        .account_provider(Arc::new(StaticAccountProvider::single(config.account.clone())))
        .snap_invoker(Arc::new(OfflineSnapInvoker))
        .gateway_config(config.gateway.clone())
        .build()
        .context("building application state")?;

    let dialog = Arc::new(ConsoleDialog::new(config.auto_approve));
    let server = SnapServer::new(Arc::new(app), dialog);

    tracing::info!("Starting AuthFlow development host on stdio");
    server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
        .context("serving stdio")?;
    Ok(())
}
