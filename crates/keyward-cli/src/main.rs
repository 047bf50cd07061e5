#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use keyward_server::handler::routes;
use keyward_server::middleware::RouterExt;
use keyward_server::service::ServiceState;
use keyward_store::MemoryAccountStore;

use crate::config::{Cli, ServerConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "keyward_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "keyward_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "keyward_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let state = create_service_state(&cli).await?;
    let router = create_router(state, &cli.server);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the service state over an in-memory account store.
async fn create_service_state(cli: &Cli) -> anyhow::Result<ServiceState> {
    let repository = Arc::new(MemoryAccountStore::new());

    ServiceState::new(cli.service.clone(), repository)
        .await
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, server_config: &ServerConfig) -> Router {
    routes(state.clone())
        .with_state(state)
        .with_observability_layer()
        .with_error_handling_layer(server_config.request_timeout())
}
