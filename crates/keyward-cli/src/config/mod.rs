//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig    # Host, port, timeouts
//! └── service: ServiceConfig  # Token algorithm, secret, issuer, lifetimes
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod server;

use std::process;

use anyhow::Context;
use clap::Parser;
use keyward_server::service::ServiceConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "keyward")]
#[command(about = "Account registration and session token server")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// Session token configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its values
    /// act as environment defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.service
            .validate()
            .context("invalid service configuration")?;
        Ok(())
    }

    /// Logs configuration (no secrets).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );

        self.server.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            algorithm = %self.service.token_algorithm,
            issuer = %self.service.token_issuer,
            audience = %self.service.token_audience,
            access_token_ttl_secs = self.service.access_token_ttl,
            refresh_token_ttl_secs = self.service.refresh_token_ttl,
            secret_from_file = self.service.session_keys.token_secret_file.is_some(),
            "session configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use keyward_server::service::TokenAlgorithm;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_minimal_arguments() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "keyward",
            "--token-secret",
            "0123456789abcdef0123456789abcdef",
            "--token-algorithm",
            "paseto",
            "--port",
            "8080",
        ])?;

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.service.token_algorithm, TokenAlgorithm::Paseto);
        assert!(cli.validate().is_ok());
        Ok(())
    }

    #[test]
    fn reject_conflicting_secret_sources() -> anyhow::Result<()> {
        let cli = Cli::try_parse_from([
            "keyward",
            "--token-secret",
            "0123456789abcdef0123456789abcdef",
            "--token-secret-file",
            "/run/secrets/keyward",
        ])?;

        assert!(cli.validate().is_err());
        Ok(())
    }
}
