//! Listener address and request/shutdown deadlines.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::{Result as AnyhowResult, ensure};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Lowest port the service binds without extra privileges.
const MIN_PORT: u16 = 1024;

/// Accepted range, in seconds, for both deadlines.
const DEADLINE_SECS: RangeInclusive<u64> = 1..=300;

/// Where keyward listens and how long it waits.
///
/// Clap enforces the ranges at parse time; [`ServerConfig::validate`] repeats
/// them for values built in code or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Args, Serialize, Deserialize)]
#[serde(default)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Address to bind; `0.0.0.0` exposes the API on every interface.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on (1024-65535).
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = 3000,
        value_parser = clap::value_parser!(u16).range(i64::from(MIN_PORT)..)
    )]
    pub port: u16,

    /// Seconds a register, login or profile request may take (1-300).
    #[arg(
        long,
        env = "REQUEST_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    pub request_timeout: u64,

    /// Seconds in-flight requests get to finish after a shutdown signal (1-300).
    #[arg(
        long,
        env = "SHUTDOWN_TIMEOUT",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..=300)
    )]
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// Checks the port and both deadlines.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first value outside its range.
    pub fn validate(&self) -> AnyhowResult<()> {
        ensure!(
            self.port >= MIN_PORT,
            "port {} needs elevated privileges, pick one in {}-65535",
            self.port,
            MIN_PORT
        );

        for (option, secs) in [
            ("--request-timeout", self.request_timeout),
            ("--shutdown-timeout", self.shutdown_timeout),
        ] {
            ensure!(
                DEADLINE_SECS.contains(&secs),
                "{option} of {secs}s is outside {}-{}s",
                DEADLINE_SECS.start(),
                DEADLINE_SECS.end()
            );
        }

        Ok(())
    }

    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Deadline applied to every request by the recovery layer.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Grace period before a stuck shutdown is forced.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    #[must_use]
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %self.server_addr(),
            request_timeout_secs = self.request_timeout,
            shutdown_timeout_secs = self.shutdown_timeout,
            "server configuration"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::LOCALHOST.into(),
            port: 3000,
            request_timeout: 30,
            shutdown_timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        server: ServerConfig,
    }

    #[test]
    fn defaults_listen_on_loopback() -> anyhow::Result<()> {
        let config = TestCli::try_parse_from(["keyward", "--host", "127.0.0.1"])?.server;

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.server_addr().to_string(), "127.0.0.1:3000");
        assert!(!config.binds_to_all_interfaces());
        config.validate()
    }

    #[test]
    fn parser_rejects_out_of_range_values() {
        for args in [
            ["keyward", "--port", "443"],
            ["keyward", "--request-timeout", "0"],
            ["keyward", "--shutdown-timeout", "301"],
        ] {
            assert!(TestCli::try_parse_from(args).is_err(), "{args:?}");
        }
    }

    #[test]
    fn validate_names_the_offending_deadline() {
        let config = ServerConfig {
            shutdown_timeout: 0,
            ..ServerConfig::default()
        };

        let error = config.validate().expect_err("zero grace period");
        assert!(error.to_string().contains("--shutdown-timeout"));
    }

    #[test]
    fn deserialized_config_fills_defaults() -> anyhow::Result<()> {
        let config: ServerConfig = serde_json::from_str(r#"{ "host": "0.0.0.0" }"#)?;

        assert!(config.binds_to_all_interfaces());
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        Ok(())
    }
}
