use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::service::security::{SessionKeys, SessionKeysConfig};
use crate::service::session::{
    Clock, SessionCodec, SessionLifetimes, SessionSettings, TokenAlgorithm,
};
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Default `iss` claim.
    pub const TOKEN_ISSUER: &str = "keyward";

    /// Default `aud` claim.
    pub const TOKEN_AUDIENCE: &str = "keyward:api";

    /// Default access token lifetime in seconds.
    pub const ACCESS_TOKEN_TTL: u64 = 3600;

    /// Default refresh token lifetime in seconds.
    pub const REFRESH_TOKEN_TTL: u64 = 86400;

    pub fn token_issuer() -> String {
        TOKEN_ISSUER.to_owned()
    }

    pub fn token_audience() -> String {
        TOKEN_AUDIENCE.to_owned()
    }

    pub const fn access_token_ttl() -> u64 {
        ACCESS_TOKEN_TTL
    }

    pub const fn refresh_token_ttl() -> u64 {
        REFRESH_TOKEN_TTL
    }
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Session token algorithm.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "TOKEN_ALGORITHM", value_enum, default_value_t = TokenAlgorithm::Jwt)
    )]
    #[serde(default)]
    pub token_algorithm: TokenAlgorithm,

    /// Session secret source.
    #[cfg_attr(any(test, feature = "config"), command(flatten))]
    #[serde(flatten)]
    pub session_keys: SessionKeysConfig,

    /// Issuer embedded in and required from every token.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "TOKEN_ISSUER", default_value = defaults::TOKEN_ISSUER)
    )]
    #[serde(default = "defaults::token_issuer")]
    pub token_issuer: String,

    /// Audience embedded in and required from every token.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "TOKEN_AUDIENCE", default_value = defaults::TOKEN_AUDIENCE)
    )]
    #[serde(default = "defaults::token_audience")]
    pub token_audience: String,

    /// Access token lifetime in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "ACCESS_TOKEN_TTL", default_value_t = defaults::ACCESS_TOKEN_TTL)
    )]
    #[serde(default = "defaults::access_token_ttl")]
    pub access_token_ttl: u64,

    /// Refresh token lifetime in seconds.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long, env = "REFRESH_TOKEN_TTL", default_value_t = defaults::REFRESH_TOKEN_TTL)
    )]
    #[serde(default = "defaults::refresh_token_ttl")]
    pub refresh_token_ttl: u64,
}

impl ServiceConfig {
    /// Creates a configuration with defaults and the given secret source.
    pub fn new(session_keys: SessionKeysConfig) -> Self {
        Self {
            token_algorithm: TokenAlgorithm::default(),
            session_keys,
            token_issuer: defaults::token_issuer(),
            token_audience: defaults::token_audience(),
            access_token_ttl: defaults::ACCESS_TOKEN_TTL,
            refresh_token_ttl: defaults::REFRESH_TOKEN_TTL,
        }
    }

    /// Sets the token algorithm.
    pub fn with_token_algorithm(mut self, token_algorithm: TokenAlgorithm) -> Self {
        self.token_algorithm = token_algorithm;
        self
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the secret sources are ambiguous,
    /// issuer or audience is empty, or the token lifetimes are inconsistent.
    pub fn validate(&self) -> Result<()> {
        self.session_keys.validate()?;

        if self.token_issuer.trim().is_empty() {
            return Err(Error::config("token issuer cannot be empty"));
        }

        if self.token_audience.trim().is_empty() {
            return Err(Error::config("token audience cannot be empty"));
        }

        self.session_lifetimes()?;
        Ok(())
    }

    /// Returns the configured token lifetimes.
    pub fn session_lifetimes(&self) -> Result<SessionLifetimes> {
        SessionLifetimes::from_secs(self.access_token_ttl, self.refresh_token_ttl)
    }

    /// Returns the issuance settings shared by every token.
    pub fn session_settings(&self) -> Result<SessionSettings> {
        let settings = SessionSettings::new(&self.token_issuer, &self.token_audience)
            .with_lifetimes(self.session_lifetimes()?);
        Ok(settings)
    }

    /// Loads the session secret from the configured source.
    pub async fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_config(&self.session_keys).await
    }

    /// Creates the session codec for the configured algorithm.
    pub fn create_session_codec(
        &self,
        keys: &SessionKeys,
        clock: Arc<dyn Clock>,
    ) -> Result<SessionCodec> {
        SessionCodec::new(self.token_algorithm, keys, self.session_settings()?, clock)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        service: ServiceConfig,
    }

    #[test]
    fn parse_defaults() -> anyhow::Result<()> {
        let cli = TestCli::try_parse_from(["keyward", "--token-secret", "secret"])?;
        let config = cli.service;

        assert_eq!(config.token_algorithm, TokenAlgorithm::Jwt);
        assert_eq!(config.token_issuer, "keyward");
        assert_eq!(config.token_audience, "keyward:api");
        assert_eq!(config.access_token_ttl, 3600);
        assert_eq!(config.refresh_token_ttl, 86400);
        assert_eq!(config.session_keys.token_secret.as_deref(), Some("secret"));
        config.validate()?;
        Ok(())
    }

    #[test]
    fn parse_paseto_with_secret_file() -> anyhow::Result<()> {
        let cli = TestCli::try_parse_from([
            "keyward",
            "--token-algorithm",
            "paseto",
            "--token-secret-file",
            "./secret.key",
            "--access-token-ttl",
            "600",
        ])?;
        let config = cli.service;

        assert_eq!(config.token_algorithm, TokenAlgorithm::Paseto);
        assert_eq!(
            config.session_keys.token_secret_file.as_deref(),
            Some(std::path::Path::new("./secret.key"))
        );
        assert_eq!(config.session_lifetimes()?.access().as_secs(), 600);
        Ok(())
    }

    #[test]
    fn reject_inconsistent_lifetimes() {
        let mut config = ServiceConfig::new(SessionKeysConfig::from_secret("secret"));
        config.access_token_ttl = 7200;
        config.refresh_token_ttl = 3600;
        assert!(config.validate().is_err());

        config.access_token_ttl = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_lifetimes_past_the_supported_range() {
        let mut config = ServiceConfig::new(SessionKeysConfig::from_secret("secret"));
        config.access_token_ttl = 1_000_000_000_000;
        config.refresh_token_ttl = 1_000_000_000_000;
        assert!(config.validate().is_err());
        assert!(config.session_settings().is_err());

        config.access_token_ttl = 3600;
        config.refresh_token_ttl = 3650 * 24 * 3600;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reject_ambiguous_secret_sources() {
        let mut config = ServiceConfig::new(SessionKeysConfig::from_secret("secret"));
        config.session_keys.token_secret_file = Some("./secret.key".into());
        assert!(config.validate().is_err());

        config.session_keys = SessionKeysConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_empty_issuer() {
        let mut config = ServiceConfig::new(SessionKeysConfig::from_secret("secret"));
        config.token_issuer = "  ".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserialize_with_defaults() -> anyhow::Result<()> {
        let config: ServiceConfig =
            serde_json::from_str(r#"{ "token_algorithm": "paseto", "token_secret": "s" }"#)?;

        assert_eq!(config.token_algorithm, TokenAlgorithm::Paseto);
        assert_eq!(config.token_issuer, "keyward");
        assert_eq!(config.refresh_token_ttl, 86400);
        Ok(())
    }
}
