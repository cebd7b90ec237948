//! Configuration for PayMongo clients and webhook verification.
//!
//! Values are read from `PAYMONGO_*` environment variables by
//! [`PayMongoConfig::from_env`], or built in code with [`PayMongoConfig::new`]
//! and the `with_*` builders. The resulting config is passed explicitly to
//! [`PayMongoClient::from_config`](crate::client::PayMongoClient::from_config).

use crate::errors::{PayMongoError, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::str::FromStr;

/// Default PayMongo API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.paymongo.com/v1";

/// Default transaction currency.
pub const DEFAULT_CURRENCY: &str = "PHP";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default number of retries after a failed attempt.
pub const DEFAULT_RETRIES: u32 = 2;

/// PayMongo environment.
///
/// Only the exact name `"production"` selects [`Environment::Production`];
/// every other name is treated as sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Test mode
    #[default]
    Sandbox,
    /// Live mode
    Production,
}

impl Environment {
    /// Canonical name of the environment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Sandbox => "sandbox",
            Environment::Production => "production",
        }
    }

    /// Check if this is the production environment
    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

impl From<&str> for Environment {
    fn from(name: &str) -> Self {
        if name == "production" {
            Environment::Production
        } else {
            Environment::Sandbox
        }
    }
}

impl From<&String> for Environment {
    fn from(name: &String) -> Self {
        Environment::from(name.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PayMongo configuration.
#[derive(Debug, Clone)]
pub struct PayMongoConfig {
    /// Sandbox or production
    pub environment: Environment,

    /// Public key (`pk_test_...` / `pk_live_...`)
    pub public_key: Option<String>,

    /// Secret key (`sk_test_...` / `sk_live_...`)
    pub secret_key: SecretString,

    /// Shared secret used to sign webhook notifications
    pub webhook_secret: Option<SecretString>,

    /// API base URL
    pub base_url: String,

    /// Default currency for transactions
    pub currency: String,

    /// Request timeout in seconds; `0` disables it
    pub timeout_secs: u64,

    /// Retries after a failed attempt
    pub retries: u32,
}

impl PayMongoConfig {
    /// Creates a sandbox configuration with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use paymongo_rs::config::{Environment, PayMongoConfig};
    ///
    /// let config = PayMongoConfig::new("sk_test_abc123")
    ///     .with_environment(Environment::Production)
    ///     .with_retries(0);
    ///
    /// assert!(config.environment.is_production());
    /// assert_eq!(config.currency, "PHP");
    /// ```
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            environment: Environment::default(),
            public_key: None,
            secret_key: SecretString::new(secret_key.into()),
            webhook_secret: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
        }
    }

    /// Sets the environment.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Sets the public key.
    pub fn with_public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Sets the webhook signing secret.
    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(SecretString::new(secret.into()));
        self
    }

    /// Sets a custom API base URL (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the default currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the number of retries.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Loads configuration from process environment variables.
    ///
    /// Reads:
    /// - `PAYMONGO_ENVIRONMENT` (default `sandbox`)
    /// - `PAYMONGO_PUBLIC_KEY`
    /// - `PAYMONGO_SECRET_KEY`
    /// - `PAYMONGO_WEBHOOK_SECRET`
    /// - `PAYMONGO_BASE_URL` (default `https://api.paymongo.com/v1`)
    /// - `PAYMONGO_CURRENCY` (default `PHP`)
    /// - `PAYMONGO_TIMEOUT` in seconds (default 15)
    /// - `PAYMONGO_RETRIES` (default 2)
    ///
    /// A missing secret key is not an error here; client construction
    /// rejects it.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut config = Self::new(get("PAYMONGO_SECRET_KEY").unwrap_or_default());

        if let Some(environment) = get("PAYMONGO_ENVIRONMENT") {
            config.environment = Environment::from(environment.trim());
        }
        config.public_key = get("PAYMONGO_PUBLIC_KEY");
        config.webhook_secret = get("PAYMONGO_WEBHOOK_SECRET").map(SecretString::new);
        if let Some(base_url) = get("PAYMONGO_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(currency) = get("PAYMONGO_CURRENCY") {
            config.currency = currency;
        }
        if let Some(timeout) = get("PAYMONGO_TIMEOUT") {
            config.timeout_secs = parse_number("PAYMONGO_TIMEOUT", &timeout)?;
        }
        if let Some(retries) = get("PAYMONGO_RETRIES") {
            config.retries = parse_number("PAYMONGO_RETRIES", &retries)?;
        }

        Ok(config)
    }

    /// Check if using a test-mode secret key
    pub fn is_test_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using a live-mode secret key
    pub fn is_live_mode(&self) -> bool {
        self.secret_key.expose_secret().starts_with("sk_live_")
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        let secret_key = self.secret_key.expose_secret();
        if secret_key.trim().is_empty() {
            return Err(PayMongoError::MissingSecretKey);
        }
        if !secret_key.starts_with("sk_") {
            return Err(PayMongoError::ConfigError(
                "secret key must start with sk_".to_string(),
            ));
        }
        if let Some(public_key) = &self.public_key {
            if !public_key.starts_with("pk_") {
                return Err(PayMongoError::ConfigError(
                    "public key must start with pk_".to_string(),
                ));
            }
        }
        url::Url::parse(&self.base_url)?;

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PayMongoError::ConfigError(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_environment_from_name() {
        assert_eq!(Environment::from("production"), Environment::Production);
        assert_eq!(Environment::from("sandbox"), Environment::Sandbox);
        assert_eq!(Environment::from("staging"), Environment::Sandbox);
        assert_eq!(Environment::from("Production"), Environment::Sandbox);
        assert_eq!(Environment::from(""), Environment::Sandbox);
    }

    #[test]
    fn test_defaults() {
        let config = PayMongoConfig::new("sk_test_abc123");
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.retries, 2);
        assert!(config.webhook_secret.is_none());
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = PayMongoConfig::from_lookup(lookup(&[
            ("PAYMONGO_ENVIRONMENT", "production"),
            ("PAYMONGO_PUBLIC_KEY", "pk_live_abc"),
            ("PAYMONGO_SECRET_KEY", "sk_live_abc"),
            ("PAYMONGO_WEBHOOK_SECRET", "whsk_abc"),
            ("PAYMONGO_BASE_URL", "http://localhost:8080/v1"),
            ("PAYMONGO_CURRENCY", "USD"),
            ("PAYMONGO_TIMEOUT", "30"),
            ("PAYMONGO_RETRIES", "0"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.public_key.as_deref(), Some("pk_live_abc"));
        assert_eq!(config.secret_key.expose_secret(), "sk_live_abc");
        assert_eq!(
            config.webhook_secret.as_ref().map(|s| s.expose_secret().as_str()),
            Some("whsk_abc")
        );
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.currency, "USD");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.retries, 0);
        assert!(config.is_live_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_missing_secret_is_deferred() {
        let config = PayMongoConfig::from_lookup(lookup(&[])).unwrap();
        assert!(config.secret_key.expose_secret().is_empty());
        assert!(matches!(config.validate(), Err(PayMongoError::MissingSecretKey)));
    }

    #[test]
    fn test_from_lookup_rejects_bad_numbers() {
        let result = PayMongoConfig::from_lookup(lookup(&[
            ("PAYMONGO_SECRET_KEY", "sk_test_abc"),
            ("PAYMONGO_TIMEOUT", "fifteen"),
        ]));
        assert!(matches!(result, Err(PayMongoError::ConfigError(_))));

        let result = PayMongoConfig::from_lookup(lookup(&[("PAYMONGO_RETRIES", "-1")]));
        assert!(matches!(result, Err(PayMongoError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rules() {
        let bad_prefix = PayMongoConfig::new("pk_test_abc");
        assert!(matches!(bad_prefix.validate(), Err(PayMongoError::ConfigError(_))));

        let bad_public = PayMongoConfig::new("sk_test_abc").with_public_key("sk_test_oops");
        assert!(matches!(bad_public.validate(), Err(PayMongoError::ConfigError(_))));

        let no_timeout = PayMongoConfig::new("sk_test_abc").with_timeout(0);
        assert!(no_timeout.validate().is_ok());

        let bad_url = PayMongoConfig::new("sk_test_abc").with_base_url("not a url");
        assert!(matches!(bad_url.validate(), Err(PayMongoError::UrlParseError(_))));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = PayMongoConfig::new("sk_test_supersecret").with_webhook_secret("whsk_hidden");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("supersecret"));
        assert!(!debug.contains("whsk_hidden"));
    }
}
