use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::{IpnError, Result};
use crate::utils::{env_flag, env_var};

/// Header carrying the provider's HMAC signature.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-nowpayments-sig";

/// Main configuration for IPN callback processing
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub ipn: IpnConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for verifying IPN callbacks.
///
/// The secret is never serialized and is redacted in debug output.
#[derive(Debug, Deserialize, Serialize)]
pub struct IpnConfig {
    #[serde(skip)]
    pub ipn_secret: Option<SecretString>,
    /// Request header carrying the signature
    #[serde(default = "default_signature_header")]
    pub signature_header: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

impl Default for IpnConfig {
    fn default() -> Self {
        Self {
            ipn_secret: None,
            signature_header: default_signature_header(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

fn default_signature_header() -> String {
    DEFAULT_SIGNATURE_HEADER.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

impl IpnConfig {
    /// Load IPN configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(secret) = env_var("IPN_SECRET") {
            config.ipn_secret = Some(secret.into());
        }

        if let Some(header) = env_var("IPN_SIGNATURE_HEADER") {
            config.signature_header = header;
        }

        config
    }
}

/// Builder for Config with environment variable support
#[must_use = "builder does nothing until you call build()"]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_ipn_secret(mut self, secret: impl Into<SecretString>) -> Self {
        self.config.ipn.ipn_secret = Some(secret.into());
        self
    }

    pub fn with_signature_header(mut self, header: impl Into<String>) -> Self {
        self.config.ipn.signature_header = header.into();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Load configuration from environment variables with NOWPAYMENTS_ prefix
    ///
    /// Values already set on the builder are kept when the matching
    /// variable is absent.
    pub fn from_env(mut self) -> Self {
        let ipn = IpnConfig::from_env();
        if ipn.ipn_secret.is_some() {
            self.config.ipn.ipn_secret = ipn.ipn_secret;
        }
        if env_var("IPN_SIGNATURE_HEADER").is_some() {
            self.config.ipn.signature_header = ipn.signature_header;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = env_flag("LOG_JSON") {
            self.config.logging.json = json;
        }

        self
    }

    /// Build the configuration, validating all settings
    ///
    /// A missing IPN secret is not an error here; it is reported when a
    /// signature is first verified.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the log level is not one of trace, debug, info, warn, error
    /// - the signature header name is empty
    pub fn build(self) -> Result<Config> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(IpnError::invalid_config(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        if self.config.ipn.signature_header.trim().is_empty() {
            return Err(IpnError::invalid_config(
                "Signature header name must not be empty",
            ));
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
