//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `robovacd.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;

use robovac_app::scheduler::RefreshMode;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Device-cloud account.
    pub account: AccountConfig,
    /// Background refresh: `"auto"`, a number of seconds (minimum 60),
    /// or `0` to disable.
    pub refresh: RefreshSetting,
    /// Toggle categories to leave out of published updates
    /// (`spot`, `dock`, `dockstate`, `eco`, `nogolines`, `extracare`,
    /// `schedule`, `find`).
    pub hidden: Vec<String>,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Gateway backend selection.
    pub gateway: GatewayConfig,
}

/// Cloud account credentials.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Gateway backend toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Use the simulated robot instead of a real cloud backend.
    pub virtual_enabled: bool,
}

/// Raw refresh setting as it appears in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefreshSetting {
    Seconds(i64),
    Fractional(f64),
    Mode(String),
}

impl Default for RefreshSetting {
    fn default() -> Self {
        Self::Mode("auto".to_string())
    }
}

impl Config {
    /// Load configuration from `robovacd.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("robovacd.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ROBOVAC_EMAIL") {
            self.account.email = val;
        }
        if let Ok(val) = std::env::var("ROBOVAC_PASSWORD") {
            self.account.password = val;
        }
        if let Ok(val) = std::env::var("ROBOVAC_REFRESH") {
            self.refresh = match val.parse::<i64>() {
                Ok(secs) => RefreshSetting::Seconds(secs),
                Err(_) => RefreshSetting::Mode(val),
            };
        }
        if let Ok(val) = std::env::var("ROBOVAC_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.gateway.virtual_enabled && self.account.email.is_empty() {
            return Err(ConfigError::Validation(
                "account email is required unless the virtual gateway is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the configured refresh setting into a policy mode.
    ///
    /// Unknown mode strings and fractional intervals fall back with a
    /// warning rather than failing startup.
    #[must_use]
    pub fn refresh_mode(&self) -> RefreshMode {
        match &self.refresh {
            RefreshSetting::Mode(mode) if mode == "auto" => RefreshMode::Auto,
            RefreshSetting::Mode(other) => {
                tracing::warn!(value = %other, "unknown refresh mode, using auto");
                RefreshMode::Auto
            }
            RefreshSetting::Seconds(secs) => RefreshMode::from_secs(*secs),
            RefreshSetting::Fractional(value) => {
                tracing::warn!(value, "refresh must be a whole number of seconds, using 60");
                RefreshMode::from_secs(60)
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "robovacd=info,robovac=info".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
