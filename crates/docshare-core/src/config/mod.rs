//! Application configuration schemas.
//!
//! All configuration structs are deserialized from an optional TOML file
//! via the `config` crate, overlaid with `DOCSHARE__*` environment
//! variables. Each sub-module represents a logical configuration section
//! and every field has a default, so a missing file is not an error.

pub mod logging;
pub mod remote;
pub mod share;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::remote::RemoteConfig;
use self::share::{ShareConfig, UploadConfig};

use crate::error::AppError;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Remote document service settings.
    #[serde(default)]
    pub remote: RemoteConfig,
    /// Share defaults.
    #[serde(default)]
    pub share: ShareConfig,
    /// Upload tuning.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The file is optional. Environment variables prefixed with
    /// `DOCSHARE` and using `__` as the section separator override file
    /// values, e.g. `DOCSHARE__REMOTE__AUTH__TOKEN`.
    pub fn load(path: &str) -> Result<Self, AppError> {
        tracing::debug!(path, "Loading configuration");
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("DOCSHARE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check that enough is configured to talk to the document service.
    pub fn ensure_configured(&self) -> Result<(), AppError> {
        if self.remote.base_url.trim().is_empty() {
            return Err(AppError::configuration(
                "application not configured: remote.base_url is empty",
            ));
        }
        if self.remote.category_no <= 0 {
            return Err(AppError::configuration(
                "application not configured: remote.category_no is not set",
            ));
        }
        if !self.remote.auth.has_credentials() {
            return Err(AppError::configuration(
                "no authentication token found",
            ));
        }
        Ok(())
    }

    /// A copy safe to print: every secret is replaced by a mask.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for secret in [&mut copy.remote.auth.password, &mut copy.remote.auth.token] {
            if !secret.is_empty() {
                *secret = "********".to_string();
            }
        }
        copy
    }
}
