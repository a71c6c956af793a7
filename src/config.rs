use serde::{Deserialize, Serialize};

use crate::error::{ParamGuardError, Result};
use crate::utils::{get_env_with_prefix, parse_flag};

/// Top-level configuration for paramguard
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json")]
    pub json: bool,
}

/// Settings applied by every [`Binding`](crate::Binding) built with them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Largest request body read for JSON or form sources (default: 1MB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Emit an info event for every rejected request
    #[serde(default = "default_log_rejections")]
    pub log_rejections: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            log_rejections: default_log_rejections(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json() -> bool {
    false
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

fn default_log_rejections() -> bool {
    true
}

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

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

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn with_json_logging(mut self, enabled: bool) -> Self {
        self.config.logging.json = enabled;
        self
    }

    /// Set the largest request body the binding will buffer, in bytes
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.config.validation.max_body_size = max_body_size;
        self
    }

    pub fn with_log_rejections(mut self, enabled: bool) -> Self {
        self.config.validation.log_rejections = enabled;
        self
    }

    /// Load configuration from environment variables with PARAMGUARD_ prefix
    ///
    /// Unparseable values are ignored and leave the current setting in place.
    pub fn from_env(mut self) -> Self {
        if let Some(level) = get_env_with_prefix("LOG_LEVEL") {
            self.config.logging.level = level;
        }
        if let Some(json) = get_env_with_prefix("LOG_JSON").as_deref().and_then(parse_flag) {
            self.config.logging.json = json;
        }
        if let Some(size) = get_env_with_prefix("MAX_BODY_SIZE") {
            match size.parse() {
                Ok(size) => self.config.validation.max_body_size = size,
                Err(_) => tracing::warn!(value = %size, "Ignoring unparseable MAX_BODY_SIZE"),
            }
        }
        if let Some(enabled) = get_env_with_prefix("LOG_REJECTIONS")
            .as_deref()
            .and_then(parse_flag)
        {
            self.config.validation.log_rejections = enabled;
        }
        self
    }

    /// Build the configuration, validating all settings
    ///
    /// # Errors
    ///
    /// Returns [`ParamGuardError::Configuration`] for an unknown log level or
    /// a zero body size limit.
    pub fn build(self) -> Result<Config> {
        if !VALID_LOG_LEVELS.contains(&self.config.logging.level.to_lowercase().as_str()) {
            return Err(ParamGuardError::configuration(format!(
                "Invalid log level: {}. Must be one of: {}",
                self.config.logging.level,
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        if self.config.validation.max_body_size == 0 {
            return Err(ParamGuardError::configuration(
                "Maximum body size must be greater than 0",
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
