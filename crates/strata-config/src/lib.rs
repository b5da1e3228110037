//! Configuration for the Strata type-checking core.
//!
//! A `strata.toml` file has two sections: `[logging]` controls the tracing subscriber installed by
//! [`init_tracing`], and `[checker]` carries the limits the type engine applies while walking
//! class hierarchies.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;
mod schema;

pub use logging::init_tracing;
pub use schema::json_schema;

/// Tracing target used by configuration loading.
pub const CONFIG_TARGET: &str = "strata.config";

/// Hard ceiling for [`CheckerConfig::max_hierarchy_depth`].
pub const MAX_HIERARCHY_DEPTH_LIMIT: usize = 65_536;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct StrataConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub checker: CheckerConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Strata crates.
    ///
    /// Either a simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string such
    /// as `strata.types=trace,info`.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Mirror logs to stderr.
    #[serde(default = "LoggingConfig::default_stderr")]
    pub stderr: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    fn default_stderr() -> bool {
        true
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            // Anything else is treated as an `EnvFilter` directive string.
            _ => trimmed.to_owned(),
        }
    }

    fn config_env_filter(&self) -> tracing_subscriber::EnvFilter {
        let directives = Self::normalize_level_directives(&self.level);
        tracing_subscriber::EnvFilter::try_new(directives).unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::default()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        })
    }

    /// Create the effective `EnvFilter`.
    ///
    /// If `RUST_LOG` is set, it is merged into the configured directives.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let config_directives = Self::normalize_level_directives(&self.level);

        match env_directives {
            Some(env_directives) => {
                let combined = format!("{config_directives},{env_directives}");
                tracing_subscriber::EnvFilter::try_new(combined)
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| self.config_env_filter())
            }
            None => self.config_env_filter(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            stderr: Self::default_stderr(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct CheckerConfig {
    /// Upper bound on the number of links followed by any supertype, interface or
    /// enclosing-class walk. Walks that exceed it are reported as cyclic inheritance.
    #[serde(default = "CheckerConfig::default_max_hierarchy_depth")]
    #[schemars(range(min = 1, max = 65536))]
    pub max_hierarchy_depth: usize,
}

impl CheckerConfig {
    pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 256;

    fn default_max_hierarchy_depth() -> usize {
        Self::DEFAULT_MAX_HIERARCHY_DEPTH
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: Self::DEFAULT_MAX_HIERARCHY_DEPTH,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep just the message.
        Self::Toml(err.message().to_owned())
    }
}

impl StrataConfig {
    /// Parse and validate a config from TOML text.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let config: StrataConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(
            target: CONFIG_TARGET,
            path = %path.display(),
            max_hierarchy_depth = config.checker.max_hierarchy_depth,
            "loaded config"
        );
        Ok(config)
    }

    /// Semantic checks that serde alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.checker.max_hierarchy_depth;
        if depth == 0 {
            return Err(ConfigError::Invalid {
                key: "checker.max_hierarchy_depth",
                message: "must be >= 1".to_owned(),
            });
        }
        if depth > MAX_HIERARCHY_DEPTH_LIMIT {
            return Err(ConfigError::Invalid {
                key: "checker.max_hierarchy_depth",
                message: format!("must be <= {MAX_HIERARCHY_DEPTH_LIMIT}"),
            });
        }
        Ok(())
    }
}
