//! Configuration management for contrace.
//!
//! Configuration is loaded from (in priority order):
//! 1. Environment variables (`CONTRACE__` prefix, `__` section separator)
//! 2. Config file (`contrace.toml`, or any prefix passed on the command line)
//! 3. Defaults
//!
//! Each consumer owns its section: the Neo4j client reads `[neo4j]`, the
//! binary reads `[log]`.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::TraceError;

/// Default config file prefix (resolves `contrace.toml`).
pub const DEFAULT_FILE_PREFIX: &str = "contrace";

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "CONTRACE";

/// Logging configuration, `[log]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Emit JSON log lines instead of the human format.
    #[serde(default)]
    pub json: bool,

    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            json: false,
            level: default_level(),
        }
    }
}

/// Load one section from the layered configuration.
///
/// A missing file or a missing section yields `T::default()`. A present
/// section that fails to deserialize is an error.
pub fn load_section<T>(file_prefix: &str, env_prefix: &str, section: &str) -> Result<T, TraceError>
where
    T: DeserializeOwned + Default,
{
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    match cfg.get::<T>(section) {
        Ok(value) => Ok(value),
        Err(config::ConfigError::NotFound(_)) => {
            tracing::debug!(section, "Config section absent, using defaults");
            Ok(T::default())
        }
        Err(e) => Err(e.into()),
    }
}
