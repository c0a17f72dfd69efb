//! Layered configuration.
//!
//! Sources, later ones winning: built-in defaults, `courier.toml` in the
//! platform config directory, an explicit `--config` file, then
//! `COURIER_*` environment variables with `__` between sections
//! (`COURIER_BACKEND__MODE=local`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

const ENV_PREFIX: &str = "COURIER";
const CONFIG_FILE: &str = "courier.toml";

/// Where entity operations are routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Commands posted to the native backend.
    Native,
    /// The local key-value fallback.
    Local,
}

/// Native backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub mode: BackendMode,
    /// Base URL commands are posted under.
    pub endpoint: String,
    /// Timeout of one command, in milliseconds.
    pub timeout_ms: u64,
}

/// Local storage settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory of the local store files and the response cache.
    pub data_dir: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
}

/// Complete configuration of the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct CourierConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("courier")
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("courier").join(CONFIG_FILE))
}

fn builder(
    explicit: Option<&Path>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("backend.mode", "local")?
        .set_default("backend.endpoint", "http://127.0.0.1:7001")?
        .set_default("backend.timeout_ms", 30_000)?
        .set_default(
            "storage.data_dir",
            default_data_dir().to_string_lossy().into_owned(),
        )?
        .set_default("log.level", "info")?;

    if let Some(path) = default_config_file() {
        builder = builder.add_source(config::File::from(path).required(false));
    }
    if let Some(path) = explicit {
        builder = builder.add_source(config::File::from(path));
    }
    Ok(builder)
}

impl CourierConfig {
    /// Loads the configuration from every source.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or a value has the
    /// wrong type.
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        builder(explicit)?
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Loads defaults and the explicit file with `overrides` applied,
    /// ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a value has the wrong type.
    pub fn load_with(
        explicit: Option<&Path>,
        overrides: &[(&str, &str)],
    ) -> Result<Self, config::ConfigError> {
        let mut builder = builder(explicit)?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let cfg = CourierConfig::load_with(None, &[]).unwrap();
        assert_eq!(cfg.backend.mode, BackendMode::Local);
        assert_eq!(cfg.backend.timeout_ms, 30_000);
        assert!(cfg.storage.data_dir.ends_with("courier"));
    }

    #[test]
    fn test_explicit_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(
            &file,
            "[backend]\nmode = \"native\"\nendpoint = \"http://10.0.0.1:9000\"\n",
        )
        .unwrap();

        let cfg = CourierConfig::load_with(Some(&file), &[("log.level", "debug")]).unwrap();
        assert_eq!(cfg.backend.mode, BackendMode::Native);
        assert_eq!(cfg.backend.endpoint, "http://10.0.0.1:9000");
        assert_eq!(cfg.log.level, "debug");
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let err = CourierConfig::load_with(None, &[("backend.mode", "remote")]);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = CourierConfig::load_with(Some(Path::new("/nonexistent/courier.toml")), &[]);
        assert!(err.is_err());
    }
}
