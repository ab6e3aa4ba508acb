//! Layered CLI configuration
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. `ward.toml` in the working directory, or the file passed with `--config`
//! 3. `WARD__SECTION__KEY` environment variables

use anyhow::Context;
use config::{Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use ward_client::{ClientConfig, EntityKind, EntityRoutes};

const DEFAULT_CONFIG_FILE: &str = "ward.toml";
const ENV_PREFIX: &str = "WARD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ClientConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    /// Per-entity route overrides, keyed by kebab-case entity name.
    pub routes: BTreeMap<EntityKind, EntityRoutes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory holding the persisted session; the platform data dir when unset.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration, reading `path` instead of `ward.toml` when given.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err("api.base_url must not be empty".to_string());
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!(
                "api.base_url must be an http(s) URL, got '{base_url}'"
            ));
        }
        if self.api.timeout_secs == 0 {
            return Err("api.timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.logging.level, "warn");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://hospital.example".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("http(s)"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
base_url = "https://hospital.example/api"
timeout_secs = 5

[session]
dir = "/tmp/ward-session"

[logging]
level = "debug"
json = true

[routes.floor.list]
path = "floors"
"#
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.api.base_url, "https://hospital.example/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.session.dir, Some(PathBuf::from("/tmp/ward-session")));
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);

        let floor = &config.routes[&EntityKind::Floor];
        assert_eq!(floor.list.as_ref().map(|t| t.path.as_str()), Some("floors"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
