//! Configuration loading for Victor Smart-Kill pollers.
//!
//! TOML file merged with `VICTOR_`-prefixed environment variables,
//! credential resolution, and translation to `victor_core::PollerConfig`.
//! The host platform may bypass this crate entirely and build a
//! `PollerConfig` itself.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use victor_core::{DEFAULT_UPDATE_INTERVAL_MINUTES, PollerConfig, ResourceCategory};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured -- set username/password in the config file or VICTOR_USERNAME/VICTOR_PASSWORD")]
    NoCredentials,

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

/// On-disk poller configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FileConfig {
    /// Account username.
    pub username: Option<String>,

    /// Account password (plaintext -- prefer `VICTOR_PASSWORD`).
    pub password: Option<String>,

    /// Poll interval in whole minutes.
    #[serde(default = "default_update_interval")]
    pub update_interval_minutes: u64,

    /// Resource categories to serve (snake_case names, e.g. "traps",
    /// "activity_logs"). Empty means the default set.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Endpoint override for self-hosted mirrors and tests.
    pub base_url: Option<String>,
}

fn default_update_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL_MINUTES
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "victorkill", "victorkill").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("victorkill");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load configuration from the canonical path + environment.
pub fn load() -> Result<PollerConfig, ConfigError> {
    load_from(&config_path())
}

/// Load configuration from an explicit file path + environment.
///
/// The file is optional; environment variables alone can carry a full
/// configuration. Environment wins over file on conflicts.
pub fn load_from(path: &Path) -> Result<PollerConfig, ConfigError> {
    let figment = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("VICTOR_"));

    let file: FileConfig = figment.extract()?;
    to_poller_config(&file)
}

/// Translate an extracted [`FileConfig`] into a validated [`PollerConfig`].
pub fn to_poller_config(file: &FileConfig) -> Result<PollerConfig, ConfigError> {
    let username = file
        .username
        .clone()
        .filter(|u| !u.is_empty())
        .ok_or(ConfigError::NoCredentials)?;
    let password = file
        .password
        .clone()
        .filter(|p| !p.is_empty())
        .ok_or(ConfigError::NoCredentials)?;

    if file.update_interval_minutes == 0 {
        return Err(ConfigError::Validation {
            field: "update_interval_minutes".into(),
            reason: "must be a positive number of minutes".into(),
        });
    }

    let mut config = PollerConfig::new(username, password.into());
    config.update_interval_minutes = file.update_interval_minutes;

    if !file.categories.is_empty() {
        config.categories = file
            .categories
            .iter()
            .map(|name| {
                ResourceCategory::from_str(name).map_err(|_| ConfigError::Validation {
                    field: "categories".into(),
                    reason: format!("unknown resource category '{name}'"),
                })
            })
            .collect::<Result<_, _>>()?;
    }

    if let Some(ref raw) = file.base_url {
        let base_url = raw.parse().map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        config.base_url = Some(base_url);
    }

    Ok(config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_full_config_from_toml() {
        let file = write_config(
            r#"
            username = "tester"
            password = "pw"
            update_interval_minutes = 5
            categories = ["traps", "activity_logs"]
            base_url = "https://mirror.example.com"
            "#,
        );

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.username, "tester");
        assert_eq!(config.password.expose_secret(), "pw");
        assert_eq!(config.update_interval_minutes, 5);
        assert_eq!(
            config.categories,
            vec![ResourceCategory::Traps, ResourceCategory::ActivityLogs]
        );
        assert_eq!(
            config.base_url.unwrap().as_str(),
            "https://mirror.example.com/"
        );
    }

    #[test]
    fn interval_defaults_to_ten_minutes() {
        let file = write_config(
            r#"
            username = "tester"
            password = "pw"
            "#,
        );

        let config = load_from(file.path()).unwrap();
        assert_eq!(config.update_interval_minutes, 10);
        assert_eq!(config.categories, vec![ResourceCategory::Traps]);
    }

    #[test]
    fn missing_credentials_fail_loudly() {
        let file = write_config("update_interval_minutes = 5\n");
        let result = load_from(file.path());
        assert!(matches!(result, Err(ConfigError::NoCredentials)));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config(
            r#"
            username = "tester"
            password = "pw"
            update_interval_minutes = 0
            "#,
        );
        let result = load_from(file.path());
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let file = write_config(
            r#"
            username = "tester"
            password = "pw"
            categories = ["bees"]
            "#,
        );
        let result = load_from(file.path());
        match result {
            Err(ConfigError::Validation { field, reason }) => {
                assert_eq!(field, "categories");
                assert!(reason.contains("bees"));
            }
            other => panic!("expected Validation error, got: {other:?}"),
        }
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let file = write_config(
            r#"
            username = "tester"
            password = "pw"
            base_url = "not a url"
            "#,
        );
        assert!(matches!(
            load_from(file.path()),
            Err(ConfigError::Validation { .. })
        ));
    }
}
