// ── Runtime poller configuration ──
//
// Describes *what* to poll and with which credentials. Carries credential
// data and tuning, never touches disk -- the host (or victor-config)
// constructs a `PollerConfig` and hands it in.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::error::CoreError;

/// Default poll interval in minutes.
pub const DEFAULT_UPDATE_INTERVAL_MINUTES: u64 = 10;

/// A resource family served by the API.
///
/// Only [`Traps`](Self::Traps) is on the coordinator's hot path; the
/// rest are fetched on demand by the host when enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceCategory {
    Traps,
    ActivityLogs,
    Operators,
    Profiles,
    Users,
    MobileApps,
}

/// Configuration for one poller instance.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Account username. Required.
    pub username: String,
    /// Account password. Required; never logged in cleartext.
    pub password: SecretString,
    /// Poll interval in whole minutes. Must be positive.
    pub update_interval_minutes: u64,
    /// Resource families the host wants served.
    pub categories: Vec<ResourceCategory>,
    /// Endpoint override (tests, self-hosted mirrors). `None` uses the
    /// production endpoint.
    pub base_url: Option<Url>,
}

impl PollerConfig {
    /// A config with the default interval and the traps category enabled.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            update_interval_minutes: DEFAULT_UPDATE_INTERVAL_MINUTES,
            categories: vec![ResourceCategory::Traps],
            base_url: None,
        }
    }

    /// Validate the configuration. Called at coordinator construction so
    /// a bad config fails before any network traffic.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.username.is_empty() {
            return Err(CoreError::Config {
                message: "username is required".into(),
            });
        }
        if self.password.expose_secret().is_empty() {
            return Err(CoreError::Config {
                message: "password is required".into(),
            });
        }
        if self.update_interval_minutes == 0 {
            return Err(CoreError::Config {
                message: "update interval must be a positive number of minutes".into(),
            });
        }
        Ok(())
    }

    /// The poll interval as a [`Duration`].
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_minutes * 60)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn secret(value: &str) -> SecretString {
        value.to_string().into()
    }

    #[test]
    fn default_interval_is_ten_minutes() {
        let config = PollerConfig::new("tester", secret("pw"));
        assert_eq!(config.update_interval(), Duration::from_secs(600));
        assert_eq!(config.categories, vec![ResourceCategory::Traps]);
    }

    #[test]
    fn empty_credentials_fail_validation() {
        let config = PollerConfig::new("", secret("pw"));
        assert!(config.validate().is_err());

        let config = PollerConfig::new("tester", secret(""));
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_fails_validation() {
        let mut config = PollerConfig::new("tester", secret("pw"));
        config.update_interval_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn categories_round_trip_through_strings() {
        assert_eq!(ResourceCategory::Traps.to_string(), "traps");
        assert_eq!(
            ResourceCategory::from_str("activity_logs").unwrap(),
            ResourceCategory::ActivityLogs
        );
        assert!(ResourceCategory::from_str("bees").is_err());
    }
}
