//! Console configuration loaded via OrthoConfig.
//!
//! Values come from `EDTECH_*` environment variables or a configuration
//! file. Credentials have no defaults: a missing backend URL or key is a
//! typed [`ConfigError`] rather than a half-configured client.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{DEFAULT_REFRESH_INTERVAL, GALLERY_BUCKET};
use crate::outbound::remote::RemoteClientConfig;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
const DEFAULT_NOTICE_LIMIT: usize = 5;

/// Errors raised while turning settings into runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required setting is absent or blank.
    #[error("missing required setting {key}")]
    Missing { key: &'static str },
    /// The backend URL did not parse.
    #[error("invalid backend URL '{value}': {message}")]
    InvalidUrl { value: String, message: String },
    /// Settings could not be loaded at all.
    #[error("failed to load settings: {message}")]
    Load { message: String },
}

/// Settings shared by the console and the provisioning binary.
///
/// Every field but the timeout is optional, so an empty environment still
/// yields settings and a missing credential surfaces from its accessor.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EDTECH")]
pub struct ConsoleSettings {
    /// Project URL of the hosted backend.
    pub backend_url: Option<String>,
    /// Public anon key used by the console.
    pub anon_key: Option<String>,
    /// Service-role key used only for provisioning.
    pub service_role_key: Option<String>,
    /// Direct database URL used only for provisioning DDL.
    pub database_url: Option<String>,
    /// Per-request timeout in seconds; zero is treated as one.
    #[ortho_config(default = 15)]
    pub request_timeout_secs: u64,
    /// Notice board polling period in seconds.
    pub notice_refresh_secs: Option<u64>,
    /// Maximum notices shown on the board.
    pub notice_limit: Option<usize>,
    /// Storage bucket holding gallery media.
    pub gallery_bucket: Option<String>,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: None,
            service_role_key: None,
            database_url: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            notice_refresh_secs: None,
            notice_limit: None,
            gallery_bucket: None,
        }
    }
}

fn required(value: Option<&String>, key: &'static str) -> Result<String, ConfigError> {
    value
        .map(|raw| raw.trim())
        .filter(|raw| !raw.is_empty())
        .map(str::to_owned)
        .ok_or(ConfigError::Missing { key })
}

impl ConsoleSettings {
    /// Load settings from the environment and configuration files only.
    ///
    /// Command-line arguments belong to the binaries' own parsers, so
    /// OrthoConfig is handed just the program name.
    pub fn load_from_env(program: &str) -> Result<Self, ConfigError> {
        Self::load_from_iter([OsString::from(program)]).map_err(|error| ConfigError::Load {
            message: error.to_string(),
        })
    }

    /// Parsed backend project URL.
    pub fn backend_url(&self) -> Result<Url, ConfigError> {
        let raw = required(self.backend_url.as_ref(), "EDTECH_BACKEND_URL")?;
        Url::parse(&raw).map_err(|error| ConfigError::InvalidUrl {
            value: raw,
            message: error.to_string(),
        })
    }

    pub fn anon_key(&self) -> Result<Zeroizing<String>, ConfigError> {
        required(self.anon_key.as_ref(), "EDTECH_ANON_KEY").map(Zeroizing::new)
    }

    pub fn service_role_key(&self) -> Result<Zeroizing<String>, ConfigError> {
        required(self.service_role_key.as_ref(), "EDTECH_SERVICE_ROLE_KEY").map(Zeroizing::new)
    }

    pub fn database_url(&self) -> Result<Zeroizing<String>, ConfigError> {
        required(self.database_url.as_ref(), "EDTECH_DATABASE_URL").map(Zeroizing::new)
    }

    /// Request timeout, defaulting to 15 seconds.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Notice board polling period.
    pub fn notice_refresh_interval(&self) -> Duration {
        self.notice_refresh_secs
            .filter(|secs| *secs > 0)
            .map_or(DEFAULT_REFRESH_INTERVAL, Duration::from_secs)
    }

    pub fn notice_limit(&self) -> usize {
        self.notice_limit
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_NOTICE_LIMIT)
    }

    pub fn gallery_bucket(&self) -> &str {
        self.gallery_bucket
            .as_deref()
            .map(str::trim)
            .filter(|bucket| !bucket.is_empty())
            .unwrap_or(GALLERY_BUCKET)
    }

    /// Client configuration authenticated with the anon key.
    pub fn console_client(&self) -> Result<RemoteClientConfig, ConfigError> {
        Ok(RemoteClientConfig {
            base_url: self.backend_url()?,
            api_key: self.anon_key()?,
            timeout: self.request_timeout(),
        })
    }

    /// Client configuration authenticated with the service-role key.
    pub fn provisioning_client(&self) -> Result<RemoteClientConfig, ConfigError> {
        Ok(RemoteClientConfig {
            base_url: self.backend_url()?,
            api_key: self.service_role_key()?,
            timeout: self.request_timeout(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for console configuration parsing.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 8] = [
        "EDTECH_BACKEND_URL",
        "EDTECH_ANON_KEY",
        "EDTECH_SERVICE_ROLE_KEY",
        "EDTECH_DATABASE_URL",
        "EDTECH_REQUEST_TIMEOUT_SECS",
        "EDTECH_NOTICE_REFRESH_SECS",
        "EDTECH_NOTICE_LIMIT",
        "EDTECH_GALLERY_BUCKET",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    fn load() -> ConsoleSettings {
        ConsoleSettings::load_from_env("edtech-console").expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.notice_refresh_interval(), DEFAULT_REFRESH_INTERVAL);
        assert_eq!(settings.notice_limit(), 5);
        assert_eq!(settings.gallery_bucket(), GALLERY_BUCKET);
        assert_eq!(
            settings.backend_url(),
            Err(ConfigError::Missing {
                key: "EDTECH_BACKEND_URL"
            })
        );
        assert_eq!(
            settings.console_client().map(|_| ()),
            Err(ConfigError::Missing {
                key: "EDTECH_BACKEND_URL"
            })
        );
        assert_eq!(
            settings.database_url().map(|_| ()),
            Err(ConfigError::Missing {
                key: "EDTECH_DATABASE_URL"
            })
        );
    }

    #[test]
    fn default_settings_match_an_empty_environment() {
        let settings = ConsoleSettings::default();
        assert_eq!(settings.request_timeout(), Duration::from_secs(15));
        assert_eq!(settings.notice_limit(), 5);
    }

    #[rstest]
    fn zero_timeout_is_clamped() {
        let _guard = lock_env(env_with(&[("EDTECH_REQUEST_TIMEOUT_SECS", "0")]));
        assert_eq!(load().request_timeout(), Duration::from_secs(1));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("EDTECH_BACKEND_URL", "https://project.backend.test"),
            ("EDTECH_ANON_KEY", "anon"),
            ("EDTECH_REQUEST_TIMEOUT_SECS", "3"),
            ("EDTECH_NOTICE_LIMIT", "8"),
            ("EDTECH_GALLERY_BUCKET", "media"),
        ]));

        let settings = load();
        let client = settings.console_client().expect("client config");
        assert_eq!(client.base_url.as_str(), "https://project.backend.test/");
        assert_eq!(client.api_key.as_str(), "anon");
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(settings.notice_limit(), 8);
        assert_eq!(settings.gallery_bucket(), "media");
        assert!(settings.provisioning_client().is_err());
    }

    #[rstest]
    #[case(Some("  "), "EDTECH_ANON_KEY")]
    #[case(None, "EDTECH_ANON_KEY")]
    fn blank_keys_are_missing(#[case] raw: Option<&str>, #[case] key: &'static str) {
        let settings = ConsoleSettings {
            anon_key: raw.map(str::to_owned),
            ..ConsoleSettings::default()
        };
        assert_eq!(settings.anon_key().map(|_| ()), Err(ConfigError::Missing { key }));
    }

    #[test]
    fn malformed_url_is_reported() {
        let settings = ConsoleSettings {
            backend_url: Some("not a url".to_owned()),
            ..ConsoleSettings::default()
        };
        assert!(matches!(
            settings.backend_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
