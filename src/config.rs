//! Application-level configuration loading: identity mode and notifier wiring.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "FLAKEDATE_BACK_CONFIG_PATH";
/// Base URL baked into secret links when none is configured.
const DEFAULT_PUBLIC_BASE_URL: &str = "https://flakedate.com";
/// Sender address used for notifications when none is configured.
const DEFAULT_MAIL_FROM: &str = "noreply@flakedate.com";

/// How status/toggle requests are mapped to a participant slot.
///
/// `LinkOnly` preserves the observed trust model: whoever holds a secret
/// per-participant link *is* that participant. `EmailRequired` hardens it by
/// demanding a matching email on every status/toggle call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityMode {
    /// Possession of a per-participant token is sufficient proof of identity.
    #[default]
    LinkOnly,
    /// A matching email must accompany every request.
    EmailRequired,
}

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Identity-resolution mode applied to status/toggle requests.
    pub identity_mode: IdentityMode,
    /// Base URL used when composing secret event links.
    pub public_base_url: String,
    /// Mail relay endpoint notifications are POSTed to; `None` disables
    /// outbound delivery and falls back to log-only notifications.
    pub mail_relay_url: Option<String>,
    /// Sender address attached to notifications.
    pub mail_from: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        mode = ?config.identity_mode,
                        relay = config.mail_relay_url.is_some(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Compose the secret management link for one participant token.
    pub fn secret_link(&self, token: &str) -> String {
        format!(
            "{}/event/{token}",
            self.public_base_url.trim_end_matches('/')
        )
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            identity_mode: IdentityMode::default(),
            public_base_url: DEFAULT_PUBLIC_BASE_URL.into(),
            mail_relay_url: None,
            mail_from: DEFAULT_MAIL_FROM.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    identity_mode: IdentityMode,
    public_base_url: Option<String>,
    mail_relay_url: Option<String>,
    mail_from: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        Self {
            identity_mode: raw.identity_mode,
            public_base_url: raw
                .public_base_url
                .unwrap_or_else(|| DEFAULT_PUBLIC_BASE_URL.into()),
            mail_relay_url: raw.mail_relay_url,
            mail_from: raw.mail_from.unwrap_or_else(|| DEFAULT_MAIL_FROM.into()),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_link_tolerates_trailing_slash() {
        let config = AppConfig {
            public_base_url: "https://flakedate.example/".into(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.secret_link("abc123"),
            "https://flakedate.example/event/abc123"
        );
    }

    #[test]
    fn raw_config_fills_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"identity_mode":"email_required"}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.identity_mode, IdentityMode::EmailRequired);
        assert_eq!(config.public_base_url, DEFAULT_PUBLIC_BASE_URL);
        assert_eq!(config.mail_from, DEFAULT_MAIL_FROM);
        assert!(config.mail_relay_url.is_none());
    }
}
