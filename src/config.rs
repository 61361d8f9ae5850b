// src/config.rs
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::errors::{SparrowError, SparrowResult};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub decoration: DecorationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider REST API, without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub app_id: Option<String>,
    pub rest_api_key: Option<String>,
    /// Upper bound on the wait for a provider response, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Fixed per-platform styling merged into every outgoing payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecorationConfig {
    /// Click-through target when the notification data carries no `url`
    pub site_url: String,
    pub web_icon: String,
    pub web_badge: String,
    pub android_accent_color: String,
    pub android_led_color: String,
    pub android_visibility: i8,
    pub android_group: String,
    pub android_group_message: String,
    pub android_large_icon: String,
    pub android_small_icon: String,
    pub android_channel_id: String,
    pub ios_badge_type: String,
    pub ios_badge_count: u32,
    pub ios_sound: String,
}

/// Provider credentials, only obtainable when both secrets are set.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderCredentials {
    pub app_id: String,
    pub rest_api_key: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_api_url() -> String {
    "https://onesignal.com/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            .set_default("provider.api_url", default_api_url())?
            .set_default("provider.timeout_secs", default_timeout_secs())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SPARROW__PROVIDER__TIMEOUT_SECS, SPARROW__DECORATION__SITE_URL, ...
            .add_source(
                Environment::with_prefix("SPARROW")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            // The provider's conventional variable names win over everything else
            .set_override_option("provider.app_id", non_empty_var("ONESIGNAL_APP_ID"))?
            .set_override_option("provider.rest_api_key", non_empty_var("ONESIGNAL_REST_API_KEY"))?
            .set_override_option("server.port", non_empty_var("PORT"))?;

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ProviderConfig {
    /// Both secrets, or a configuration error naming what is missing.
    pub fn credentials(&self) -> SparrowResult<ProviderCredentials> {
        let app_id = self.app_id.as_deref().map(str::trim).filter(|v| !v.is_empty());
        let rest_api_key = self.rest_api_key.as_deref().map(str::trim).filter(|v| !v.is_empty());

        match (app_id, rest_api_key) {
            (Some(app_id), Some(rest_api_key)) => Ok(ProviderCredentials {
                app_id: app_id.to_string(),
                rest_api_key: rest_api_key.to_string(),
            }),
            (None, Some(_)) => Err(SparrowError::configuration("ONESIGNAL_APP_ID is not set")),
            (Some(_), None) => Err(SparrowError::configuration("ONESIGNAL_REST_API_KEY is not set")),
            (None, None) => Err(SparrowError::configuration(
                "ONESIGNAL_APP_ID and ONESIGNAL_REST_API_KEY are not set",
            )),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.clamp(1, 60))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            app_id: None,
            rest_api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self {
            site_url: "https://sparrow.app".to_string(),
            web_icon: "https://sparrow.app/icons/icon-192.png".to_string(),
            web_badge: "https://sparrow.app/icons/badge-72.png".to_string(),
            android_accent_color: "FF1E88E5".to_string(),
            android_led_color: "FF1E88E5".to_string(),
            android_visibility: 1,
            android_group: "sparrow_notifications".to_string(),
            android_group_message: "You have $[notif_count] new notifications".to_string(),
            android_large_icon: "ic_launcher".to_string(),
            android_small_icon: "ic_stat_notification".to_string(),
            android_channel_id: "sparrow_default".to_string(),
            ios_badge_type: "Increase".to_string(),
            ios_badge_count: 1,
            ios_sound: "notification.wav".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.provider.api_url, "https://onesignal.com/api/v1");
        assert_eq!(settings.provider.timeout(), Duration::from_secs(10));
        assert_eq!(settings.server_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_missing_credentials_are_configuration_errors() {
        let provider = ProviderConfig::default();
        assert!(matches!(provider.credentials(), Err(SparrowError::ConfigurationError(_))));

        let provider = ProviderConfig {
            app_id: Some("app".into()),
            rest_api_key: Some("   ".into()),
            ..Default::default()
        };
        match provider.credentials() {
            Err(SparrowError::ConfigurationError(msg)) => assert!(msg.contains("REST_API_KEY")),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_present() {
        let provider = ProviderConfig {
            app_id: Some("app-123".into()),
            rest_api_key: Some("secret".into()),
            ..Default::default()
        };
        let creds = provider.credentials().unwrap();
        assert_eq!(creds.app_id, "app-123");
        assert_eq!(creds.rest_api_key, "secret");
    }

    #[test]
    fn test_timeout_is_clamped() {
        let provider = ProviderConfig { timeout_secs: 0, ..Default::default() };
        assert_eq!(provider.timeout(), Duration::from_secs(1));
        let provider = ProviderConfig { timeout_secs: 600, ..Default::default() };
        assert_eq!(provider.timeout(), Duration::from_secs(60));
    }
}
