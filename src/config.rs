//! Process configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_APP_URL: &str = "http://localhost:3000";
pub const DEFAULT_TOKEN_REFRESH_INTERVAL_SECS: u64 = 60;

/// Server-level settings. Backend credentials live in
/// [`crate::backend::config::BackendConfig`] because their absence is not an
/// error for the process, only a switch into demonstration mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Public base URL of this service, used to build auth redirect targets.
    pub app_url: String,
    pub token_refresh_interval: Duration,
}

impl AppConfig {
    /// Build from environment variables.
    ///
    /// - `PORT`: default 3000
    /// - `APP_URL` (or `NEXT_PUBLIC_APP_URL`): default `http://localhost:3000`
    /// - `TOKEN_REFRESH_INTERVAL_SECS`: default 60
    #[must_use]
    pub fn from_env() -> Self {
        let app_url = env_first(&["APP_URL", "NEXT_PUBLIC_APP_URL"])
            .unwrap_or_else(|| DEFAULT_APP_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            app_url,
            token_refresh_interval: Duration::from_secs(env_parse(
                "TOKEN_REFRESH_INTERVAL_SECS",
                DEFAULT_TOKEN_REFRESH_INTERVAL_SECS,
            )),
        }
    }

    /// Absolute URL the identity provider should send the user back to.
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!("{}/auth/callback", self.app_url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            app_url: DEFAULT_APP_URL.to_owned(),
            token_refresh_interval: Duration::from_secs(DEFAULT_TOKEN_REFRESH_INTERVAL_SECS),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// First of `keys` that is set to a non-blank value, trimmed.
pub(crate) fn env_first(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
