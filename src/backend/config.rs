//! Backend configuration parsed from environment variables.

use super::types::BackendError;
use crate::config::{env_first, env_parse};

pub const DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS: u64 = 10;

const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
const ANON_KEY_VARS: [&str; 2] = ["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"];

/// Values shipped in `.env.example` templates. Treated the same as unset.
const PLACEHOLDER_VALUES: [&str; 5] = [
    "your-supabase-url",
    "your-supabase-anon-key",
    "https://your-project.supabase.co",
    "your-anon-key",
    "placeholder",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for BackendTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Project endpoint without a trailing slash.
    pub url: String,
    pub anon_key: String,
    pub timeouts: BackendTimeouts,
}

impl BackendConfig {
    /// Build typed backend config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL` (or `NEXT_PUBLIC_SUPABASE_URL`)
    /// - `SUPABASE_ANON_KEY` (or `NEXT_PUBLIC_SUPABASE_ANON_KEY`)
    ///
    /// Optional:
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if either required value is missing or still holds a
    /// template placeholder. Callers treat this as demonstration mode.
    pub fn from_env() -> Result<Self, BackendError> {
        let timeouts = BackendTimeouts {
            request_secs: env_parse("BACKEND_REQUEST_TIMEOUT_SECS", DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("BACKEND_CONNECT_TIMEOUT_SECS", DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS),
        };
        Self::new(env_first(&URL_VARS), env_first(&ANON_KEY_VARS), timeouts)
    }

    /// Validate raw values.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::MissingConfig`] or
    /// [`BackendError::PlaceholderConfig`] naming the offending variable.
    pub fn new(url: Option<String>, anon_key: Option<String>, timeouts: BackendTimeouts) -> Result<Self, BackendError> {
        let url = require(url, URL_VARS[0])?;
        let anon_key = require(anon_key, ANON_KEY_VARS[0])?;
        Ok(Self { url: url.trim_end_matches('/').to_owned(), anon_key, timeouts })
    }
}

fn require(value: Option<String>, var: &str) -> Result<String, BackendError> {
    let value = value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| BackendError::MissingConfig { var: var.to_owned() })?;
    if is_placeholder(&value) {
        return Err(BackendError::PlaceholderConfig { var: var.to_owned() });
    }
    Ok(value)
}

/// `true` for known template values that must never reach the network.
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    PLACEHOLDER_VALUES.contains(&value.as_str()) || value.contains("your-project")
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
