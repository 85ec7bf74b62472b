//! Backend types: sessions, row queries, errors, and the `Backend` trait.
//!
//! Provider-neutral so the data provider and routes can run against the
//! Supabase client in production and a hand-written mock in tests.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by backend client operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// A required configuration variable is not set.
    #[error("missing config: env var {var} not set")]
    MissingConfig { var: String },

    /// A configuration variable still holds a template placeholder.
    #[error("placeholder config: env var {var} holds a placeholder value")]
    PlaceholderConfig { var: String },

    /// No backend is configured; the service runs on fixture data.
    #[error("backend not configured")]
    NotConfigured,

    /// The auth server rejected the request with a human-readable message.
    #[error("{message}")]
    Auth { message: String },

    /// The HTTP request could not be sent or its body could not be read.
    #[error("backend request failed: {0}")]
    Request(String),

    /// The backend returned a non-success HTTP status.
    #[error("backend response error: status {status}")]
    Response { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("backend response parse failed: {0}")]
    Parse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl BackendError {
    /// Message from a JSON error body on a non-4xx response, when the server
    /// sent one.
    #[must_use]
    pub fn response_message(&self) -> Option<String> {
        let Self::Response { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        ["error_description", "msg", "message", "error"].iter().find_map(|key| {
            value
                .get(*key)?
                .as_str()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_owned)
        })
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Identity attached to a backend session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// An authenticated backend session. Tokens are opaque to everything but the
/// backend client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry as unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: SessionUser,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    /// `true` when the access token expires within `margin_secs` of `now`.
    /// Sessions without a known expiry never count as expiring.
    #[must_use]
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| at - now <= margin_secs)
    }
}

/// What happened to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Push notification emitted by the backend client whenever its stored
/// session changes.
#[derive(Debug, Clone)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

// =============================================================================
// OAUTH PROVIDERS
// =============================================================================

/// Identity providers offered on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    pub const ALL: [Self; 2] = [Self::Google, Self::Github];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }
}

impl std::str::FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::Github),
            other => Err(format!("unknown oauth provider: {other}")),
        }
    }
}

// =============================================================================
// ROW QUERY
// =============================================================================

/// Filtered, ordered read against one backend table.
///
/// Renders to a PostgREST query string: equality filters become
/// `col=eq.value`, ordering becomes `order=col.desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowQuery {
    table: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl RowQuery {
    #[must_use]
    pub fn table(name: &str) -> Self {
        Self { table: name.to_owned(), filters: Vec::new(), order: None }
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some((column.to_owned(), false));
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[cfg(test)]
    #[must_use]
    pub fn filters(&self) -> &[(String, String)] {
        &self.filters
    }

    /// Ordering column and whether it is ascending.
    #[cfg(test)]
    #[must_use]
    pub fn order(&self) -> Option<(&str, bool)> {
        self.order.as_ref().map(|(col, asc)| (col.as_str(), *asc))
    }

    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut parts = vec!["select=*".to_owned()];
        for (column, value) in &self.filters {
            parts.push(format!("{}=eq.{}", urlencoding::encode(column), urlencoding::encode(value)));
        }
        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            parts.push(format!("order={}.{direction}", urlencoding::encode(column)));
        }
        parts.join("&")
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Async handle to the hosted backend. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Current session, refreshed first if it is about to expire.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] if a needed token refresh fails for a
    /// reason other than the refresh token being rejected.
    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    /// Replace the stored session and announce `SignedIn`.
    ///
    /// # Errors
    ///
    /// Implementations may reject sessions they cannot store.
    async fn set_session(&self, session: Session) -> Result<(), BackendError>;

    /// Revoke and clear the stored session, announcing `SignedOut`.
    ///
    /// # Errors
    ///
    /// Implementations may report a failure to clear local state.
    async fn sign_out(&self) -> Result<(), BackendError>;

    /// Exchange a one-time OAuth/magic-link code for a session. `flow` is the
    /// id the callback URL carried back, naming the sign-in it completes.
    ///
    /// # Errors
    ///
    /// [`BackendError::Auth`] when the auth server rejects the code, other
    /// variants for transport or parse failures.
    async fn exchange_code_for_session(&self, code: &str, flow: Option<&str>) -> Result<Session, BackendError>;

    /// Build the URL that starts an OAuth sign-in with `provider`. The auth
    /// server returns to `redirect_to` with extra query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot prepare the PKCE state.
    async fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, BackendError>;

    /// Email a sign-in link that returns to `redirect_to` with a code.
    ///
    /// # Errors
    ///
    /// [`BackendError::Auth`] when the address is rejected.
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError>;

    /// Subscribe to session changes. Dropping the receiver unsubscribes.
    fn on_session_change(&self) -> broadcast::Receiver<SessionChange>;

    /// Run a row query and return the raw JSON rows.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] on transport, status, or parse failure.
    async fn select(&self, query: &RowQuery) -> Result<Vec<serde_json::Value>, BackendError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
