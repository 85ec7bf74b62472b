//! Supabase client: GoTrue auth plus PostgREST row reads.
//!
//! Thin HTTP wrapper over `/auth/v1` and `/rest/v1`. The client owns the
//! current session and the pending PKCE verifiers, and announces every
//! session change on a broadcast channel. Pure parsing in `parse_session` and
//! `parse_auth_error` for testability.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock, broadcast};
use tracing::{info, warn};

use super::config::BackendConfig;
use super::pkce;
use super::types::{AuthEvent, Backend, BackendError, OAuthProvider, RowQuery, Session, SessionChange, SessionUser};

/// Refresh the access token this many seconds before it expires.
const EXPIRY_MARGIN_SECS: i64 = 60;
const EVENT_CAPACITY: usize = 16;
/// Oldest pending sign-in is forgotten once this many are outstanding.
const MAX_PENDING_FLOWS: usize = 32;
/// Query parameter added to the callback URL to pick the matching verifier.
pub const FLOW_PARAM: &str = "flow";

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
    /// Verifiers for sign-ins that have not come back yet, oldest first.
    pending_flows: Mutex<VecDeque<PendingFlow>>,
    events: broadcast::Sender<SessionChange>,
}

impl SupabaseClient {
    /// Build a client from validated config.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            http,
            url: config.url,
            anon_key: config.anon_key,
            session: RwLock::new(None),
            pending_flows: Mutex::new(VecDeque::new()),
            events,
        })
    }

    /// Build from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if config is missing, a placeholder, or the HTTP
    /// client cannot be built.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(BackendConfig::from_env()?)
    }

    fn announce(&self, event: AuthEvent, session: Option<Session>) {
        // No receivers is fine; nobody is listening yet.
        let _ = self.events.send(SessionChange { event, session });
    }

    async fn clear_session(&self) {
        *self.session.write().await = None;
        self.announce(AuthEvent::SignedOut, None);
    }

    async fn token_request(&self, grant_type: &str, body: serde_json::Value) -> Result<Session, BackendError> {
        let response = self
            .http
            .post(format!("{}/auth/v1/token?grant_type={grant_type}", self.url))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if status != 200 {
            return Err(parse_auth_error(status, &text));
        }

        parse_session(&text, now_unix())
    }

    /// Trade the stored refresh token for a new session and announce
    /// `TokenRefreshed`. Returns `None` when there is nothing to refresh.
    ///
    /// # Errors
    ///
    /// [`BackendError::Auth`] when the refresh token is rejected; the stored
    /// session is left in place for the caller to decide.
    pub async fn refresh_session(&self) -> Result<Option<Session>, BackendError> {
        let refresh_token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .filter(|t| !t.is_empty());
        match refresh_token {
            Some(token) => self.refresh(&token).await.map(Some),
            None => Ok(None),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let session = self
            .token_request("refresh_token", serde_json::json!({ "refresh_token": refresh_token }))
            .await?;
        *self.session.write().await = Some(session.clone());
        self.announce(AuthEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    async fn bearer(&self) -> String {
        self.session
            .read()
            .await
            .as_ref()
            .map_or_else(|| self.anon_key.clone(), |s| s.access_token.clone())
    }

    /// Register a new verifier. Returns its challenge and `redirect_to`
    /// tagged with the flow id.
    async fn start_pkce(&self, redirect_to: &str) -> (String, String) {
        let pair = pkce::generate();
        let id = pkce::flow_id();
        let redirect = with_flow(redirect_to, &id);
        let mut pending = self.pending_flows.lock().await;
        if pending.len() >= MAX_PENDING_FLOWS {
            pending.pop_front();
        }
        pending.push_back(PendingFlow { id, verifier: pair.verifier });
        (pair.challenge, redirect)
    }

    /// Remove and return the verifier for `flow`, or the newest one when the
    /// callback carried no flow id.
    async fn take_verifier(&self, flow: Option<&str>) -> Option<String> {
        let mut pending = self.pending_flows.lock().await;
        let index = match flow {
            Some(flow) => pending.iter().position(|p| p.id == flow)?,
            None => pending.len().checked_sub(1)?,
        };
        pending.remove(index).map(|p| p.verifier)
    }
}

struct PendingFlow {
    id: String,
    verifier: String,
}

fn with_flow(redirect_to: &str, flow: &str) -> String {
    let separator = if redirect_to.contains('?') { '&' } else { '?' };
    format!("{redirect_to}{separator}{FLOW_PARAM}={flow}")
}

#[async_trait::async_trait]
impl Backend for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(current) = self.session.read().await.clone() else {
            return Ok(None);
        };
        if current.refresh_token.is_empty() || !current.expires_within(now_unix(), EXPIRY_MARGIN_SECS) {
            return Ok(Some(current));
        }

        match self.refresh_session().await {
            Ok(session) => Ok(session),
            Err(BackendError::Auth { message }) => {
                warn!(user_id = %current.user.id, %message, "supabase: refresh token rejected; signing out");
                self.clear_session().await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn set_session(&self, session: Session) -> Result<(), BackendError> {
        *self.session.write().await = Some(session.clone());
        self.announce(AuthEvent::SignedIn, Some(session));
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let access_token = self.session.read().await.as_ref().map(|s| s.access_token.clone());
        if let Some(token) = access_token {
            let result = self
                .http
                .post(format!("{}/auth/v1/logout", self.url))
                .header("apikey", &self.anon_key)
                .bearer_auth(token)
                .send()
                .await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = response.status().as_u16(), "supabase: remote logout rejected");
                }
                Err(e) => warn!(error = %e, "supabase: remote logout failed"),
                Ok(_) => {}
            }
        }
        self.clear_session().await;
        Ok(())
    }

    async fn exchange_code_for_session(&self, code: &str, flow: Option<&str>) -> Result<Session, BackendError> {
        let Some(verifier) = self.take_verifier(flow).await else {
            return Err(BackendError::Auth { message: "PKCE code verifier not found".into() });
        };
        let session = self
            .token_request("pkce", serde_json::json!({ "auth_code": code, "code_verifier": verifier }))
            .await?;
        info!(user_id = %session.user.id, "supabase: code exchanged for session");
        self.set_session(session.clone()).await?;
        Ok(session)
    }

    async fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, BackendError> {
        let (challenge, redirect) = self.start_pkce(redirect_to).await;
        Ok(format!(
            "{}/auth/v1/authorize?provider={}&redirect_to={}&code_challenge={challenge}&code_challenge_method=s256",
            self.url,
            provider.as_str(),
            urlencoding::encode(&redirect),
        ))
    }

    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        let (challenge, redirect) = self.start_pkce(redirect_to).await;
        let body = serde_json::json!({
            "email": email,
            "create_user": true,
            "code_challenge": challenge,
            "code_challenge_method": "s256",
        });
        let response = self
            .http
            .post(format!("{}/auth/v1/otp?redirect_to={}", self.url, urlencoding::encode(&redirect)))
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        if (200..300).contains(&status) {
            return Ok(());
        }
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;
        Err(parse_auth_error(status, &text))
    }

    fn on_session_change(&self) -> broadcast::Receiver<SessionChange> {
        self.events.subscribe()
    }

    async fn select(&self, query: &RowQuery) -> Result<Vec<serde_json::Value>, BackendError> {
        let bearer = self.bearer().await;
        let response = self
            .http
            .get(format!("{}/rest/v1/{}?{}", self.url, query.table_name(), query.to_query_string()))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if status != 200 {
            return Err(BackendError::Response { status, body: text });
        }

        serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
    }
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: SessionUser,
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse a token endpoint body. `expires_at` is derived from `expires_in`
/// when the server omits it.
fn parse_session(json: &str, now: i64) -> Result<Session, BackendError> {
    let token: TokenResponse = serde_json::from_str(json).map_err(|e| BackendError::Parse(e.to_string()))?;
    let expires_at = token.expires_at.or_else(|| token.expires_in.map(|secs| now + secs));
    Ok(Session {
        access_token: token.access_token,
        refresh_token: token.refresh_token,
        token_type: token.token_type.unwrap_or_else(|| "bearer".to_owned()),
        expires_in: token.expires_in,
        expires_at,
        user: token.user,
    })
}

/// Client errors carry a message the user can act on; server errors do not.
fn parse_auth_error(status: u16, body: &str) -> BackendError {
    if !(400..500).contains(&status) {
        return BackendError::Response { status, body: body.to_owned() };
    }
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| {
            [e.error_description, e.msg, e.message, e.error]
                .into_iter()
                .flatten()
                .find(|m| !m.trim().is_empty())
        })
        .unwrap_or_else(|| format!("Authentication request rejected (status {status})"));
    BackendError::Auth { message }
}

#[cfg(test)]
#[path = "supabase_test.rs"]
mod tests;
