//! Auth routes: code-exchange callback, login descriptor, OAuth start,
//! magic links, sign-out.

use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::backend::{Backend, BackendError, OAuthProvider, RowQuery, SessionUser, fetch_rows};
use crate::fixtures;
use crate::models::UserProfile;
use crate::services::provider::AuthState;
use crate::state::AppState;

const NO_CODE_TARGET: &str = "/login?error=No+authentication+code+provided";
const UNEXPECTED_TARGET: &str = "/login?error=An%20unexpected%20error%20occurred";
const DEFAULT_AUTH_ERROR: &str = "Authentication failed";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// The provider's current user. Use as a handler parameter to require
/// sign-in; rejects with 401 otherwise.
pub struct SignedIn {
    pub user: SessionUser,
}

impl<S> axum::extract::FromRequestParts<S> for SignedIn
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(_parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let user = app_state.provider.current_user().ok_or(StatusCode::UNAUTHORIZED)?;
        Ok(Self { user })
    }
}

// =============================================================================
// CALLBACK
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
    /// Sign-in id the backend added to the callback URL.
    pub flow: Option<String>,
}

/// `GET /auth/callback`: exchange the one-time code and redirect.
pub async fn callback(State(state): State<AppState>, Query(params): Query<CallbackQuery>) -> Redirect {
    Redirect::temporary(&callback_target(state.backend.as_deref(), &params).await)
}

/// Where the callback sends the browser. Never fails: every problem becomes
/// a `/login?error=...` target.
pub(crate) async fn callback_target(backend: Option<&dyn Backend>, params: &CallbackQuery) -> String {
    if non_empty(params.error.as_deref()).is_some() {
        let description = non_empty(params.error_description.as_deref()).unwrap_or(DEFAULT_AUTH_ERROR);
        warn!(error = ?params.error, %description, "auth callback: provider reported an error");
        return login_with_error(description);
    }

    let Some(code) = non_empty(params.code.as_deref()) else {
        return NO_CODE_TARGET.to_owned();
    };

    let Some(backend) = backend else {
        error!("auth callback: backend not configured");
        return UNEXPECTED_TARGET.to_owned();
    };

    match backend.exchange_code_for_session(code, non_empty(params.flow.as_deref())).await {
        Ok(session) => {
            info!(user_id = %session.user.id, "auth callback: signed in");
            "/".to_owned()
        }
        Err(BackendError::Auth { message }) => {
            warn!(%message, "auth callback: code exchange rejected");
            login_with_error(&message)
        }
        Err(e) => match e.response_message() {
            Some(message) => {
                error!(error = %e, %message, "auth callback: auth server failed the exchange");
                login_with_error(&message)
            }
            None => {
                error!(error = %e, "auth callback: code exchange failed");
                UNEXPECTED_TARGET.to_owned()
            }
        },
    }
}

/// `/login?error=` with `message` percent-encoded.
pub(crate) fn login_with_error(message: &str) -> String {
    format!("/login?error={}", urlencoding::encode(message))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProviderLink {
    pub name: &'static str,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub error: Option<String>,
    pub providers: Vec<ProviderLink>,
    pub magic_link: &'static str,
    pub demo: bool,
}

/// `GET /login`: sign-in options, or straight back to `/` when already
/// signed in.
pub async fn login_page(State(state): State<AppState>, Query(params): Query<LoginQuery>) -> Response {
    if state.provider.current_user().is_some() {
        return Redirect::temporary("/").into_response();
    }
    let providers = OAuthProvider::ALL
        .iter()
        .map(|p| ProviderLink { name: p.as_str(), href: format!("/auth/login/{}", p.as_str()) })
        .collect();
    Json(LoginPage {
        error: params.error,
        providers,
        magic_link: "/api/auth/magic-link",
        demo: state.backend.is_none(),
    })
    .into_response()
}

/// `GET /auth/login/{provider}`: redirect to the provider's consent page.
pub async fn oauth_start(State(state): State<AppState>, Path(provider): Path<String>) -> Response {
    let Ok(provider) = provider.parse::<OAuthProvider>() else {
        return (StatusCode::NOT_FOUND, "unknown sign-in provider").into_response();
    };
    let Some(backend) = &state.backend else {
        return (StatusCode::SERVICE_UNAVAILABLE, BackendError::NotConfigured.to_string()).into_response();
    };
    match backend.authorize_url(provider, &state.config.callback_url()).await {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(e) => {
            error!(error = %e, provider = provider.as_str(), "oauth start failed");
            (StatusCode::BAD_GATEWAY, "sign-in unavailable").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

/// `POST /api/auth/magic-link`: email a sign-in link.
pub async fn magic_link(State(state): State<AppState>, Json(body): Json<MagicLinkRequest>) -> Response {
    let email = body.email.trim();
    if email.is_empty() {
        return (StatusCode::BAD_REQUEST, "email required").into_response();
    }
    let Some(backend) = &state.backend else {
        return (StatusCode::SERVICE_UNAVAILABLE, BackendError::NotConfigured.to_string()).into_response();
    };
    match backend.send_magic_link(email, &state.config.callback_url()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(BackendError::Auth { message }) => {
            (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": message }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "magic link request failed");
            (StatusCode::BAD_GATEWAY, "failed to send sign-in link").into_response()
        }
    }
}

/// `POST /api/auth/logout`
pub async fn logout(State(state): State<AppState>) -> StatusCode {
    state.provider.sign_out().await;
    StatusCode::NO_CONTENT
}

/// `GET /api/auth/session`: current auth state without tokens.
pub async fn session(State(state): State<AppState>) -> Json<AuthState> {
    Json(state.provider.snapshot().auth)
}

/// `GET /api/profile`: the signed-in user's `users` row.
pub async fn profile(
    SignedIn { user }: SignedIn,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, StatusCode> {
    let Some(backend) = &state.backend else {
        return Ok(Json(fixtures::demo_profile()));
    };
    let query = RowQuery::table("users").eq("id", &user.id);
    match fetch_rows::<UserProfile>(backend.as_ref(), &query).await {
        Ok(rows) => rows.into_iter().next().map(Json).ok_or(StatusCode::NOT_FOUND),
        Err(e) => {
            error!(error = %e, user_id = %user.id, "profile lookup failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
