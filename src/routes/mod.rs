//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Auth endpoints (callback, login descriptor, OAuth start, magic link) plus
//! the JSON dashboard API. Everything under `/api` except `/api/auth/*`
//! requires a signed-in user.

pub mod auth;
pub mod dashboard;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(dashboard::home))
        .route("/login", get(auth::login_page))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/login/{provider}", get(auth::oauth_start))
        .route("/api/auth/magic-link", post(auth::magic_link))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session))
        .route("/api/profile", get(auth::profile))
        .route("/api/horizontal", get(dashboard::list_horizontal))
        .route("/api/horizontal/refresh", post(dashboard::refresh_horizontal))
        .route("/api/vertical", get(dashboard::list_vertical))
        .route("/api/vertical/refresh", post(dashboard::refresh_vertical))
        .route("/api/selection/horizontal", put(dashboard::select_horizontal))
        .route("/api/selection/vertical", put(dashboard::select_vertical))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/api/detail", get(dashboard::detail))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
