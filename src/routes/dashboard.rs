//! Dashboard routes: collections, selection, and rendered views.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use serde::Deserialize;

use super::auth::SignedIn;
use crate::models::{HorizontalData, VerticalAnalysis};
use crate::services::provider::Collection;
use crate::state::AppState;
use crate::views::{DashboardView, DetailView, Pane};

/// `GET /`: the dashboard for a signed-in user, otherwise off to `/login`.
pub async fn home(State(state): State<AppState>) -> Response {
    let snapshot = state.provider.snapshot();
    if snapshot.auth.loading {
        return (StatusCode::SERVICE_UNAVAILABLE, "Loading").into_response();
    }
    if snapshot.auth.user.is_none() {
        return Redirect::temporary("/login").into_response();
    }
    Json(DashboardView::from_state(&snapshot, state.provider.is_demo())).into_response()
}

/// `GET /api/dashboard`
pub async fn dashboard(_user: SignedIn, State(state): State<AppState>) -> Json<DashboardView> {
    Json(DashboardView::from_state(&state.provider.snapshot(), state.provider.is_demo()))
}

#[derive(Debug, Deserialize)]
pub struct DetailQuery {
    pub pane: Pane,
}

/// `GET /api/detail?pane=horizontal|vertical`
pub async fn detail(_user: SignedIn, State(state): State<AppState>, Query(q): Query<DetailQuery>) -> Json<DetailView> {
    Json(DetailView::for_pane(&state.provider.snapshot(), q.pane))
}

pub async fn list_horizontal(_user: SignedIn, State(state): State<AppState>) -> Json<Collection<HorizontalData>> {
    Json(state.provider.snapshot().horizontal)
}

pub async fn list_vertical(_user: SignedIn, State(state): State<AppState>) -> Json<Collection<VerticalAnalysis>> {
    Json(state.provider.snapshot().vertical)
}

/// `POST /api/horizontal/refresh`: reload and return the fresh collection.
pub async fn refresh_horizontal(_user: SignedIn, State(state): State<AppState>) -> Json<Collection<HorizontalData>> {
    state.provider.refresh_horizontal_data().await;
    Json(state.provider.snapshot().horizontal)
}

pub async fn refresh_vertical(_user: SignedIn, State(state): State<AppState>) -> Json<Collection<VerticalAnalysis>> {
    state.provider.refresh_vertical_data().await;
    Json(state.provider.snapshot().vertical)
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub id: Option<String>,
}

/// `PUT /api/selection/horizontal`: `{"id": null}` clears the selection.
pub async fn select_horizontal(
    _user: SignedIn,
    State(state): State<AppState>,
    Json(body): Json<SelectionRequest>,
) -> Result<Json<DetailView>, StatusCode> {
    match body.id {
        Some(id) if !state.provider.select_horizontal_by_id(&id) => return Err(StatusCode::NOT_FOUND),
        Some(_) => {}
        None => state.provider.set_selected_horizontal_item(None),
    }
    Ok(Json(DetailView::for_pane(&state.provider.snapshot(), Pane::Horizontal)))
}

/// `PUT /api/selection/vertical`
pub async fn select_vertical(
    _user: SignedIn,
    State(state): State<AppState>,
    Json(body): Json<SelectionRequest>,
) -> Result<Json<DetailView>, StatusCode> {
    match body.id {
        Some(id) if !state.provider.select_vertical_by_id(&id) => return Err(StatusCode::NOT_FOUND),
        Some(_) => {}
        None => state.provider.set_selected_vertical_item(None),
    }
    Ok(Json(DetailView::for_pane(&state.provider.snapshot(), Pane::Vertical)))
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
