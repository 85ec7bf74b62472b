use std::sync::Arc;

use axum::http::header;

use super::*;
use crate::backend::test_helpers::{MockBackend, horizontal_row, session_for};
use crate::fixtures;
use crate::state::test_helpers::{demo_app_state, mock_app_state};

async fn signed_in(state: &AppState) -> SignedIn {
    SignedIn { user: state.provider.current_user().unwrap() }
}

#[tokio::test]
async fn home_redirects_signed_out_user_to_login() {
    let state = mock_app_state(Arc::new(MockBackend::new()), false).await;
    let response = home(State(state)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn home_renders_dashboard_for_signed_in_user() {
    let state = demo_app_state().await;
    let response = home(State(state)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_is_unavailable_while_loading() {
    let state = AppState::new(None, crate::config::AppConfig::default());
    let response = home(State(state)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn lists_return_loaded_collections() {
    let state = demo_app_state().await;
    let Json(horizontal) = list_horizontal(signed_in(&state).await, State(state.clone())).await;
    assert_eq!(horizontal.items.unwrap(), fixtures::horizontal_data());
    assert!(!horizontal.loading);
    let Json(vertical) = list_vertical(signed_in(&state).await, State(state)).await;
    assert_eq!(vertical.items.unwrap().len(), 4);
}

#[tokio::test]
async fn refresh_returns_fresh_rows() {
    let backend = Arc::new(MockBackend::new().with_session(session_for("u1")));
    backend.set_rows("horizontal_data", vec![horizontal_row("h1", "u1", "2024-01-01T00:00:00Z")]);
    let state = mock_app_state(backend.clone(), true).await;

    backend.set_rows(
        "horizontal_data",
        vec![
            horizontal_row("h1", "u1", "2024-01-01T00:00:00Z"),
            horizontal_row("h2", "u1", "2024-02-01T00:00:00Z"),
        ],
    );
    let Json(collection) = refresh_horizontal(signed_in(&state).await, State(state)).await;
    let ids: Vec<_> = collection.items.unwrap().into_iter().map(|h| h.id).collect();
    assert_eq!(ids, ["h2", "h1"]);
    assert!(!collection.loading);
}

#[tokio::test]
async fn selection_returns_detail_and_clears_with_null() {
    let state = demo_app_state().await;
    let result = select_horizontal(
        signed_in(&state).await,
        State(state.clone()),
        Json(SelectionRequest { id: Some("horiz_comp_2".into()) }),
    )
    .await;
    let Ok(Json(DetailView::Horizontal(detail))) = result else {
        panic!("expected horizontal detail");
    };
    assert_eq!(detail.name, "GreenEarth Renewables");

    let Json(dashboard) = dashboard(signed_in(&state).await, State(state.clone())).await;
    assert!(dashboard.horizontal.items.iter().any(|i| i.id == "horiz_comp_2" && i.selected));

    let result = select_horizontal(signed_in(&state).await, State(state.clone()), Json(SelectionRequest { id: None })).await;
    assert!(matches!(result, Ok(Json(DetailView::Empty { .. }))));
}

#[tokio::test]
async fn unknown_selection_is_404() {
    let state = demo_app_state().await;
    let result = select_vertical(
        signed_in(&state).await,
        State(state.clone()),
        Json(SelectionRequest { id: Some("missing".into()) }),
    )
    .await;
    assert_eq!(result.err(), Some(StatusCode::NOT_FOUND));
    assert!(state.provider.snapshot().selected_vertical.is_none());
}

#[tokio::test]
async fn detail_follows_requested_pane() {
    let state = demo_app_state().await;
    assert!(state.provider.select_vertical_by_id("vert_analysis_4"));

    let Json(view) = detail(signed_in(&state).await, State(state.clone()), Query(DetailQuery { pane: Pane::Vertical })).await;
    let DetailView::Vertical(vertical) = view else {
        panic!("expected vertical detail");
    };
    assert_eq!(vertical.parent.unwrap().id, "horiz_comp_3");

    let Json(view) = detail(signed_in(&state).await, State(state), Query(DetailQuery { pane: Pane::Horizontal })).await;
    assert_eq!(view, DetailView::empty());
}
