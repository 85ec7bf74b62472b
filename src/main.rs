mod backend;
mod config;
mod fixtures;
mod models;
mod routes;
mod services;
mod state;
mod views;

use std::sync::Arc;

use backend::Backend;

#[tokio::main]
async fn main() {
    // A missing .env file is normal in deployed environments.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();

    // Backend client (non-fatal: demonstration mode if config missing).
    let backend: Option<Arc<dyn Backend>> = match backend::SupabaseClient::from_env() {
        Ok(client) => {
            tracing::info!("supabase client initialized");
            Some(Arc::new(client))
        }
        Err(e) => {
            tracing::warn!(error = %e, "supabase not configured; running in demonstration mode");
            None
        }
    };

    let state = state::AppState::new(backend.clone(), config.clone());

    {
        let provider = state.provider.clone();
        tokio::spawn(async move { provider.initialize().await });
    }
    let _token_refresh = backend
        .map(|backend| services::session::spawn_token_refresh_task(backend, config.token_refresh_interval));

    let app = routes::app(state.clone());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, app_url = %config.app_url, "lumi listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    state.provider.shutdown();
    tracing::info!("lumi stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
