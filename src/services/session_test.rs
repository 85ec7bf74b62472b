use std::sync::atomic::Ordering;

use super::*;
use crate::backend::test_helpers::{MockBackend, session_for};

#[tokio::test(start_paused = true)]
async fn ticker_checks_session_every_interval() {
    let backend = Arc::new(MockBackend::new().with_session(session_for("u1")));
    let handle = spawn_token_refresh_task(backend.clone(), Duration::from_secs(60));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(backend.session_calls.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(backend.session_calls.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(backend.session_calls.load(Ordering::SeqCst), 3);

    handle.abort();
}

#[tokio::test(start_paused = true)]
async fn aborted_ticker_stops_checking() {
    let backend = Arc::new(MockBackend::new());
    let handle = spawn_token_refresh_task(backend.clone(), Duration::from_secs(10));
    handle.abort();
    tokio::time::sleep(Duration::from_secs(100)).await;
    assert_eq!(backend.session_calls.load(Ordering::SeqCst), 0);
}
