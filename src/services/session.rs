//! Background session upkeep.
//!
//! The backend client refreshes an expiring access token lazily inside
//! `get_session`. This ticker calls it on a fixed interval so a signed-in
//! session stays valid while nobody is reading it.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::backend::Backend;

/// Spawn the token refresh ticker. Returns a handle for shutdown.
pub fn spawn_token_refresh_task(backend: Arc<dyn Backend>, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "session token refresh configured");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; startup already read the session.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match backend.get_session().await {
                Ok(Some(session)) => debug!(user_id = %session.user.id, "session checked"),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "session refresh failed"),
            }
        }
    })
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
