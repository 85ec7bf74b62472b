//! Data provider: session state plus the two dashboard collections.
//!
//! DESIGN
//! ======
//! One shared [`ProviderState`] published through a `watch` channel. Every
//! write goes through `send_modify`/`send_if_modified`, so readers always
//! observe a consistent snapshot and are woken on change. The backend's
//! session-change stream is consumed by a listener task that holds only a
//! weak reference, so dropping the last [`DataProvider`] handle tears it
//! down.
//!
//! Without a backend the provider runs in demonstration mode: a synthetic
//! user, fixture rows, and fixed delays that mimic network latency.
//!
//! ERROR HANDLING
//! ==============
//! No operation returns an error. Backend failures are logged; failed
//! collection loads fall back to fixture rows.

use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::{Backend, RowQuery, Session, SessionChange, SessionUser, fetch_rows};
use crate::fixtures;
use crate::models::{HorizontalData, VerticalAnalysis};

pub const DEMO_INIT_DELAY: Duration = Duration::from_millis(1000);
pub const DEMO_REFRESH_DELAY: Duration = Duration::from_millis(800);

// =============================================================================
// STATE
// =============================================================================

/// Simulated latencies used in demonstration mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDelays {
    pub init: Duration,
    pub refresh: Duration,
}

impl DemoDelays {
    #[cfg(test)]
    pub const NONE: Self = Self { init: Duration::ZERO, refresh: Duration::ZERO };
}

impl Default for DemoDelays {
    fn default() -> Self {
        Self { init: DEMO_INIT_DELAY, refresh: DEMO_REFRESH_DELAY }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    Demo,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthState {
    /// Tokens never leave the process.
    #[serde(skip)]
    pub session: Option<Session>,
    pub user: Option<SessionUser>,
    pub loading: bool,
    pub mode: Mode,
}

/// One dashboard list. `items` is `None` until the first load completes.
#[derive(Debug, Clone, Serialize)]
pub struct Collection<T> {
    pub items: Option<Vec<T>>,
    pub loading: bool,
    /// Bumped by every refresh start and every clear; a completion carrying
    /// an older value is discarded.
    #[serde(skip)]
    generation: u64,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: None, loading: false, generation: 0 }
    }
}

impl<T> Collection<T> {
    fn clear(&mut self) {
        self.items = None;
        self.loading = false;
        self.generation += 1;
    }
}

#[derive(Debug, Clone)]
pub struct ProviderState {
    pub auth: AuthState,
    pub horizontal: Collection<HorizontalData>,
    pub vertical: Collection<VerticalAnalysis>,
    pub selected_horizontal: Option<HorizontalData>,
    pub selected_vertical: Option<VerticalAnalysis>,
    /// Analyses linked to `selected_horizontal`, filled in the background.
    pub related_analyses: Option<Vec<VerticalAnalysis>>,
}

impl ProviderState {
    fn initial(mode: Mode) -> Self {
        Self {
            auth: AuthState { session: None, user: None, loading: true, mode },
            horizontal: Collection::default(),
            vertical: Collection::default(),
            selected_horizontal: None,
            selected_vertical: None,
            related_analyses: None,
        }
    }

    fn clear_user_data(&mut self) {
        self.horizontal.clear();
        self.vertical.clear();
        self.selected_horizontal = None;
        self.selected_vertical = None;
        self.related_analyses = None;
    }
}

// =============================================================================
// LANES
// =============================================================================

/// Where one collection comes from and where it lands in the state.
struct Lane<T: 'static> {
    table: &'static str,
    slot: fn(&mut ProviderState) -> &mut Collection<T>,
    fixtures: fn() -> Vec<T>,
}

fn horizontal_slot(state: &mut ProviderState) -> &mut Collection<HorizontalData> {
    &mut state.horizontal
}

fn vertical_slot(state: &mut ProviderState) -> &mut Collection<VerticalAnalysis> {
    &mut state.vertical
}

static HORIZONTAL: Lane<HorizontalData> =
    Lane { table: "horizontal_data", slot: horizontal_slot, fixtures: fixtures::horizontal_data };

static VERTICAL: Lane<VerticalAnalysis> =
    Lane { table: "vertical_analysis", slot: vertical_slot, fixtures: fixtures::vertical_analysis };

// =============================================================================
// PROVIDER
// =============================================================================

/// Cloneable handle; all clones share one state.
#[derive(Clone)]
pub struct DataProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    backend: Option<Arc<dyn Backend>>,
    state: watch::Sender<ProviderState>,
    listener: Mutex<Option<JoinHandle<()>>>,
    delays: DemoDelays,
}

impl Drop for ProviderInner {
    fn drop(&mut self) {
        let listener = self.listener.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = listener.take() {
            handle.abort();
        }
    }
}

impl DataProvider {
    /// `None` selects demonstration mode.
    #[must_use]
    pub fn new(backend: Option<Arc<dyn Backend>>) -> Self {
        Self::with_delays(backend, DemoDelays::default())
    }

    #[must_use]
    pub fn with_delays(backend: Option<Arc<dyn Backend>>, delays: DemoDelays) -> Self {
        let mode = if backend.is_some() { Mode::Live } else { Mode::Demo };
        let (state, _) = watch::channel(ProviderState::initial(mode));
        Self { inner: Arc::new(ProviderInner { backend, state, listener: Mutex::new(None), delays }) }
    }

    /// Receiver woken on every state change. Dropping it unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProviderState> {
        self.inner.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ProviderState {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.inner.state.borrow().auth.user.clone()
    }

    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.inner.backend.is_none()
    }

    /// Resolve the initial session and start following session changes.
    pub async fn initialize(&self) {
        let Some(backend) = self.inner.backend.clone() else {
            tokio::time::sleep(self.inner.delays.init).await;
            info!(user_id = fixtures::DEMO_USER_ID, "provider: demonstration mode");
            self.apply_auth(None, Some(demo_user()));
            self.inner.state.send_modify(|s| {
                s.auth.mode = Mode::Demo;
                s.auth.loading = false;
            });
            return;
        };

        // Subscribe before reading so a change between the two is not lost.
        let events = backend.on_session_change();
        let session = match backend.get_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "provider: initial session lookup failed");
                None
            }
        };
        self.apply_session(session);

        let handle = tokio::spawn(listen(Arc::downgrade(&self.inner), backend, events));
        let previous = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }

        self.inner.state.send_modify(|s| s.auth.loading = false);
    }

    /// Stop following session changes.
    pub fn shutdown(&self) {
        let handle = self.inner.listener.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    pub async fn sign_out(&self) {
        match &self.inner.backend {
            None => {
                info!("provider: demonstration sign-out");
                self.apply_auth(None, None);
            }
            // The session listener clears local state on `SignedOut`.
            Some(backend) => {
                if let Err(e) = backend.sign_out().await {
                    error!(error = %e, "provider: sign-out failed");
                }
            }
        }
    }

    pub async fn refresh_horizontal_data(&self) {
        self.refresh(&HORIZONTAL).await;
    }

    pub async fn refresh_vertical_data(&self) {
        self.refresh(&VERTICAL).await;
    }

    pub fn set_selected_horizontal_item(&self, item: Option<HorizontalData>) {
        let lookup = item.as_ref().map(|h| h.id.clone());
        let changed = self.inner.state.send_if_modified(|s| {
            if s.selected_horizontal == item {
                return false;
            }
            s.selected_horizontal = item;
            s.related_analyses = None;
            true
        });
        if let (true, Some(horizontal_id)) = (changed, lookup) {
            let provider = self.clone();
            tokio::spawn(async move { provider.load_related(horizontal_id).await });
        }
    }

    pub fn set_selected_vertical_item(&self, item: Option<VerticalAnalysis>) {
        self.inner.state.send_if_modified(|s| {
            if s.selected_vertical == item {
                return false;
            }
            s.selected_vertical = item;
            true
        });
    }

    /// Select a loaded horizontal row by id. Returns `false` (selection
    /// untouched) when no loaded row has that id.
    pub fn select_horizontal_by_id(&self, id: &str) -> bool {
        let item = find_loaded(&self.inner.state.borrow().horizontal, |h: &HorizontalData| h.id == id);
        let found = item.is_some();
        if found {
            self.set_selected_horizontal_item(item);
        }
        found
    }

    pub fn select_vertical_by_id(&self, id: &str) -> bool {
        let item = find_loaded(&self.inner.state.borrow().vertical, |v: &VerticalAnalysis| v.id == id);
        let found = item.is_some();
        if found {
            self.set_selected_vertical_item(item);
        }
        found
    }

    // -------------------------------------------------------------------------
    // internals
    // -------------------------------------------------------------------------

    fn apply_session(&self, session: Option<Session>) {
        let user = session.as_ref().map(|s| s.user.clone());
        self.apply_auth(session, user);
    }

    /// Store the new identity. Signing in reloads both collections; signing
    /// out or switching user first clears everything tied to the old user.
    fn apply_auth(&self, session: Option<Session>, user: Option<SessionUser>) {
        let mut signed_in = false;
        self.inner.state.send_modify(|s| {
            let previous = s.auth.user.as_ref().map(|u| u.id.clone());
            let next = user.as_ref().map(|u| u.id.as_str());
            match (previous.as_deref(), next) {
                (Some(_), None) => s.clear_user_data(),
                (previous, Some(next)) if previous != Some(next) => {
                    if previous.is_some() {
                        s.clear_user_data();
                    }
                    signed_in = true;
                }
                _ => {}
            }
            s.auth.session = session;
            s.auth.user = user;
        });

        if signed_in {
            let provider = self.clone();
            tokio::spawn(async move {
                tokio::join!(provider.refresh_horizontal_data(), provider.refresh_vertical_data());
            });
        }
    }

    async fn refresh<T>(&self, lane: &'static Lane<T>)
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        let Some(user_id) = self.current_user().map(|u| u.id) else {
            debug!(table = lane.table, "provider: refresh skipped; no user");
            return;
        };

        let mut generation = 0;
        self.inner.state.send_modify(|s| {
            let collection = (lane.slot)(s);
            collection.generation += 1;
            collection.loading = true;
            generation = collection.generation;
        });

        let items = match &self.inner.backend {
            Some(backend) => {
                let query = RowQuery::table(lane.table)
                    .eq("user_id", &user_id)
                    .order_desc("created_at");
                match fetch_rows::<T>(backend.as_ref(), &query).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        error!(error = %e, table = lane.table, "provider: load failed; using fixture rows");
                        (lane.fixtures)()
                    }
                }
            }
            None => {
                tokio::time::sleep(self.inner.delays.refresh).await;
                (lane.fixtures)()
            }
        };

        self.inner.state.send_if_modified(|s| {
            let collection = (lane.slot)(s);
            if collection.generation != generation {
                debug!(table = lane.table, "provider: discarding stale load");
                return false;
            }
            collection.items = Some(items);
            collection.loading = false;
            true
        });
    }

    /// Best effort; a failed lookup leaves `related_analyses` unset.
    async fn load_related(&self, horizontal_id: String) {
        let Some(user_id) = self.current_user().map(|u| u.id) else {
            return;
        };
        let related = match &self.inner.backend {
            Some(backend) => {
                let query = RowQuery::table(VERTICAL.table)
                    .eq("horizontal_data_id", &horizontal_id)
                    .eq("user_id", &user_id)
                    .order_desc("created_at");
                match fetch_rows::<VerticalAnalysis>(backend.as_ref(), &query).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        warn!(error = %e, %horizontal_id, "provider: related analyses lookup failed");
                        return;
                    }
                }
            }
            None => fixtures::related_analyses(&horizontal_id),
        };

        self.inner.state.send_if_modified(|s| {
            if s.selected_horizontal.as_ref().map(|h| h.id.as_str()) != Some(horizontal_id.as_str()) {
                return false;
            }
            s.related_analyses = Some(related);
            true
        });
    }
}

fn find_loaded<T: Clone>(collection: &Collection<T>, pred: impl Fn(&T) -> bool) -> Option<T> {
    collection.items.as_ref()?.iter().find(|item| pred(item)).cloned()
}

fn demo_user() -> SessionUser {
    SessionUser {
        id: fixtures::DEMO_USER_ID.to_owned(),
        email: Some(fixtures::DEMO_USER_EMAIL.to_owned()),
        user_metadata: serde_json::json!({ "full_name": fixtures::DEMO_USER_NAME }),
    }
}

/// Apply every session change until the provider is gone or the backend
/// closes the stream.
async fn listen(
    inner: Weak<ProviderInner>,
    backend: Arc<dyn Backend>,
    mut events: broadcast::Receiver<SessionChange>,
) {
    loop {
        let session = match events.recv().await {
            Ok(change) => {
                debug!(event = ?change.event, "provider: session change");
                change.session
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "provider: session events lagged; re-reading session");
                match backend.get_session().await {
                    Ok(session) => session,
                    Err(e) => {
                        warn!(error = %e, "provider: session re-read failed");
                        continue;
                    }
                }
            }
            Err(RecvError::Closed) => break,
        };
        let Some(inner) = inner.upgrade() else {
            break;
        };
        DataProvider { inner }.apply_session(session);
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
