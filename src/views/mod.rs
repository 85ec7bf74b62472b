//! Render-ready view models built from provider snapshots.
//!
//! Views are pure functions of [`ProviderState`](crate::services::provider::ProviderState):
//! no I/O, no locking, every missing field resolved to a display fallback.

pub mod dashboard;
pub mod detail;

pub use dashboard::DashboardView;
pub use detail::DetailView;

use serde::Deserialize;
use time::OffsetDateTime;

/// Which dashboard pane a request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pane {
    Horizontal,
    Vertical,
}

/// `YYYY-MM-DD`.
pub(crate) fn display_date(at: OffsetDateTime) -> String {
    at.date().to_string()
}
