//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! The data provider owns session and collection state; route handlers only
//! translate HTTP into provider calls and provider snapshots into views.

pub mod provider;
pub mod session;
