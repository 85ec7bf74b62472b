//! Backend: hosted auth and row storage behind the [`Backend`] trait.
//!
//! DESIGN
//! ======
//! The production implementation is [`supabase::SupabaseClient`], configured
//! from environment variables. When configuration is missing or still holds
//! template placeholders, no client is built and the service runs in
//! demonstration mode on fixture data.

pub mod config;
pub mod pkce;
pub mod supabase;
pub mod types;

use serde::de::DeserializeOwned;

pub use supabase::SupabaseClient;
pub use types::{Backend, BackendError, OAuthProvider, RowQuery, Session, SessionChange, SessionUser};

/// Run `query` and deserialize every row into `T`.
///
/// # Errors
///
/// Propagates the backend error, or [`BackendError::Parse`] if any row does
/// not match `T`.
pub async fn fetch_rows<T: DeserializeOwned>(backend: &dyn Backend, query: &RowQuery) -> Result<Vec<T>, BackendError> {
    backend
        .select(query)
        .await?
        .into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| BackendError::Parse(e.to_string())))
        .collect()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
