//! Row types for the backend tables the dashboard reads.
//!
//! DESIGN
//! ======
//! Rows mirror the `users`, `horizontal_data` and `vertical_analysis` tables.
//! The JSON blobs (`enriched_data`, `analysis_results`, `agent_config`,
//! `metadata`) stay untyped: their shape depends on `entity_type` and on the
//! producing agent, and the views read them defensively through
//! [`blob_text`] with per-field fallbacks.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// USER
// =============================================================================

/// Profile row from the `users` table. Created at sign-up by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_login: Option<OffsetDateTime>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

// =============================================================================
// HORIZONTAL DATA
// =============================================================================

/// Kind of entity an enrichment record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Company,
    Contact,
    Other,
    /// Any value this build does not know; rendered like a contact.
    #[serde(other)]
    Unknown,
}

/// Enrichment lifecycle, advanced server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    #[default]
    Pending,
    Enriched,
    Failed,
    #[serde(other)]
    Unknown,
}

/// One enrichment record about a company or contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalData {
    pub id: String,
    pub user_id: String,
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "empty_object")]
    pub enriched_data: serde_json::Value,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: EnrichmentStatus,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// VERTICAL ANALYSIS
// =============================================================================

/// Analysis lifecycle, advanced by the external agent pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Deeper analysis output tied to one [`HorizontalData`] row.
///
/// `horizontal_data_id` is expected to reference a row owned by the same
/// user; the backend enforces it and the client does not re-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalAnalysis {
    pub id: String,
    pub user_id: String,
    pub horizontal_data_id: String,
    pub analysis_type: String,
    #[serde(default = "empty_object")]
    pub analysis_results: serde_json::Value,
    #[serde(default)]
    pub agent_config: Option<serde_json::Value>,
    #[serde(default)]
    pub status: AnalysisStatus,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

// =============================================================================
// BLOB ACCESS
// =============================================================================

/// Walk `path` through nested objects and render the leaf as display text.
///
/// Strings are returned as-is, numbers and booleans via `to_string`. Missing
/// keys, nulls, empty strings, arrays and objects yield `None` so callers can
/// substitute their own fallback.
#[must_use]
pub fn blob_text(blob: Option<&serde_json::Value>, path: &[&str]) -> Option<String> {
    let mut cur = blob?;
    for key in path {
        cur = cur.get(*key)?;
    }
    match cur {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "models_test.rs"]
mod tests;
