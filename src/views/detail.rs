//! Detail panel for the selected horizontal or vertical item.
//!
//! Every stat reads its value defensively out of the JSON blobs; anything
//! missing renders as `"N/A"`.

use serde::Serialize;
use serde_json::Value;

use super::{Pane, display_date};
use crate::models::{AnalysisStatus, EnrichmentStatus, EntityType, HorizontalData, VerticalAnalysis, blob_text};
use crate::services::provider::ProviderState;

const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Amber,
    Blue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedItem {
    pub id: String,
    pub analysis_type: String,
    pub status: AnalysisStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentItem {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HorizontalDetail {
    pub id: String,
    pub heading: &'static str,
    pub name: String,
    pub description: Option<String>,
    pub entity_type: EntityType,
    pub status: EnrichmentStatus,
    pub badge: BadgeColor,
    pub image_url: Option<String>,
    /// Shown in place of the image when there is none.
    pub initials: String,
    pub website: Option<String>,
    pub stats: Vec<Stat>,
    pub source: Option<String>,
    pub updated: String,
    pub related: Vec<RelatedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerticalDetail {
    pub id: String,
    pub analysis_type: String,
    pub status: AnalysisStatus,
    pub badge: BadgeColor,
    pub executive_summary: Option<String>,
    pub stats: Vec<Stat>,
    pub agents: Vec<String>,
    pub depth: Option<String>,
    pub focus_areas: Vec<String>,
    pub created: String,
    pub updated: String,
    /// The analysed record, when it is among the loaded rows.
    pub parent: Option<ParentItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetailView {
    Empty { title: &'static str, hint: &'static str },
    Horizontal(HorizontalDetail),
    Vertical(VerticalDetail),
}

impl DetailView {
    #[must_use]
    pub fn empty() -> Self {
        Self::Empty {
            title: "No item selected",
            hint: "Select an item from the Horizontal or Vertical AI panel to view detailed information.",
        }
    }

    #[must_use]
    pub fn for_pane(state: &ProviderState, pane: Pane) -> Self {
        match pane {
            Pane::Horizontal => state
                .selected_horizontal
                .as_ref()
                .map_or_else(Self::empty, |row| Self::Horizontal(horizontal_detail(row, state))),
            Pane::Vertical => state
                .selected_vertical
                .as_ref()
                .map_or_else(Self::empty, |row| Self::Vertical(vertical_detail(row, state))),
        }
    }
}

// =============================================================================
// HORIZONTAL
// =============================================================================

fn horizontal_detail(row: &HorizontalData, state: &ProviderState) -> HorizontalDetail {
    let enriched = Some(&row.enriched_data);
    let metadata = row.metadata.as_ref();
    let is_company = row.entity_type == EntityType::Company;

    let stats = if is_company {
        vec![
            stat("Founded", blob_text(enriched, &["company_details", "founded"])),
            stat("Employees", blob_text(metadata, &["size"])),
            stat("Growth", blob_text(enriched, &["company_details", "growth_rate"])),
            stat("Industry", blob_text(metadata, &["industry"])),
        ]
    } else {
        vec![
            stat("Role", blob_text(enriched, &["professional_details", "current_role"])),
            stat("Company", blob_text(enriched, &["professional_details", "company"])),
            stat("Location", blob_text(metadata, &["location"])),
            stat("Influence", blob_text(enriched, &["influence_score"])),
        ]
    };

    // Prefer the targeted lookup; fall back to whatever is loaded.
    let related = match &state.related_analyses {
        Some(related) => related.iter().map(related_item).collect(),
        None => state
            .vertical
            .items
            .iter()
            .flatten()
            .filter(|v| v.horizontal_data_id == row.id)
            .map(related_item)
            .collect(),
    };

    HorizontalDetail {
        id: row.id.clone(),
        heading: if is_company { "Company Details" } else { "Contact Profile" },
        name: row.name.clone(),
        description: row.description.clone(),
        entity_type: row.entity_type,
        status: row.status,
        badge: match row.status {
            EnrichmentStatus::Enriched => BadgeColor::Green,
            EnrichmentStatus::Pending => BadgeColor::Amber,
            EnrichmentStatus::Failed | EnrichmentStatus::Unknown => BadgeColor::Blue,
        },
        image_url: blob_text(metadata, &["logo_url"]).or_else(|| blob_text(metadata, &["avatar_url"])),
        initials: row.name.chars().take(2).collect(),
        website: blob_text(metadata, &["website"]).map(|url| strip_scheme(&url).to_owned()),
        stats,
        source: row.source.clone(),
        updated: display_date(row.updated_at),
        related,
    }
}

fn related_item(row: &VerticalAnalysis) -> RelatedItem {
    RelatedItem { id: row.id.clone(), analysis_type: row.analysis_type.clone(), status: row.status }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

// =============================================================================
// VERTICAL
// =============================================================================

fn vertical_detail(row: &VerticalAnalysis, state: &ProviderState) -> VerticalDetail {
    let metadata = row.metadata.as_ref();
    let config = row.agent_config.as_ref();

    let parent = state
        .horizontal
        .items
        .iter()
        .flatten()
        .find(|h| h.id == row.horizontal_data_id)
        .map(|h| ParentItem { id: h.id.clone(), name: h.name.clone() });

    VerticalDetail {
        id: row.id.clone(),
        analysis_type: row.analysis_type.clone(),
        status: row.status,
        badge: match row.status {
            AnalysisStatus::Completed => BadgeColor::Green,
            AnalysisStatus::Pending => BadgeColor::Amber,
            AnalysisStatus::Failed | AnalysisStatus::Unknown => BadgeColor::Blue,
        },
        executive_summary: blob_text(Some(&row.analysis_results), &["executive_summary"]),
        stats: vec![
            stat("Analysis Time", blob_text(metadata, &["duration"])),
            stat("Confidence", confidence(metadata)),
        ],
        agents: string_list(config, "agents"),
        depth: blob_text(config, &["depth"]),
        focus_areas: string_list(config, "focus_areas"),
        created: display_date(row.created_at),
        updated: display_date(row.updated_at),
        parent,
    }
}

/// `0.89` renders as `"89%"`. Zero counts as unknown.
fn confidence(metadata: Option<&Value>) -> Option<String> {
    let score = metadata?.get("confidence_score")?.as_f64()?;
    if score.abs() < f64::EPSILON {
        return None;
    }
    Some(format!("{:.0}%", score * 100.0))
}

fn string_list(blob: Option<&Value>, key: &str) -> Vec<String> {
    blob.and_then(|b| b.get(key))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_owned).collect())
        .unwrap_or_default()
}

fn stat(label: &'static str, value: Option<String>) -> Stat {
    Stat { label, value: value.unwrap_or_else(|| MISSING.to_owned()) }
}

#[cfg(test)]
#[path = "detail_test.rs"]
mod tests;
