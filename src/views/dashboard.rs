//! Two-pane dashboard: enrichment records left, analyses right.

use serde::Serialize;

use super::display_date;
use crate::models::{EntityType, HorizontalData, VerticalAnalysis};
use crate::services::provider::{Collection, ProviderState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemIcon {
    Company,
    Contact,
    Analysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub icon: ItemIcon,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaneView {
    pub title: &'static str,
    pub items: Vec<PaneItem>,
    pub loading: bool,
    /// Load finished with nothing to show.
    pub empty: bool,
    pub empty_message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub email: Option<String>,
    pub demo: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub header: Header,
    pub horizontal: PaneView,
    pub vertical: PaneView,
}

impl DashboardView {
    #[must_use]
    pub fn from_state(state: &ProviderState, demo: bool) -> Self {
        let selected_h = state.selected_horizontal.as_ref().map(|h| h.id.as_str());
        let selected_v = state.selected_vertical.as_ref().map(|v| v.id.as_str());
        Self {
            header: Header { email: state.auth.user.as_ref().and_then(|u| u.email.clone()), demo },
            horizontal: pane(
                "Horizontal AI",
                "No data available",
                &state.horizontal,
                |h| horizontal_item(h, selected_h),
            ),
            vertical: pane(
                "Vertical AI",
                "No analyses available",
                &state.vertical,
                |v| vertical_item(v, selected_v),
            ),
        }
    }
}

fn pane<T>(
    title: &'static str,
    empty_message: &'static str,
    collection: &Collection<T>,
    render: impl Fn(&T) -> PaneItem,
) -> PaneView {
    let items: Vec<PaneItem> = collection.items.iter().flatten().map(render).collect();
    PaneView { title, empty: !collection.loading && items.is_empty(), items, loading: collection.loading, empty_message }
}

fn horizontal_item(row: &HorizontalData, selected: Option<&str>) -> PaneItem {
    PaneItem {
        id: row.id.clone(),
        title: row.name.clone(),
        subtitle: row
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "No description".to_owned()),
        icon: match row.entity_type {
            EntityType::Company => ItemIcon::Company,
            EntityType::Contact | EntityType::Other | EntityType::Unknown => ItemIcon::Contact,
        },
        selected: selected == Some(row.id.as_str()),
    }
}

fn vertical_item(row: &VerticalAnalysis, selected: Option<&str>) -> PaneItem {
    PaneItem {
        id: row.id.clone(),
        title: row.analysis_type.clone(),
        subtitle: display_date(row.created_at),
        icon: ItemIcon::Analysis,
        selected: selected == Some(row.id.as_str()),
    }
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
