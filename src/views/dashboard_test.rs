use super::*;
use crate::fixtures;
use crate::services::provider::test_helpers::loaded_state;

#[test]
fn dashboard_lists_both_panes_in_order() {
    let view = DashboardView::from_state(&loaded_state(), true);
    assert_eq!(view.header.email.as_deref(), Some(fixtures::DEMO_USER_EMAIL));
    assert!(view.header.demo);

    let h_ids: Vec<_> = view.horizontal.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(h_ids, ["horiz_comp_1", "horiz_comp_2", "horiz_contact_1", "horiz_contact_2", "horiz_comp_3"]);
    assert_eq!(view.vertical.items.len(), 4);
    assert!(!view.horizontal.empty);
    assert!(!view.horizontal.loading);
}

#[test]
fn horizontal_items_carry_icon_and_description() {
    let view = DashboardView::from_state(&loaded_state(), true);
    let company = &view.horizontal.items[0];
    assert_eq!(company.title, "TechNova Solutions");
    assert_eq!(company.icon, ItemIcon::Company);
    let contact = view.horizontal.items.iter().find(|i| i.id == "horiz_contact_1").unwrap();
    assert_eq!(contact.icon, ItemIcon::Contact);
}

#[test]
fn unrecognised_entity_type_uses_contact_icon() {
    let mut state = loaded_state();
    if let Some(items) = state.horizontal.items.as_mut() {
        items[0].entity_type = EntityType::Unknown;
    }
    let view = DashboardView::from_state(&state, true);
    assert_eq!(view.horizontal.items[0].icon, ItemIcon::Contact);
}

#[test]
fn missing_description_falls_back() {
    let mut state = loaded_state();
    state.horizontal.items.as_mut().unwrap()[0].description = None;
    let view = DashboardView::from_state(&state, false);
    assert_eq!(view.horizontal.items[0].subtitle, "No description");
}

#[test]
fn vertical_items_show_created_date() {
    let state = loaded_state();
    let first = &state.vertical.items.as_ref().unwrap()[0];
    let expected = first.created_at.date().to_string();
    let view = DashboardView::from_state(&state, true);
    assert_eq!(view.vertical.items[0].title, first.analysis_type);
    assert_eq!(view.vertical.items[0].subtitle, expected);
    assert_eq!(view.vertical.items[0].subtitle.len(), 10);
    assert_eq!(view.vertical.items[0].icon, ItemIcon::Analysis);
}

#[test]
fn selected_flags_follow_selection() {
    let mut state = loaded_state();
    state.selected_horizontal = fixtures::horizontal_by_id("horiz_comp_2");
    state.selected_vertical = fixtures::vertical_by_id("vert_analysis_3");
    let view = DashboardView::from_state(&state, true);

    let selected: Vec<_> = view.horizontal.items.iter().filter(|i| i.selected).map(|i| i.id.as_str()).collect();
    assert_eq!(selected, ["horiz_comp_2"]);
    let selected: Vec<_> = view.vertical.items.iter().filter(|i| i.selected).map(|i| i.id.as_str()).collect();
    assert_eq!(selected, ["vert_analysis_3"]);
}

#[test]
fn empty_only_after_loading_finishes() {
    let mut state = loaded_state();
    state.horizontal.items = Some(Vec::new());
    state.vertical.items = None;
    state.vertical.loading = true;
    let view = DashboardView::from_state(&state, false);
    assert!(view.horizontal.empty);
    assert_eq!(view.horizontal.empty_message, "No data available");
    assert!(!view.vertical.empty);
    assert!(view.vertical.loading);
}
