use super::*;
use serde_json::json;

fn horizontal_row() -> serde_json::Value {
    json!({
        "id": "h1",
        "user_id": "u1",
        "entity_type": "company",
        "name": "Acme",
        "created_at": "2024-03-01T10:00:00.123456+00:00",
        "updated_at": "2024-03-02T10:00:00Z"
    })
}

#[test]
fn horizontal_row_defaults_missing_optional_fields() {
    let row: HorizontalData = serde_json::from_value(horizontal_row()).unwrap();
    assert_eq!(row.entity_type, EntityType::Company);
    assert_eq!(row.status, EnrichmentStatus::Pending);
    assert!(row.description.is_none());
    assert!(row.metadata.is_none());
    assert_eq!(row.enriched_data, json!({}));
}

#[test]
fn horizontal_row_tolerates_unknown_entity_type_and_status() {
    let mut row = horizontal_row();
    row["entity_type"] = json!("planet");
    row["status"] = json!("processing");
    let row: HorizontalData = serde_json::from_value(row).unwrap();
    assert_eq!(row.entity_type, EntityType::Unknown);
    assert_eq!(row.status, EnrichmentStatus::Unknown);
}

#[test]
fn vertical_row_tolerates_unknown_status() {
    let row: VerticalAnalysis = serde_json::from_value(json!({
        "id": "v1",
        "user_id": "u1",
        "horizontal_data_id": "h1",
        "analysis_type": "Market Opportunity Analysis",
        "status": "running",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(row.status, AnalysisStatus::Unknown);
}

#[test]
fn vertical_row_parses_status_and_blobs() {
    let row: VerticalAnalysis = serde_json::from_value(json!({
        "id": "v1",
        "user_id": "u1",
        "horizontal_data_id": "h1",
        "analysis_type": "Market Opportunity Analysis",
        "analysis_results": { "summary": "ok" },
        "agent_config": null,
        "status": "completed",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z"
    }))
    .unwrap();
    assert_eq!(row.status, AnalysisStatus::Completed);
    assert!(row.agent_config.is_none());
    assert_eq!(row.analysis_results["summary"], "ok");
}

#[test]
fn user_profile_parses_optional_last_login() {
    let user: UserProfile = serde_json::from_value(json!({
        "id": "u1",
        "email": "a@b.c",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z",
        "last_login": "2024-03-05T08:00:00Z"
    }))
    .unwrap();
    assert!(user.last_login.is_some());
    assert!(user.full_name.is_none());
}

#[test]
fn blob_text_walks_nested_keys() {
    let blob = json!({ "company_details": { "founded": 2015, "ceo": "Sarah", "public": false } });
    assert_eq!(blob_text(Some(&blob), &["company_details", "founded"]), Some("2015".into()));
    assert_eq!(blob_text(Some(&blob), &["company_details", "ceo"]), Some("Sarah".into()));
    assert_eq!(blob_text(Some(&blob), &["company_details", "public"]), Some("false".into()));
}

#[test]
fn blob_text_missing_or_non_scalar_is_none() {
    let blob = json!({ "a": { "b": "" }, "list": [1, 2], "nil": null });
    assert_eq!(blob_text(Some(&blob), &["a", "b"]), None);
    assert_eq!(blob_text(Some(&blob), &["a", "missing"]), None);
    assert_eq!(blob_text(Some(&blob), &["list"]), None);
    assert_eq!(blob_text(Some(&blob), &["nil"]), None);
    assert_eq!(blob_text(None, &["a"]), None);
}
