// Integration tests for manifest command handlers and plan comparison.

use rusqlite::Connection;
use vertrack_core::diff::{DiffChangeType, FRONTEND_ENTRY};
use vertrack_core::errors::ExErrorKind;
use vertrack_core::model::{
    AuditAction, Catalog, ChangeType, CheckStatus, ComponentDraft, EntityType, ManifestDraft,
    ManifestPatch, PlanDraft, PlanStatus, PlanType,
};
use vertrack_core_types::OperationContext;
use vertrack_engine::commands::manifest::{
    manifest_copy, manifest_create, manifest_get, manifest_update, plans_compare,
};
use vertrack_engine::commands::plan::{plan_create, plan_set_status};
use vertrack_store::seed::{default_catalog, seed_regions};
use vertrack_store::SqliteRepo;

fn setup_db() -> (Connection, Catalog) {
    let conn = vertrack_store::db::open_store_in_memory().unwrap();
    let catalog = default_catalog().unwrap();
    seed_regions(&conn, &catalog).unwrap();
    (conn, catalog)
}

fn ctx() -> OperationContext {
    OperationContext::for_operator("bob")
}

fn create_plan(conn: &mut Connection, catalog: &Catalog, version: &str, with_manifest: bool) {
    let manifest = with_manifest.then(|| ManifestDraft {
        frontend_version: "25.8.0".to_string(),
        frontend_change_type: Some(ChangeType::New),
        components: vec![
            ComponentDraft::new("guard", "25.8.0"),
            ComponentDraft::new("ces-go-api", "25.8.0"),
        ],
        ..Default::default()
    });
    plan_create(
        conn,
        &ctx(),
        catalog,
        PlanDraft {
            version: version.to_string(),
            summary: "Initial release".to_string(),
            ..Default::default()
        },
        manifest,
    )
    .unwrap();
}

// ---------------------------------------------------------------------------
// manifest_get / manifest_create
// ---------------------------------------------------------------------------

#[test]
fn test_manifest_get_sorted_by_component() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);

    let manifest = manifest_get(&conn, "25.8.0").unwrap();

    let names: Vec<_> = manifest
        .components
        .iter()
        .map(|c| c.component_name.as_str())
        .collect();
    assert_eq!(names, vec!["ces-go-api", "guard"]);
    assert_eq!(manifest.frontend_change_type, ChangeType::New);
}

#[test]
fn test_manifest_get_missing_is_not_found() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", false);

    let err = manifest_get(&conn, "25.8.0").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_manifest_create_once_per_plan() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", false);
    let draft = ManifestDraft {
        frontend_version: "25.8.0".to_string(),
        components: vec![ComponentDraft::new("hermes", "25.8.0")],
        ..Default::default()
    };

    let manifest = manifest_create(&mut conn, &ctx(), &catalog, "25.8.0", draft.clone()).unwrap();
    assert_eq!(manifest.components.len(), 1);

    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Manifest, &manifest.id).unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, AuditAction::Create);
    assert!(audit[0]
        .new_value
        .as_deref()
        .is_some_and(|v| v.contains("\"frontend_version\":\"25.8.0\"")));

    let err = manifest_create(&mut conn, &ctx(), &catalog, "25.8.0", draft).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Conflict);
}

#[test]
fn test_manifest_create_duplicate_component_rejected() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", false);

    let err = manifest_create(
        &mut conn,
        &ctx(),
        &catalog,
        "25.8.0",
        ManifestDraft {
            frontend_version: "25.8.0".to_string(),
            components: vec![
                ComponentDraft::new("guard", "25.8.0"),
                ComponentDraft::new("guard", "25.8.1"),
            ],
            ..Default::default()
        },
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
    assert_eq!(err.entity_id(), Some("guard"));
}

// ---------------------------------------------------------------------------
// manifest_update
// ---------------------------------------------------------------------------

#[test]
fn test_manifest_update_header_keeps_components() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);

    let updated = manifest_update(
        &mut conn,
        &ctx(),
        &catalog,
        "25.8.0",
        ManifestPatch {
            fe_be_check_status: Some(CheckStatus::Warn),
            fe_be_check_message: Some("frontend needs guard 25.8.1".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(updated.fe_be_check_status, CheckStatus::Warn);
    assert_eq!(updated.components.len(), 2);

    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Manifest, &updated.id).unwrap();
    let row = audit
        .iter()
        .find(|a| a.action == AuditAction::Update)
        .expect("update audit row");
    assert!(row.old_value.as_deref().is_some_and(|v| v.contains("\"ok\"")));
    assert!(row
        .new_value
        .as_deref()
        .is_some_and(|v| v.contains("frontend needs guard 25.8.1")));
}

#[test]
fn test_manifest_update_replaces_whole_component_set() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);

    let updated = manifest_update(
        &mut conn,
        &ctx(),
        &catalog,
        "25.8.0",
        ManifestPatch {
            components: Some(vec![
                ComponentDraft::new("task-center", "25.8.0"),
                ComponentDraft::new("alarm-engine", "25.8.0"),
            ]),
            ..Default::default()
        },
    )
    .unwrap();

    let names: Vec<_> = updated
        .components
        .iter()
        .map(|c| c.component_name.as_str())
        .collect();
    assert_eq!(names, vec!["alarm-engine", "task-center"]);
}

#[test]
fn test_manifest_update_invalid_patch_leaves_manifest_unchanged() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);
    let before = manifest_get(&conn, "25.8.0").unwrap();

    let err = manifest_update(
        &mut conn,
        &ctx(),
        &catalog,
        "25.8.0",
        ManifestPatch {
            frontend_version: Some("25.8.9".to_string()),
            components: Some(vec![ComponentDraft::new("no-such-service", "1.0.0")]),
            ..Default::default()
        },
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
    assert_eq!(manifest_get(&conn, "25.8.0").unwrap(), before);
    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Manifest, &before.id).unwrap();
    assert_eq!(audit.len(), 1, "only the create row");
}

// ---------------------------------------------------------------------------
// manifest_copy / plans_compare
// ---------------------------------------------------------------------------

#[test]
fn test_manifest_copy_resets_change_types() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);
    plan_set_status(&mut conn, &ctx(), "25.8.0", PlanStatus::Released).unwrap();

    let detail = manifest_copy(&mut conn, &ctx(), "25.8.0", "25.8.1", None, None).unwrap();

    assert_eq!(detail.plan.version, "25.8.1");
    assert_eq!(detail.plan.status, PlanStatus::Draft);
    assert_eq!(detail.plan.plan_type, PlanType::Release);
    assert_eq!(detail.plan.summary, "Copied from 25.8.0");

    let manifest = manifest_get(&conn, "25.8.1").unwrap();
    assert_eq!(manifest.frontend_version, "25.8.0");
    assert_eq!(manifest.frontend_change_type, ChangeType::Unchanged);
    assert_eq!(manifest.components.len(), 2);
    assert!(manifest
        .components
        .iter()
        .all(|c| c.change_type == ChangeType::Unchanged && c.change_reason.is_empty()));

    let source = manifest_get(&conn, "25.8.0").unwrap();
    assert_ne!(source.id, manifest.id);
    assert_eq!(source.frontend_change_type, ChangeType::New);
}

#[test]
fn test_manifest_copy_to_existing_version_conflicts() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);
    create_plan(&mut conn, &catalog, "25.8.1", false);

    let err = manifest_copy(&mut conn, &ctx(), "25.8.0", "25.8.1", None, None).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Conflict);
    assert!(manifest_get(&conn, "25.8.1").is_err());
}

#[test]
fn test_compare_after_component_upgrade() {
    // Given: 25.8.1 copied from 25.8.0 with ces-go-api upgraded
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);
    manifest_copy(
        &mut conn,
        &ctx(),
        "25.8.0",
        "25.8.1",
        None,
        Some("Gateway fix".to_string()),
    )
    .unwrap();
    let mut upgraded = ComponentDraft::new("ces-go-api", "25.8.1");
    upgraded.change_type = Some(ChangeType::Upgrade);
    upgraded.change_reason = Some("Fix gateway timeout".to_string());
    manifest_update(
        &mut conn,
        &ctx(),
        &catalog,
        "25.8.1",
        ManifestPatch {
            components: Some(vec![ComponentDraft::new("guard", "25.8.0"), upgraded]),
            ..Default::default()
        },
    )
    .unwrap();

    // When: The two plans are compared
    let comparison = plans_compare(&conn, "25.8.0", "25.8.1").unwrap();

    // Then: Exactly one component differs
    assert_eq!(comparison.plan_a.version, "25.8.0");
    assert_eq!(comparison.plan_b.version, "25.8.1");
    assert_eq!(comparison.manifest_diff.total_changes, 1);
    let entry = comparison.manifest_diff.entry("ces-go-api").unwrap();
    assert_eq!(entry.change_type, DiffChangeType::Changed);
    assert_eq!(entry.version_a, "25.8.0");
    assert_eq!(entry.version_b, "25.8.1");
    assert_eq!(entry.reason_b.as_deref(), Some("Fix gateway timeout"));
    assert!(comparison.manifest_diff.entry(FRONTEND_ENTRY).is_none());

    let fields: Vec<_> = comparison
        .basic_info_changes
        .iter()
        .map(|c| c.field.as_str())
        .collect();
    assert_eq!(fields, vec!["summary"]);

    // And: Reversing the sides keeps the entry count
    let reversed = plans_compare(&conn, "25.8.1", "25.8.0").unwrap();
    assert_eq!(reversed.manifest_diff.total_changes, 1);
}

#[test]
fn test_compare_plan_with_itself_is_empty() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);

    let comparison = plans_compare(&conn, "25.8.0", "25.8.0").unwrap();

    assert!(comparison.manifest_diff.is_empty());
    assert!(comparison.basic_info_changes.is_empty());
}

#[test]
fn test_compare_without_manifest_is_not_found() {
    let (mut conn, catalog) = setup_db();
    create_plan(&mut conn, &catalog, "25.8.0", true);
    create_plan(&mut conn, &catalog, "25.8.1", false);

    let err = plans_compare(&conn, "25.8.0", "25.8.1").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}
