// Integration tests for plan command handlers.
// Covers create, get, list, update auditing, status changes and soft delete.

use rusqlite::Connection;
use vertrack_core::errors::ExErrorKind;
use vertrack_core::model::{
    AuditAction, Catalog, ComponentDraft, EntityType, ManifestDraft, PinUpdate, PlanDraft,
    PlanFilter, PlanStatus, PlanType, PlanUpdate,
};
use vertrack_core_types::OperationContext;
use vertrack_engine::commands::plan::{
    plan_create, plan_deprecate, plan_get, plan_list, plan_set_status, plan_update,
};
use vertrack_engine::commands::region::region_set_version;
use vertrack_store::seed::{default_catalog, seed_regions};
use vertrack_store::SqliteRepo;

fn setup_db() -> (Connection, Catalog) {
    let conn = vertrack_store::db::open_store_in_memory().unwrap();
    let catalog = default_catalog().unwrap();
    seed_regions(&conn, &catalog).unwrap();
    (conn, catalog)
}

fn ctx() -> OperationContext {
    OperationContext::for_operator("alice")
}

fn draft(version: &str, summary: &str) -> PlanDraft {
    PlanDraft {
        version: version.to_string(),
        summary: summary.to_string(),
        ..Default::default()
    }
}

fn manifest_draft() -> ManifestDraft {
    ManifestDraft {
        frontend_version: "25.8.0".to_string(),
        components: vec![
            ComponentDraft::new("guard", "25.8.0"),
            ComponentDraft::new("ces-go-api", "25.8.0"),
        ],
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// plan_create
// ---------------------------------------------------------------------------

#[test]
fn test_plan_create_with_manifest() {
    let (mut conn, catalog) = setup_db();

    let detail = plan_create(
        &mut conn,
        &ctx(),
        &catalog,
        draft("25.8.0", "Initial release"),
        Some(manifest_draft()),
    )
    .unwrap();

    assert_eq!(detail.plan.version, "25.8.0");
    assert_eq!(detail.plan.version_line, "25.8");
    assert_eq!(detail.plan.plan_type, PlanType::Release);
    assert_eq!(detail.plan.status, PlanStatus::Draft);
    let manifest = detail.manifest.expect("manifest created");
    assert_eq!(manifest.plan_id, detail.plan.id);
    assert_eq!(manifest.components.len(), 2);

    let plan_audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Plan, &detail.plan.id).unwrap();
    assert_eq!(plan_audit.len(), 1);
    assert_eq!(plan_audit[0].action, AuditAction::Create);
    assert_eq!(plan_audit[0].operator, "alice");
    assert_eq!(plan_audit[0].new_value.as_deref(), Some("25.8.0"));

    let manifest_audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Manifest, &manifest.id).unwrap();
    assert_eq!(manifest_audit.len(), 1);
}

#[test]
fn test_plan_create_infers_patch_type() {
    let (mut conn, catalog) = setup_db();

    let detail = plan_create(
        &mut conn,
        &ctx(),
        &catalog,
        draft("25.8.1.1", "Hotfix"),
        None,
    )
    .unwrap();

    assert_eq!(detail.plan.plan_type, PlanType::Patch);
    assert!(detail.manifest.is_none());
}

#[test]
fn test_plan_create_duplicate_version_conflicts() {
    let (mut conn, catalog) = setup_db();
    plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "First"), None).unwrap();

    let err = plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Second"), None)
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Conflict);
    assert_eq!(SqliteRepo::list_plans(&conn).unwrap().len(), 1);
}

#[test]
fn test_plan_create_type_mismatch_rejected() {
    let (mut conn, catalog) = setup_db();
    let mut bad = draft("25.8.1", "Mismatch");
    bad.plan_type = Some(PlanType::Patch);

    let err = plan_create(&mut conn, &ctx(), &catalog, bad, None).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
}

#[test]
fn test_plan_create_invalid_manifest_writes_nothing() {
    let (mut conn, catalog) = setup_db();
    let mut manifest = manifest_draft();
    manifest
        .components
        .push(ComponentDraft::new("not-a-component", "1.0.0"));

    let err = plan_create(
        &mut conn,
        &ctx(),
        &catalog,
        draft("25.8.0", "Initial"),
        Some(manifest),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Validation);
    assert!(SqliteRepo::list_plans(&conn).unwrap().is_empty());
    assert!(SqliteRepo::list_recent_audit(&conn, 10).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// plan_get / plan_list
// ---------------------------------------------------------------------------

#[test]
fn test_plan_get_by_id_or_version() {
    let (mut conn, catalog) = setup_db();
    let created = plan_create(
        &mut conn,
        &ctx(),
        &catalog,
        draft("25.8.0", "Initial"),
        Some(manifest_draft()),
    )
    .unwrap();
    region_set_version(
        &mut conn,
        &ctx(),
        "Singapore",
        PinUpdate::to_plan(created.plan.id.clone()),
    )
    .unwrap();

    let by_id = plan_get(&conn, &created.plan.id).unwrap();
    let by_version = plan_get(&conn, "25.8.0").unwrap();

    assert_eq!(by_id, by_version);
    assert!(by_id.manifest.is_some());
    assert_eq!(by_id.regions.len(), 1);
    assert_eq!(by_id.regions[0].name, "Singapore");
}

#[test]
fn test_plan_get_unknown_is_not_found() {
    let (conn, _catalog) = setup_db();

    let err = plan_get(&conn, "99.9.9").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some("99.9.9"));
}

#[test]
fn test_plan_list_filters() {
    let (mut conn, catalog) = setup_db();
    plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Initial"), None).unwrap();
    plan_create(&mut conn, &ctx(), &catalog, draft("25.8.1", "Gateway fix"), None).unwrap();
    plan_create(&mut conn, &ctx(), &catalog, draft("25.8.1.1", "Hotfix"), None).unwrap();
    plan_set_status(&mut conn, &ctx(), "25.8.1", PlanStatus::Testing).unwrap();
    plan_deprecate(&mut conn, &ctx(), "25.8.0").unwrap();

    let visible = plan_list(&conn, &PlanFilter::default()).unwrap();
    assert_eq!(visible.len(), 2, "deprecated plans hidden by default");

    let testing = plan_list(
        &conn,
        &PlanFilter {
            status: Some(PlanStatus::Testing),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(testing.len(), 1);
    assert_eq!(testing[0].version, "25.8.1");

    let patches = plan_list(
        &conn,
        &PlanFilter {
            plan_type: Some(PlanType::Patch),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(patches.len(), 1);

    let searched = plan_list(
        &conn,
        &PlanFilter {
            search: Some("Gateway".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(searched.len(), 1);

    let all = plan_list(
        &conn,
        &PlanFilter {
            include_deprecated: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(all.len(), 3);
}

// ---------------------------------------------------------------------------
// plan_update
// ---------------------------------------------------------------------------

#[test]
fn test_plan_update_audits_each_changed_field() {
    let (mut conn, catalog) = setup_db();
    let created = plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Initial"), None)
        .unwrap();

    let updated = plan_update(
        &mut conn,
        &ctx(),
        "25.8.0",
        PlanUpdate {
            summary: Some("Initial release".to_string()),
            related_requirements: Some(vec!["REQ-2".to_string(), "REQ-1".to_string()]),
            related_bugs: None,
        },
    )
    .unwrap();

    assert_eq!(updated.summary, "Initial release");
    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Plan, &created.plan.id).unwrap();
    let updates: Vec<_> = audit
        .iter()
        .filter(|a| a.action == AuditAction::Update)
        .collect();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].field.as_deref(), Some("summary"));
    assert_eq!(updates[0].old_value.as_deref(), Some("Initial"));
    assert_eq!(updates[0].new_value.as_deref(), Some("Initial release"));
    assert_eq!(updates[1].field.as_deref(), Some("related_requirements"));
    assert_eq!(updates[1].new_value.as_deref(), Some(r#"["REQ-1","REQ-2"]"#));
}

#[test]
fn test_plan_update_rejects_blank_summary_and_trims() {
    let (mut conn, catalog) = setup_db();
    let created = plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Initial"), None)
        .unwrap();

    let err = plan_update(
        &mut conn,
        &ctx(),
        "25.8.0",
        PlanUpdate {
            summary: Some("   ".to_string()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Validation);

    let updated = plan_update(
        &mut conn,
        &ctx(),
        "25.8.0",
        PlanUpdate {
            summary: Some("  Gateway rollout  ".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(updated.summary, "Gateway rollout");

    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Plan, &created.plan.id).unwrap();
    let updates: Vec<_> = audit
        .iter()
        .filter(|a| a.action == AuditAction::Update)
        .collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].new_value.as_deref(), Some("Gateway rollout"));
}

#[test]
fn test_plan_update_without_changes_writes_no_audit() {
    let (mut conn, catalog) = setup_db();
    let created = plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Initial"), None)
        .unwrap();

    plan_update(
        &mut conn,
        &ctx(),
        "25.8.0",
        PlanUpdate {
            summary: Some("Initial".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Plan, &created.plan.id).unwrap();
    assert_eq!(audit.len(), 1, "only the create row");
}

// ---------------------------------------------------------------------------
// plan_set_status / plan_deprecate
// ---------------------------------------------------------------------------

#[test]
fn test_plan_set_status_audits_transition() {
    let (mut conn, catalog) = setup_db();
    let created = plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Initial"), None)
        .unwrap();

    let plan = plan_set_status(&mut conn, &ctx(), "25.8.0", PlanStatus::Released).unwrap();
    assert_eq!(plan.status, PlanStatus::Released);

    // Same status again is a no-op
    plan_set_status(&mut conn, &ctx(), "25.8.0", PlanStatus::Released).unwrap();

    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Plan, &created.plan.id).unwrap();
    let changes: Vec<_> = audit
        .iter()
        .filter(|a| a.action == AuditAction::StatusChange)
        .collect();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].field.as_deref(), Some("status"));
    assert_eq!(changes[0].old_value.as_deref(), Some("draft"));
    assert_eq!(changes[0].new_value.as_deref(), Some("released"));
}

#[test]
fn test_plan_deprecate_keeps_manifest_and_pins() {
    // Given: A released plan with a manifest, pinned by a region
    let (mut conn, catalog) = setup_db();
    let created = plan_create(
        &mut conn,
        &ctx(),
        &catalog,
        draft("25.8.0", "Initial"),
        Some(manifest_draft()),
    )
    .unwrap();
    plan_set_status(&mut conn, &ctx(), "25.8.0", PlanStatus::Released).unwrap();
    region_set_version(&mut conn, &ctx(), "Cairo", PinUpdate::to_plan("25.8.0")).unwrap();

    // When: The plan is deleted
    let deprecated = plan_deprecate(&mut conn, &ctx(), "25.8.0").unwrap();

    // Then: It is soft-deleted and everything else survives
    assert_eq!(deprecated.status, PlanStatus::Deprecated);
    let detail = plan_get(&conn, &created.plan.id).unwrap();
    assert_eq!(detail.plan.version, "25.8.0");
    assert!(detail.manifest.is_some());
    assert_eq!(detail.regions.len(), 1);

    let audit =
        SqliteRepo::list_audit_for_entity(&conn, EntityType::Plan, &created.plan.id).unwrap();
    let delete = audit
        .iter()
        .find(|a| a.action == AuditAction::Delete)
        .expect("delete audit row");
    assert_eq!(delete.old_value.as_deref(), Some("released"));
    assert_eq!(delete.new_value.as_deref(), Some("deprecated"));

    // And: The version stays taken
    let err = plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Again"), None)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Conflict);
}

#[test]
fn test_deprecated_plan_is_terminal() {
    let (mut conn, catalog) = setup_db();
    plan_create(&mut conn, &ctx(), &catalog, draft("25.8.0", "Initial"), None).unwrap();
    plan_deprecate(&mut conn, &ctx(), "25.8.0").unwrap();

    let err = plan_set_status(&mut conn, &ctx(), "25.8.0", PlanStatus::Draft).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Validation);

    // Deprecating twice is allowed and changes nothing
    let again = plan_deprecate(&mut conn, &ctx(), "25.8.0").unwrap();
    assert_eq!(again.status, PlanStatus::Deprecated);
}
