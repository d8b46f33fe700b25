//! SQLite repository implementation
//!
//! Every function takes a `&Connection`; pass `&tx` to run inside a
//! transaction. Timestamps are stored as Unix milliseconds and string lists
//! as JSON arrays.

#![allow(clippy::result_large_err)]

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row};
use vertrack_core::model::{
    AuditEntry, ConfigEntry, EntityType, Manifest, ManifestComponent, Plan, Region, RegionArea,
    RegionSeed, RegionVersion,
};
use vertrack_core::queries::newest_first;

use crate::errors::{from_rusqlite, from_rusqlite_write, serialization_error, Result};

const PLAN_COLUMNS: &str = "id, version, version_line, plan_type, status, summary, \
     related_requirements, related_bugs, created_at, updated_at";

const MANIFEST_COLUMNS: &str = "id, plan_id, frontend_version, frontend_change_type, \
     frontend_change_reason, fe_be_check_status, fe_be_check_message, \
     dependency_check_status, dependency_check_message, created_at, updated_at";

/// Sort key matching `RegionArea` declaration order
const AREA_ORDER: &str = "CASE area WHEN 'domestic' THEN 0 WHEN 'apac' THEN 1 \
     WHEN 'africa' THEN 2 ELSE 3 END";

const AUDIT_COLUMNS: &str =
    "id, entity_type, entity_id, action, field, old_value, new_value, operator, created_at";

/// SQLite repository for plans, manifests, regions, config and audit
pub struct SqliteRepo;

impl SqliteRepo {
    // ===== Plans =====

    /// Insert a new plan
    ///
    /// A duplicate version surfaces as `Conflict`.
    pub fn insert_plan(conn: &Connection, plan: &Plan) -> Result<()> {
        conn.execute(
            "INSERT INTO plans (id, version, version_line, plan_type, status, summary,
                related_requirements, related_bugs, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                plan.id,
                plan.version,
                plan.version_line,
                plan.plan_type.as_str(),
                plan.status.as_str(),
                plan.summary,
                to_json("related_requirements", &plan.related_requirements)?,
                to_json("related_bugs", &plan.related_bugs)?,
                plan.created_at.timestamp_millis(),
                plan.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| from_rusqlite_write(e, &plan.version))?;

        Ok(())
    }

    /// Write back the mutable plan fields
    ///
    /// Version, line and type are immutable after creation.
    pub fn update_plan(conn: &Connection, plan: &Plan) -> Result<()> {
        conn.execute(
            "UPDATE plans SET status = ?2, summary = ?3, related_requirements = ?4,
                related_bugs = ?5, updated_at = ?6
             WHERE id = ?1",
            rusqlite::params![
                plan.id,
                plan.status.as_str(),
                plan.summary,
                to_json("related_requirements", &plan.related_requirements)?,
                to_json("related_bugs", &plan.related_bugs)?,
                plan.updated_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    pub fn get_plan(conn: &Connection, plan_id: &str) -> Result<Option<Plan>> {
        conn.query_row(
            &format!("SELECT {} FROM plans WHERE id = ?1", PLAN_COLUMNS),
            [plan_id],
            plan_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_plan_by_version(conn: &Connection, version: &str) -> Result<Option<Plan>> {
        conn.query_row(
            &format!("SELECT {} FROM plans WHERE version = ?1", PLAN_COLUMNS),
            [version],
            plan_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// All plans, newest first
    ///
    /// Plans created in the same millisecond are ordered by version, compared
    /// numerically rather than as text.
    pub fn list_plans(conn: &Connection) -> Result<Vec<Plan>> {
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM plans", PLAN_COLUMNS))
            .map_err(from_rusqlite)?;
        let mut plans = stmt
            .query_map([], plan_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        plans.sort_by(newest_first);
        Ok(plans)
    }

    // ===== Manifests =====

    /// Insert a manifest and its components
    ///
    /// A second manifest for the same plan surfaces as `Conflict`.
    pub fn insert_manifest(conn: &Connection, manifest: &Manifest) -> Result<()> {
        conn.execute(
            &format!(
                "INSERT INTO manifests ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                MANIFEST_COLUMNS
            ),
            rusqlite::params![
                manifest.id,
                manifest.plan_id,
                manifest.frontend_version,
                manifest.frontend_change_type.as_str(),
                manifest.frontend_change_reason,
                manifest.fe_be_check_status.as_str(),
                manifest.fe_be_check_message,
                manifest.dependency_check_status.as_str(),
                manifest.dependency_check_message,
                manifest.created_at.timestamp_millis(),
                manifest.updated_at.timestamp_millis(),
            ],
        )
        .map_err(|e| from_rusqlite_write(e, &manifest.plan_id))?;

        Self::insert_components(conn, &manifest.id, &manifest.components)
    }

    /// Write back the manifest header fields; components are untouched
    pub fn update_manifest_header(conn: &Connection, manifest: &Manifest) -> Result<()> {
        conn.execute(
            "UPDATE manifests SET frontend_version = ?2, frontend_change_type = ?3,
                frontend_change_reason = ?4, fe_be_check_status = ?5, fe_be_check_message = ?6,
                dependency_check_status = ?7, dependency_check_message = ?8, updated_at = ?9
             WHERE id = ?1",
            rusqlite::params![
                manifest.id,
                manifest.frontend_version,
                manifest.frontend_change_type.as_str(),
                manifest.frontend_change_reason,
                manifest.fe_be_check_status.as_str(),
                manifest.fe_be_check_message,
                manifest.dependency_check_status.as_str(),
                manifest.dependency_check_message,
                manifest.updated_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;

        Ok(())
    }

    /// Delete-then-insert the component set
    ///
    /// Not atomic on its own; call inside a transaction.
    pub fn replace_components(
        conn: &Connection,
        manifest_id: &str,
        components: &[ManifestComponent],
    ) -> Result<()> {
        conn.execute(
            "DELETE FROM manifest_components WHERE manifest_id = ?1",
            [manifest_id],
        )
        .map_err(from_rusqlite)?;
        Self::insert_components(conn, manifest_id, components)
    }

    fn insert_components(
        conn: &Connection,
        manifest_id: &str,
        components: &[ManifestComponent],
    ) -> Result<()> {
        let mut stmt = conn
            .prepare(
                "INSERT INTO manifest_components
                    (manifest_id, component_name, target_version, change_type, change_reason)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .map_err(from_rusqlite)?;
        for component in components {
            stmt.execute(rusqlite::params![
                manifest_id,
                component.component_name,
                component.target_version,
                component.change_type.as_str(),
                component.change_reason,
            ])
            .map_err(|e| from_rusqlite_write(e, &component.component_name))?;
        }
        Ok(())
    }

    /// Manifest of a plan with components sorted by name
    pub fn get_manifest_by_plan(conn: &Connection, plan_id: &str) -> Result<Option<Manifest>> {
        let manifest = conn
            .query_row(
                &format!("SELECT {} FROM manifests WHERE plan_id = ?1", MANIFEST_COLUMNS),
                [plan_id],
                manifest_from_row,
            )
            .optional()
            .map_err(from_rusqlite)?;

        match manifest {
            Some(mut manifest) => {
                manifest.components = Self::list_components(conn, &manifest.id)?;
                Ok(Some(manifest))
            }
            None => Ok(None),
        }
    }

    fn list_components(conn: &Connection, manifest_id: &str) -> Result<Vec<ManifestComponent>> {
        let mut stmt = conn
            .prepare(
                "SELECT component_name, target_version, change_type, change_reason
                 FROM manifest_components WHERE manifest_id = ?1 ORDER BY component_name",
            )
            .map_err(from_rusqlite)?;
        let components = stmt
            .query_map([manifest_id], |row| {
                Ok(ManifestComponent {
                    component_name: row.get(0)?,
                    target_version: row.get(1)?,
                    change_type: parse_column(row, 2)?,
                    change_reason: row.get(3)?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(components)
    }

    // ===== Regions =====

    pub fn insert_region(conn: &Connection, region: &Region) -> Result<()> {
        conn.execute(
            "INSERT INTO regions (id, name, area, is_gray) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                region.id,
                region.name,
                region.area.as_str(),
                region.is_gray as i64
            ],
        )
        .map_err(|e| from_rusqlite_write(e, &region.name))?;
        Ok(())
    }

    /// Insert a catalog region, or refresh area and gray flag by name
    ///
    /// Returns the id of the inserted or existing region.
    pub fn upsert_region_seed(conn: &Connection, seed: &RegionSeed, new_id: &str) -> Result<String> {
        conn.execute(
            "INSERT INTO regions (id, name, area, is_gray) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET area = excluded.area, is_gray = excluded.is_gray",
            rusqlite::params![new_id, seed.name, seed.area.as_str(), seed.is_gray as i64],
        )
        .map_err(from_rusqlite)?;

        conn.query_row(
            "SELECT id FROM regions WHERE name = ?1",
            [&seed.name],
            |row| row.get(0),
        )
        .map_err(from_rusqlite)
    }

    pub fn get_region(conn: &Connection, region_id: &str) -> Result<Option<Region>> {
        conn.query_row(
            "SELECT id, name, area, is_gray FROM regions WHERE id = ?1",
            [region_id],
            region_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn get_region_by_name(conn: &Connection, name: &str) -> Result<Option<Region>> {
        conn.query_row(
            "SELECT id, name, area, is_gray FROM regions WHERE name = ?1",
            [name],
            region_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Regions ordered by area then name, optionally restricted to one area
    pub fn list_regions(conn: &Connection, area: Option<RegionArea>) -> Result<Vec<Region>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT id, name, area, is_gray FROM regions
                 WHERE ?1 IS NULL OR area = ?1
                 ORDER BY {}, name",
                AREA_ORDER
            ))
            .map_err(from_rusqlite)?;
        let regions = stmt
            .query_map([area.map(|a| a.as_str())], region_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(regions)
    }

    // ===== Region pins =====

    pub fn get_pin(conn: &Connection, region_id: &str) -> Result<Option<RegionVersion>> {
        conn.query_row(
            "SELECT region_id, plan_id, backend_ready, frontend_ready, last_updated_at
             FROM region_versions WHERE region_id = ?1",
            [region_id],
            pin_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn upsert_pin(conn: &Connection, pin: &RegionVersion) -> Result<()> {
        conn.execute(
            "INSERT INTO region_versions
                (region_id, plan_id, backend_ready, frontend_ready, last_updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(region_id) DO UPDATE SET
                plan_id = excluded.plan_id,
                backend_ready = excluded.backend_ready,
                frontend_ready = excluded.frontend_ready,
                last_updated_at = excluded.last_updated_at",
            rusqlite::params![
                pin.region_id,
                pin.plan_id,
                pin.backend_ready as i64,
                pin.frontend_ready as i64,
                pin.last_updated_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn list_pins(conn: &Connection) -> Result<Vec<RegionVersion>> {
        let mut stmt = conn
            .prepare(
                "SELECT region_id, plan_id, backend_ready, frontend_ready, last_updated_at
                 FROM region_versions ORDER BY region_id",
            )
            .map_err(from_rusqlite)?;
        let pins = stmt
            .query_map([], pin_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(pins)
    }

    /// Regions currently pinned to `plan_id`, ordered by area then name
    pub fn list_regions_for_plan(conn: &Connection, plan_id: &str) -> Result<Vec<Region>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT r.id, r.name, r.area, r.is_gray
                 FROM regions r JOIN region_versions rv ON rv.region_id = r.id
                 WHERE rv.plan_id = ?1
                 ORDER BY {}, r.name",
                AREA_ORDER
            ))
            .map_err(from_rusqlite)?;
        let regions = stmt
            .query_map([plan_id], region_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(regions)
    }

    // ===== System config =====

    pub fn list_config(conn: &Connection) -> Result<Vec<ConfigEntry>> {
        let mut stmt = conn
            .prepare("SELECT key, value, updated_at FROM system_config ORDER BY key")
            .map_err(from_rusqlite)?;
        let entries = stmt
            .query_map([], config_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(entries)
    }

    pub fn get_config(conn: &Connection, key: &str) -> Result<Option<ConfigEntry>> {
        conn.query_row(
            "SELECT key, value, updated_at FROM system_config WHERE key = ?1",
            [key],
            config_from_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn upsert_config(conn: &Connection, entry: &ConfigEntry) -> Result<()> {
        conn.execute(
            "INSERT INTO system_config (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![entry.key, entry.value, entry.updated_at.timestamp_millis()],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    // ===== Audit log =====

    /// Append an audit row and return its id
    pub fn append_audit(conn: &Connection, entry: &AuditEntry) -> Result<i64> {
        conn.execute(
            "INSERT INTO audit_log
                (entity_type, entity_id, action, field, old_value, new_value, operator, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                entry.entity_type.as_str(),
                entry.entity_id,
                entry.action.as_str(),
                entry.field,
                entry.old_value,
                entry.new_value,
                entry.operator,
                entry.created_at.timestamp_millis(),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent audit rows, newest first
    pub fn list_recent_audit(conn: &Connection, limit: usize) -> Result<Vec<AuditEntry>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM audit_log ORDER BY created_at DESC, id DESC LIMIT ?1",
                AUDIT_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let entries = stmt
            .query_map([limit as i64], audit_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(entries)
    }

    /// Audit history of one entity, oldest first
    pub fn list_audit_for_entity(
        conn: &Connection,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<AuditEntry>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM audit_log WHERE entity_type = ?1 AND entity_id = ?2 ORDER BY id",
                AUDIT_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let entries = stmt
            .query_map([entity_type.as_str(), entity_id], audit_from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(entries)
    }
}

// ===== Row mapping =====

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    Ok(Plan {
        id: row.get(0)?,
        version: row.get(1)?,
        version_line: row.get(2)?,
        plan_type: parse_column(row, 3)?,
        status: parse_column(row, 4)?,
        summary: row.get(5)?,
        related_requirements: json_column(row, 6)?,
        related_bugs: json_column(row, 7)?,
        created_at: millis_column(row, 8)?,
        updated_at: millis_column(row, 9)?,
    })
}

fn manifest_from_row(row: &Row<'_>) -> rusqlite::Result<Manifest> {
    Ok(Manifest {
        id: row.get(0)?,
        plan_id: row.get(1)?,
        frontend_version: row.get(2)?,
        frontend_change_type: parse_column(row, 3)?,
        frontend_change_reason: row.get(4)?,
        fe_be_check_status: parse_column(row, 5)?,
        fe_be_check_message: row.get(6)?,
        dependency_check_status: parse_column(row, 7)?,
        dependency_check_message: row.get(8)?,
        components: Vec::new(),
        created_at: millis_column(row, 9)?,
        updated_at: millis_column(row, 10)?,
    })
}

fn region_from_row(row: &Row<'_>) -> rusqlite::Result<Region> {
    Ok(Region {
        id: row.get(0)?,
        name: row.get(1)?,
        area: parse_column(row, 2)?,
        is_gray: row.get::<_, i64>(3)? != 0,
    })
}

fn pin_from_row(row: &Row<'_>) -> rusqlite::Result<RegionVersion> {
    Ok(RegionVersion {
        region_id: row.get(0)?,
        plan_id: row.get(1)?,
        backend_ready: row.get::<_, i64>(2)? != 0,
        frontend_ready: row.get::<_, i64>(3)? != 0,
        last_updated_at: millis_column(row, 4)?,
    })
}

fn config_from_row(row: &Row<'_>) -> rusqlite::Result<ConfigEntry> {
    Ok(ConfigEntry {
        key: row.get(0)?,
        value: row.get(1)?,
        updated_at: millis_column(row, 2)?,
    })
}

fn audit_from_row(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    Ok(AuditEntry {
        id: Some(row.get(0)?),
        entity_type: parse_column(row, 1)?,
        entity_id: row.get(2)?,
        action: parse_column(row, 3)?,
        field: row.get(4)?,
        old_value: row.get(5)?,
        new_value: row.get(6)?,
        operator: row.get(7)?,
        created_at: millis_column(row, 8)?,
    })
}

/// Parse a TEXT column through the model's `FromStr`
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn millis_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let ms: i64 = row.get(idx)?;
    DateTime::from_timestamp_millis(ms).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, ms))
}

fn to_json(column: &str, values: &[String]) -> Result<String> {
    serde_json::to_string(values).map_err(|e| serialization_error(column, e))
}
