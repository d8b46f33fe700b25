pub mod audit;
pub mod catalog;
pub mod config;
pub mod manifest;
pub mod plan;
pub mod region;

pub use audit::{AuditAction, AuditEntry, EntityType};
pub use catalog::{Catalog, RegionSeed};
pub use config::{ConfigEntry, VersionLineConfig};
pub use manifest::{
    ChangeType, CheckStatus, ComponentDraft, Manifest, ManifestComponent, ManifestDraft,
    ManifestPatch,
};
pub use plan::{Plan, PlanDraft, PlanFilter, PlanStatus, PlanType, PlanUpdate};
pub use region::{PinUpdate, Region, RegionArea, RegionVersion};
