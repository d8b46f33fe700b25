//! Static reference tables: backend component catalog and region catalog.
//!
//! The catalog is data (loaded from YAML by the store crate) and is passed
//! explicitly to seeding and manifest validation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError};
use crate::model::region::RegionArea;

/// Region reference row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSeed {
    pub name: String,
    pub area: RegionArea,
    #[serde(default)]
    pub is_gray: bool,
}

/// Known backend components and deployment regions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub components: Vec<String>,
    #[serde(default)]
    pub regions: Vec<RegionSeed>,
}

impl Catalog {
    pub fn contains_component(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }

    /// Check that names are non-blank and unique
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name, `DuplicateComponent` or
    /// `RegionExists` for repeated names.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for component in &self.components {
            if component.trim().is_empty() {
                return Err(TrackerError::MissingField {
                    field: "components[].name".to_string(),
                });
            }
            if !seen.insert(component.as_str()) {
                return Err(TrackerError::DuplicateComponent {
                    component: component.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.name.trim().is_empty() {
                return Err(TrackerError::MissingField {
                    field: "regions[].name".to_string(),
                });
            }
            if !seen.insert(region.name.as_str()) {
                return Err(TrackerError::RegionExists {
                    name: region.name.clone(),
                });
            }
        }
        Ok(())
    }
}
