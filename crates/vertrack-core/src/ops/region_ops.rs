use chrono::Utc;

use crate::errors::{Result, TrackerError};
use crate::model::{PinUpdate, RegionVersion};

/// Create or update a region's pin
///
/// Readiness flags left `None` keep their current value, or default to
/// `false` on a new pin.
///
/// # Errors
/// * `MissingField` - no existing pin and no `plan_id` supplied, or a blank `plan_id`
pub fn apply_pin_update(
    region_id: &str,
    existing: Option<RegionVersion>,
    update: PinUpdate,
) -> Result<RegionVersion> {
    if update.plan_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
        return Err(missing_plan_id());
    }

    let pin = match existing {
        Some(mut pin) => {
            if let Some(plan_id) = update.plan_id {
                pin.plan_id = plan_id;
            }
            if let Some(ready) = update.backend_ready {
                pin.backend_ready = ready;
            }
            if let Some(ready) = update.frontend_ready {
                pin.frontend_ready = ready;
            }
            pin.last_updated_at = Utc::now();
            pin
        }
        None => RegionVersion {
            region_id: region_id.to_string(),
            plan_id: update.plan_id.ok_or_else(missing_plan_id)?,
            backend_ready: update.backend_ready.unwrap_or(false),
            frontend_ready: update.frontend_ready.unwrap_or(false),
            last_updated_at: Utc::now(),
        },
    };
    Ok(pin)
}

fn missing_plan_id() -> TrackerError {
    TrackerError::MissingField {
        field: "plan_id".to_string(),
    }
}
