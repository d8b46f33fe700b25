pub mod validation;

pub use validation::{
    validate_components, validate_config_entry, validate_manifest_draft, validate_manifest_patch,
    validate_plan_draft, validate_plan_update, validate_status_transition,
};
