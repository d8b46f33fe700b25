use thiserror::Error;
use vertrack_core_types::RequestId;

/// Result type alias using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced to a caller is classified into one of these kinds.
/// Each kind maps to a stable error code usable by API clients and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Malformed version, missing required field, unknown enum value
    Validation,
    /// Referenced plan, region or manifest does not exist
    NotFound,
    /// Unique key already taken (plan version, manifest per plan, region name)
    Conflict,

    // Integration/IO
    Persistence,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Validation => "ERR_VALIDATION",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Conflict => "ERR_CONFLICT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context (operation, entity, request) needed to debug a failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy raised by validation rules and pure operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    // ===== Validation Errors =====
    /// Version string is not 3 or 4 dot-separated non-negative integers
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Version line is not `major.minor`
    #[error("Invalid version line '{line}'")]
    InvalidVersionLine { line: String },

    /// Required field absent or blank
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Unknown enum value (status, type, area, change type, ...)
    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },

    /// Plan type disagrees with the number of version segments
    #[error("Version {version} has {segments} segments, which does not match plan type {plan_type}")]
    VersionTypeMismatch {
        version: String,
        plan_type: String,
        segments: usize,
    },

    /// Component listed twice in one manifest
    #[error("Duplicate component in manifest: {component}")]
    DuplicateComponent { component: String },

    /// Component not present in the catalog
    #[error("Unknown component: {component}")]
    UnknownComponent { component: String },

    /// Config entry rejected
    #[error("Invalid config '{key}': {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Deprecated plans are terminal and cannot change status
    #[error("Plan {plan_id} is deprecated and cannot change status")]
    DeprecatedPlan { plan_id: String },

    // ===== Lookup Errors =====
    /// Plan not found
    #[error("Plan not found: {plan_id}")]
    PlanNotFound { plan_id: String },

    /// Region not found
    #[error("Region not found: {region_id}")]
    RegionNotFound { region_id: String },

    /// Plan has no manifest
    #[error("Manifest not found for plan: {plan_id}")]
    ManifestNotFound { plan_id: String },

    // ===== Conflict Errors =====
    /// Plan version already exists
    #[error("Version already exists: {version}")]
    VersionExists { version: String },

    /// Plan already has a manifest
    #[error("Plan {plan_id} already has a manifest")]
    ManifestExists { plan_id: String },

    /// Region name already exists
    #[error("Region already exists: {name}")]
    RegionExists { name: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl TrackerError {
    /// Classify this error into the canonical kind taxonomy
    pub fn kind(&self) -> ExErrorKind {
        match self {
            TrackerError::InvalidVersion { .. }
            | TrackerError::InvalidVersionLine { .. }
            | TrackerError::MissingField { .. }
            | TrackerError::InvalidValue { .. }
            | TrackerError::VersionTypeMismatch { .. }
            | TrackerError::DuplicateComponent { .. }
            | TrackerError::UnknownComponent { .. }
            | TrackerError::InvalidConfig { .. }
            | TrackerError::DeprecatedPlan { .. } => ExErrorKind::Validation,
            TrackerError::PlanNotFound { .. }
            | TrackerError::RegionNotFound { .. }
            | TrackerError::ManifestNotFound { .. } => ExErrorKind::NotFound,
            TrackerError::VersionExists { .. }
            | TrackerError::ManifestExists { .. }
            | TrackerError::RegionExists { .. } => ExErrorKind::Conflict,
            TrackerError::Serialization { .. } => ExErrorKind::Serialization,
            TrackerError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    fn entity_id(&self) -> Option<&str> {
        match self {
            TrackerError::InvalidVersion { version, .. }
            | TrackerError::VersionTypeMismatch { version, .. }
            | TrackerError::VersionExists { version } => Some(version),
            TrackerError::InvalidConfig { key, .. } => Some(key),
            TrackerError::DeprecatedPlan { plan_id }
            | TrackerError::PlanNotFound { plan_id }
            | TrackerError::ManifestNotFound { plan_id }
            | TrackerError::ManifestExists { plan_id } => Some(plan_id),
            TrackerError::RegionNotFound { region_id } => Some(region_id),
            TrackerError::RegionExists { name } => Some(name),
            TrackerError::DuplicateComponent { component }
            | TrackerError::UnknownComponent { component } => Some(component),
            _ => None,
        }
    }
}

/// Conversion from TrackerError to ExError
///
/// The message keeps the domain error's display text; the entity id carries
/// the offending version, plan, region, component or config key.
impl From<TrackerError> for ExError {
    fn from(err: TrackerError) -> Self {
        let mut ex = ExError::new(err.kind()).with_message(err.to_string());
        if let Some(id) = err.entity_id() {
            ex = ex.with_entity_id(id);
        }
        ex
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Serialization {
            message: err.to_string(),
        }
    }
}
