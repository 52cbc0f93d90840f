//! Canonical field keys and event names for structured logging
//!
//! `tracing` macros take field names as identifiers, so emit sites spell
//! these out; the constants are the keys for reading captured events back.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Pipeline identifiers
pub const FIELD_PROFILE: &str = "profile";
pub const FIELD_APPLICATION: &str = "application";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_STAMP: &str = "stamp";
pub const FIELD_RESOURCE: &str = "resource";

// Collection sizes
pub const FIELD_RESOURCE_COUNT: &str = "resource_count";
pub const FIELD_CHANGE_COUNT: &str = "change_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
