//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Override identifiers
pub const FIELD_OBJECT_NAME: &str = "object_name";
pub const FIELD_SCOPE_KEY: &str = "scope_key";
pub const FIELD_TARGET: &str = "target";

// Collection sizes
pub const FIELD_BASE_ENTRIES: &str = "base_entries";
pub const FIELD_STAGED_ENTRIES: &str = "staged_entries";
pub const FIELD_SECTIONS: &str = "sections";
pub const FIELD_TOTAL_CHANGES: &str = "total_changes";
pub const FIELD_FIELD_CHANGES: &str = "field_changes";
pub const FIELD_PROCESSOR_CHANGES: &str = "processor_changes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
/// One changed scope inside a staged diff.
pub const EVENT_SCOPE_DIFF: &str = "scope_diff";
