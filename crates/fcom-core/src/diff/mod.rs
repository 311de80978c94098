//! Staged diff engine.
//!
//! Compares a base (committed) override snapshot with a staged (locally
//! edited) one and produces per-scope field and processor changes for
//! human review before commit.
//!
//! ## Entry point
//!
//! ```
//! use fcom_core::base_values::NoBaseValues;
//! use fcom_core::diff::{compute_staged_diff, render_review_summary};
//! use fcom_core::model::OverrideEntry;
//! use serde_json::json;
//!
//! let staged: Vec<OverrideEntry> = serde_json::from_value(json!([
//!     {"@objectName": "Cisco::Link", "method": "trap", "event": {"Severity": "Critical"}}
//! ])).unwrap();
//!
//! let diff = compute_staged_diff(&[], &staged, &NoBaseValues);
//! assert_eq!(diff.total_changes, 1);
//! let summary = render_review_summary(&diff);
//! assert!(summary.contains("Cisco::Link (Object post)"));
//! ```
//!
//! ## Guarantees
//!
//! - **Idempotence**: diffing a snapshot against itself yields no sections.
//! - **Symmetry**: swapping base and staged swaps `added` and `removed` and
//!   keeps every `updated` with `before`/`after` exchanged, as long as no
//!   base value source turns an addition into an update.
//! - **Key order insensitivity**: object key order in the source JSON
//!   never produces a change.
//! - **Determinism**: sections, field changes and processor changes come
//!   out in a fixed order for the same inputs.
//! - **Completeness**: any edit to a top-level processor or to anything
//!   nested inside it yields at least one change. The one blind spot is
//!   dropping one of two identical copies of a processor that represents
//!   no target, since both copies share an identity key.

pub mod engine;
pub mod field_map;
pub mod human_summary;
pub mod line_diff;
pub mod model;

pub use engine::{compute_indexed_diff, compute_staged_diff};
pub use field_map::build_field_change_map;
pub use human_summary::render_review_summary;
pub use line_diff::{diff_lines, diff_values, format_diff_value, LineDiff, LineDiffKind};
pub use model::{
    ChangeAction, FieldChange, FieldOrigin, ProcessorChange, StagedDiff, StagedDiffSection,
};
