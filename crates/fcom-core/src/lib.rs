//! FCOM Core - override processor trees and staged review diffs
//!
//! This crate provides the in-memory logic behind reviewing override edits
//! before they are committed to the rules repository, including:
//! - A typed processor-tree model with tolerant classification of raw JSON
//! - Target field resolution with branch union over `if`/`foreach`/`switch`
//! - Scope indexing of override snapshots
//! - A staged diff engine producing field and processor change sets
//! - A line diff utility for rendering changed values
//! - Override document ingestion and patch operation conversion
//!
//! Nothing here performs I/O. Callers fetch both snapshots first and hand
//! over parsed entries.

pub mod base_values;
pub mod canonical;
pub mod diff;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod logging_facility;
pub mod model;
pub mod patch;
pub mod resolver;

// Re-export commonly used types
pub use base_values::{BaseValueSource, MemoizedBaseValues, NoBaseValues, StaticBaseValues};
pub use diff::{compute_staged_diff, diff_lines, StagedDiff};
pub use errors::{ExError, ExErrorKind, FcomError, Result};
pub use index::{index_overrides, ScopeIndex};
pub use ingest::{extract_rule_text, parse_override_document, OverrideDocument};
pub use model::{OverrideEntry, ProcessorKind, ProcessorNode, Scope, ScopeKey, TargetKey};
pub use resolver::{collect_entry_targets, resolve_processors, TargetResolution};
