pub mod override_entry;
pub mod processor;
pub mod target;

pub use override_entry::{OverrideEntry, Scope, ScopeKey, GLOBAL_OBJECT_NAME};
pub use processor::{classify, is_processor, ProcessorKind, ProcessorNode};
pub use target::{TargetKey, EVENT_PREFIX};
