//! Core types shared across fcom facilities
//!
//! This crate provides the canonical schema constants used by the
//! logging facility and by anything that reads its structured output:
//!
//! - **Field keys**: component, op, event, duration and error fields
//! - **Domain keys**: object name, scope key, target and change counts
//! - **Event names**: start, end, end_error

pub mod schema;
