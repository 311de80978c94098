//! Canonical logging macros
//!
//! Operation boundaries (`start`, `end`, `end_error`) plus one
//! `scope_diff` event per changed override scope. Field names follow
//! `fcom_core_types::schema`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use fcom_core::log_op_start;
/// log_op_start!("parse_override_document", bytes = 512);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use fcom_core::log_op_end;
/// log_op_end!("compute_staged_diff", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError).
///
/// # Example
///
/// ```
/// # use fcom_core::{log_op_error, errors::FcomError};
/// let err = FcomError::InvalidDocument { reason: "root is a number".to_string() };
/// log_op_error!("parse_override_document", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        use $crate::errors::ExError;
        let ex_err: ExError = $err.into();
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}

/// Log the changes found in one override scope
///
/// Emitted at debug level by the diff engine, keyed by the scope's
/// `method:scope:objectName` identity.
///
/// # Example
///
/// ```
/// # use fcom_core::log_scope_diff;
/// log_scope_diff!(
///     "compute_staged_diff",
///     scope_key = "trap:post:Cisco::Link",
///     object_name = "Cisco::Link",
///     field_changes = 2,
///     processor_changes = 0
/// );
/// ```
#[macro_export]
macro_rules! log_scope_diff {
    (
        $op:expr,
        scope_key = $scope_key:expr,
        object_name = $object_name:expr,
        field_changes = $fields:expr,
        processor_changes = $processors:expr
    ) => {
        tracing::debug!(
            component = module_path!(),
            op = $op,
            event = fcom_core_types::schema::EVENT_SCOPE_DIFF,
            scope_key = %$scope_key,
            object_name = $object_name,
            field_changes = $fields,
            processor_changes = $processors,
        );
    };
}
