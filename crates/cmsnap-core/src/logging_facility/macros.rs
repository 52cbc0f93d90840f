//! Canonical logging macros

/// Log the start of an operation
///
/// ```
/// # use cmsnap_core::log_op_start;
/// log_op_start!("capture");
/// log_op_start!("capture", label = "before");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use cmsnap_core::log_op_end;
/// log_op_end!("capture", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// The error expression is borrowed and must convert into a
/// [`SnapError`](crate::errors::SnapError) reference.
///
/// ```
/// # use cmsnap_core::log_op_error;
/// # use cmsnap_core::errors::{SnapError, SnapErrorKind};
/// let err = SnapError::new(SnapErrorKind::NotFound);
/// log_op_error!("latest", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let snap_err: &$crate::errors::SnapError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?snap_err.kind(),
            err_code = snap_err.code(),
            message = %snap_err,
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let snap_err: &$crate::errors::SnapError = $err;
        tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?snap_err.kind(),
            err_code = snap_err.code(),
            message = %snap_err,
            $($field)*
        );
    }};
}
