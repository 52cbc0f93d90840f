#![allow(clippy::unwrap_used, clippy::expect_used)]

use cmsnap_core::errors::{SnapError, SnapErrorKind};
use cmsnap_core::logging_facility::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_DURATION_MS, FIELD_ERR_CODE, FIELD_ERR_KIND,
    FIELD_LABEL, FIELD_RESOURCE_COUNT,
};
use cmsnap_core::logging_facility::test_capture::init_test_capture;
use cmsnap_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, label = "before");

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[0].field(FIELD_LABEL), Some("before"));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one end event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[0].field(FIELD_DURATION_MS), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = SnapError::new(SnapErrorKind::NotFound).with_message("no before snapshot");
    log_op_error!(op_name, &err, duration_ms = 10);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 1, "Should have exactly one error event");
    assert_eq!(events[0].event.as_deref(), Some(EVENT_END_ERROR));
    assert_eq!(events[0].field(FIELD_ERR_CODE), Some("ERR_NOT_FOUND"));
    assert_eq!(events[0].field(FIELD_ERR_KIND), Some("NotFound"));
    assert_eq!(events[0].level, tracing::Level::ERROR);
}

#[test]
fn test_start_end_pair_is_ordered() {
    let capture = init_test_capture();
    let op_name = "test_start_end_pair_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1, resource_count = 3);

    let events = capture.events_for_op(op_name);
    let kinds: Vec<_> = events.iter().map(|e| e.event.clone().unwrap()).collect();
    assert_eq!(kinds, vec![EVENT_START.to_string(), EVENT_END.to_string()]);
    assert_eq!(events[1].field(FIELD_RESOURCE_COUNT), Some("3"));
}
