// Path: crates/test_utils/src/assertions.rs
//! Assertion helpers for admission results.

use ante_types::error::{ErrorClass, TxError};

/// Asserts that `result` is an error of `class`.
#[macro_export]
macro_rules! assert_rejected {
    ($result:expr, $class:expr) => {{
        match &$result {
            Ok(_) => panic!("expected rejection of class {:?}, got acceptance", $class),
            Err(e) => $crate::assertions::check_class(&e.error, $class),
        }
    }};
}

/// Panics unless `error` belongs to `class`.
#[allow(clippy::panic)]
pub fn check_class(error: &TxError, class: ErrorClass) {
    if error.class() != class {
        panic!("expected {class:?}, got {:?}: {error}", error.class());
    }
}

/// Panics if `error` is an internal fault.
#[allow(clippy::panic)]
pub fn check_expected(error: &TxError) {
    if !error.class().is_expected() {
        panic!("internal fault reached the submitter: {error}");
    }
}
