//! Domain-specific assertion macros for capjobs harnesses.
//!
//! These add context-rich failure messages that make it clear which response
//! was wrong and what the server actually sent back.

// ---------------------------------------------------------------------------
// Status assertions
// ---------------------------------------------------------------------------

/// Assert that a `TestResponse` has the expected status, printing the body on
/// failure.
///
/// ```rust
/// assert_status!(response, StatusCode::NOT_FOUND);
/// ```
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {{
        let response: &$crate::common::TestResponse = &$response;
        let expected: axum::http::StatusCode = $status;
        if response.status != expected {
            panic!(
                "assert_status! failed:\n  expected: {}\n  actual:   {}\n  body: {}",
                expected,
                response.status,
                response.text()
            );
        }
    }};
}

/// Assert that an error response carries the expected status and `detail`.
///
/// ```rust
/// assert_error!(response, StatusCode::UNPROCESSABLE_ENTITY, "Invalid keyword: 'java'");
/// ```
#[macro_export]
macro_rules! assert_error {
    ($response:expr, $status:expr, $detail:expr) => {{
        let response: &$crate::common::TestResponse = &$response;
        $crate::assert_status!(*response, $status);
        let expected: &str = $detail;
        let actual = response.detail();
        if actual != expected {
            panic!(
                "assert_error! failed on detail:\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            );
        }
    }};
}
