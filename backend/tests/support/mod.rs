//! Shared helpers for the backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so
//! the helpers live here and are pulled in with `mod support;`.

pub mod embedded_postgres;

/// Returns true when `SKIP_TEST_CLUSTER` is set to a truthy value
/// ("1", "true" or "yes", case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Handles embedded cluster setup failures consistently.
///
/// When `SKIP_TEST_CLUSTER` is truthy, prints a skip marker and returns
/// `None`. Otherwise panics so a broken cluster fails the run instead of
/// passing silently.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
