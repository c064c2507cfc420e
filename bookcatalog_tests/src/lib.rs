//! System and load tests for a running bookcatalog_service deployment.
//! The service url is taken from `BOOKCATALOG_URL`, defaulting to a local instance.

pub const DEFAULT_BOOKCATALOG_URL: &str = "http://127.0.0.1:3000";

pub fn bookcatalog_url() -> String {
    std::env::var("BOOKCATALOG_URL").unwrap_or_else(|_| DEFAULT_BOOKCATALOG_URL.to_string())
}

#[cfg(all(test, feature = "system_tests"))]
mod system_tests;
