//! Integration test harness
//!
//! Tests live in the integration/ directory and drive full crawl runs
//! against wiremock servers.

#[path = "integration/crawl_tests.rs"]
mod crawl_tests;
