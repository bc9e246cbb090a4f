//! Tests for Diagnostics::run.
//!
//! This module verifies the full sequence of environment, network and table checks
//! against a healthy backend and one whose tables are not readable.

use linkshield::service::diagnostic::{DiagnosticStatus, Diagnostics};
use linkshield_test_utils::prelude::*;
use mockito::Matcher;
use serde_json::json;

use crate::util::config;

/// Tests every check against a healthy backend.
///
/// Verifies the order of results and that only the plain HTTP URL is flagged.
///
/// Expected: URL info, then success for key, network and both tables
#[tokio::test]
async fn healthy_backend_passes() {
    let mut test = TestSetup::new().await;
    let health = test.auth().create_health_endpoint(200);
    let roles = test
        .server
        .mock("GET", "/rest/v1/role")
        .match_query(Matcher::UrlEncoded("limit".to_string(), "1".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([factory::role(FREE_ROLE_ID, "Free")]).to_string())
        .create();
    let plans = test
        .server
        .mock("GET", "/rest/v1/plan")
        .match_query(Matcher::UrlEncoded("limit".to_string(), "1".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([factory::plan(FREE_PLAN_ID, "Free", 0.0)]).to_string())
        .create();

    let results = Diagnostics::new(&config(&test)).run().await;

    health.assert();
    roles.assert();
    plans.assert();
    let tests: Vec<&str> = results.iter().map(|r| r.test.as_str()).collect();
    assert_eq!(
        tests,
        vec!["Backend URL", "API key", "Network", "Table role", "Table plan"]
    );
    assert_eq!(results[0].status, DiagnosticStatus::Info);
    assert!(results[1..].iter().all(|r| r.is_success()));
}

/// Tests a backend that answers health checks but refuses table reads.
///
/// Expected: network succeeds, both table checks report errors
#[tokio::test]
async fn unreadable_tables_are_reported() {
    let mut test = TestSetup::new().await;
    let _health = test.auth().create_health_endpoint(200);
    let _denied = test
        .server
        .mock("GET", Matcher::Regex(r"^/rest/v1/(role|plan)".to_string()))
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(json!({ "message": "Invalid API key" }).to_string())
        .create();

    let results = Diagnostics::new(&config(&test)).run().await;

    let network = results.iter().find(|r| r.test == "Network").unwrap();
    assert!(network.is_success());
    let tables: Vec<_> = results
        .iter()
        .filter(|r| r.test.starts_with("Table"))
        .collect();
    assert_eq!(tables.len(), 2);
    assert!(tables.iter().all(|r| r.status == DiagnosticStatus::Error));
    assert!(tables[0].message.contains("Invalid API key"));
}
