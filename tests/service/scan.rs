//! Tests for ScanService against a live change feed.
//!
//! This module verifies that scans inserted and updated elsewhere reach the local list
//! through the change feed, and that disposing the service stops the feed.

use linkshield::{
    backend::BackendClient,
    config::Config,
    model::scan::ScanStatus,
    service::{scan::ScanService, usage::UsageGate},
};
use linkshield_test_utils::prelude::*;

use crate::util::{realtime::FakeRealtime, wait_for};

/// Tests a scan progressing through the change feed.
///
/// Verifies that the join filters on the user and that an insert followed by an update
/// leaves one completed scan.
///
/// Expected: one scan, completed
#[tokio::test]
async fn feed_tracks_scan_progress() -> Result<(), TestError> {
    let mut realtime = FakeRealtime::start().await?;
    let config = Config::new(realtime.url(), TEST_ANON_KEY);
    let scans = ScanService::new(BackendClient::new(&config), TEST_USER_ID, UsageGate::new(true));
    let mut changes = scans.subscribe();

    scans
        .start_change_feed()
        .await
        .expect("change feed should start");
    let join = realtime.next_join().await;
    let topic = join["topic"].as_str().unwrap_or_default().to_string();

    assert_eq!(topic, format!("realtime:scans_{}", TEST_USER_ID));
    assert_eq!(
        join["payload"]["config"]["postgres_changes"][0]["filter"],
        format!("user_id=eq.{}", TEST_USER_ID)
    );

    realtime.push_change(
        &topic,
        "INSERT",
        "scan",
        Some(factory::scan(9, TEST_USER_ID, "https://example.com", "pending")),
        None,
    );
    wait_for(&mut changes, |scans| scans.len() == 1).await;

    realtime.push_change(
        &topic,
        "UPDATE",
        "scan",
        Some(factory::scan(9, TEST_USER_ID, "https://example.com", "completed")),
        Some(serde_json::json!({ "scan_id": 9 })),
    );
    let latest = wait_for(&mut changes, |scans| {
        scans
            .get(9)
            .is_some_and(|scan| scan.scan.status == ScanStatus::Completed)
    })
    .await;

    assert_eq!(latest.len(), 1);
    assert_eq!(scans.scans()[0].scan.progress, 100);

    scans.dispose();

    Ok(())
}

/// Tests a delete pushed by the change feed.
///
/// Expected: the scan is removed from the list
#[tokio::test]
async fn feed_removes_deleted_scan() -> Result<(), TestError> {
    let mut realtime = FakeRealtime::start().await?;
    let config = Config::new(realtime.url(), TEST_ANON_KEY);
    let scans = ScanService::new(BackendClient::new(&config), TEST_USER_ID, UsageGate::new(true));
    let mut changes = scans.subscribe();

    scans
        .start_change_feed()
        .await
        .expect("change feed should start");
    let topic = format!("realtime:scans_{}", TEST_USER_ID);
    realtime.next_join().await;

    realtime.push_change(
        &topic,
        "INSERT",
        "scan",
        Some(factory::scan(9, TEST_USER_ID, "https://example.com", "pending")),
        None,
    );
    wait_for(&mut changes, |scans| scans.len() == 1).await;

    realtime.push_change(&topic, "DELETE", "scan", None, Some(serde_json::json!({ "scan_id": 9 })));
    wait_for(&mut changes, |scans| scans.is_empty()).await;

    assert!(scans.scans().is_empty());

    Ok(())
}
