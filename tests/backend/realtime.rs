//! Tests for RealtimeClient::subscribe against a local websocket server.
//!
//! This module verifies the join frame, delivery of decoded row changes in order, that
//! malformed frames are skipped while a server-side close ends the feed, and that
//! closing the feed leaves the channel.

use linkshield::{
    backend::{
        realtime::{ChangeEvent, ChangeFilter},
        BackendClient,
    },
    config::Config,
    model::history::HistoryRow,
};
use linkshield_test_utils::prelude::*;
use serde_json::json;

use crate::util::{realtime::FakeRealtime, SETTLE_TIMEOUT};

fn history_client(realtime: &FakeRealtime) -> BackendClient {
    BackendClient::new(&Config::new(realtime.url(), TEST_ANON_KEY))
}

/// Tests joining a filtered channel.
///
/// Verifies the topic, table, filter and anon token sent in the join frame.
///
/// Expected: a single join for `realtime:history_7`
#[tokio::test]
async fn join_carries_table_and_filter() -> Result<(), TestError> {
    let mut realtime = FakeRealtime::start().await?;
    let client = history_client(&realtime);

    let feed = client
        .realtime()
        .subscribe::<HistoryRow>("history_7", "history", Some(ChangeFilter::eq("user_id", 7)))
        .await
        .expect("subscription should connect");
    let join = realtime.next_join().await;

    assert_eq!(feed.topic(), "realtime:history_7");
    assert_eq!(join["topic"], "realtime:history_7");
    assert_eq!(join["event"], "phx_join");
    let change = &join["payload"]["config"]["postgres_changes"][0];
    assert_eq!(change["table"], "history");
    assert_eq!(change["filter"], "user_id=eq.7");
    assert_eq!(join["payload"]["access_token"], TEST_ANON_KEY);

    Ok(())
}

/// Tests change delivery order.
///
/// Verifies that changes arrive in the order the server pushed them, skipping a
/// malformed frame and frames for other topics.
///
/// Expected: Insert, Update, then Delete carrying the key
#[tokio::test]
async fn delivers_changes_in_order() -> Result<(), TestError> {
    let mut realtime = FakeRealtime::start().await?;
    let client = history_client(&realtime);

    let mut feed = client
        .realtime()
        .subscribe::<HistoryRow>("history_7", "history", None)
        .await
        .expect("subscription should connect");
    realtime.next_join().await;

    let topic = "realtime:history_7";
    realtime.push_change(
        topic,
        "INSERT",
        "history",
        Some(factory::history(11, TEST_USER_ID, 4, false)),
        None,
    );
    realtime.push_text("not json");
    realtime.push_change(
        "realtime:other",
        "INSERT",
        "history",
        Some(factory::history(99, TEST_USER_ID, 5, false)),
        None,
    );
    realtime.push_change(
        topic,
        "UPDATE",
        "history",
        Some(factory::history(11, TEST_USER_ID, 4, true)),
        Some(json!({ "history_id": 11 })),
    );
    realtime.push_change(topic, "DELETE", "history", None, Some(json!({ "history_id": 11 })));

    let mut events = Vec::new();
    for _ in 0..3 {
        let event = tokio::time::timeout(SETTLE_TIMEOUT, feed.recv())
            .await
            .expect("Timed out waiting for a change");
        events.push(event.expect("feed ended early"));
    }

    assert!(matches!(&events[0], ChangeEvent::Insert(row) if row.history_id == 11 && !row.is_favorite));
    assert!(matches!(&events[1], ChangeEvent::Update(row) if row.is_favorite));
    assert_eq!(events[2], ChangeEvent::Delete(11));

    Ok(())
}

/// Tests the server closing the channel.
///
/// Expected: the feed ends and reports closed
#[tokio::test]
async fn server_close_ends_feed() -> Result<(), TestError> {
    let mut realtime = FakeRealtime::start().await?;
    let client = history_client(&realtime);

    let mut feed = client
        .realtime()
        .subscribe::<HistoryRow>("history_7", "history", None)
        .await
        .expect("subscription should connect");
    realtime.next_join().await;

    realtime.close_channel("realtime:history_7");
    let next = tokio::time::timeout(SETTLE_TIMEOUT, feed.recv())
        .await
        .expect("Timed out waiting for the feed to end");

    assert!(next.is_none());
    assert!(feed.is_closed());

    Ok(())
}

/// Tests closing the feed from the client side.
///
/// Verifies that the channel is left with the next message reference before the
/// socket closes.
///
/// Expected: a leave for `realtime:history_7` with reference 2
#[tokio::test]
async fn close_leaves_channel() -> Result<(), TestError> {
    let mut realtime = FakeRealtime::start().await?;
    let client = history_client(&realtime);

    let feed = client
        .realtime()
        .subscribe::<HistoryRow>("history_7", "history", None)
        .await
        .expect("subscription should connect");
    realtime.next_join().await;

    feed.close();
    let leave = realtime.next_leave().await;

    assert!(feed.is_closed());
    assert_eq!(leave["topic"], "realtime:history_7");
    assert_eq!(leave["ref"], "2");

    Ok(())
}

/// Tests subscribing when nothing is listening.
///
/// Expected: Err classified as a connectivity failure
#[tokio::test]
async fn unreachable_server_is_error() {
    let client = BackendClient::new(&Config::new("http://127.0.0.1:9", TEST_ANON_KEY));

    let result = client
        .realtime()
        .subscribe::<HistoryRow>("history_7", "history", None)
        .await;

    let err = result.err().expect("subscription should fail");
    assert_eq!(err.kind(), linkshield::error::ErrorKind::Connectivity);
}
