//! Tests for HistoryService favorites and saved scans.
//!
//! This module verifies that toggling a favorite twice restores the original state and
//! that saving and removing a scan keep the local history in step with the backend.

use linkshield::{error::Error, service::history::HistoryService};
use linkshield_test_utils::prelude::*;
use serde_json::json;

use crate::util::client;

/// Tests toggling the same favorite twice.
///
/// Verifies that each toggle writes the flipped flag and the second one restores the
/// entry as it was loaded.
///
/// Expected: Ok, entry back to not favorite
#[tokio::test]
async fn toggling_twice_restores_state() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let original = factory::history_entry(1, TEST_USER_ID, 4, false);
    let _list = test.rest().create_rows_endpoint(
        "history",
        "user_id",
        &TEST_USER_ID.to_string(),
        vec![original.clone()],
        1,
    );
    let favorite = test.rest().create_update_endpoint(
        "history",
        "scan_id",
        "4",
        json!({ "is_favorite": true }),
        vec![factory::history_entry(1, TEST_USER_ID, 4, true)],
        1,
    );
    let unfavorite = test.rest().create_update_endpoint(
        "history",
        "scan_id",
        "4",
        json!({ "is_favorite": false }),
        vec![original],
        1,
    );

    let history = HistoryService::new(client(&test), TEST_USER_ID);
    let loaded = history.fetch_history().await?;

    history.toggle_favorite(4).await?;
    assert_eq!(history.favorites().len(), 1);

    history.toggle_favorite(4).await?;

    favorite.assert();
    unfavorite.assert();
    assert!(history.favorites().is_empty());
    assert_eq!(history.history(), loaded);

    Ok(())
}

/// Tests saving a scan and then removing it.
///
/// Verifies that saving re-reads the joined history and removal drops the entry
/// locally.
///
/// Expected: one entry after saving, none after removal
#[tokio::test]
async fn save_then_remove() -> Result<(), Error> {
    let mut test = TestSetup::new().await;
    let insert = test.rest().create_insert_endpoint(
        "history",
        json!({ "user_id": TEST_USER_ID, "scan_id": 4, "notes": "check later", "is_favorite": false }),
        factory::history(1, TEST_USER_ID, 4, false),
        1,
    );
    let list = test.rest().create_rows_endpoint(
        "history",
        "user_id",
        &TEST_USER_ID.to_string(),
        vec![factory::history_entry(1, TEST_USER_ID, 4, false)],
        1,
    );
    let delete = test
        .rest()
        .create_delete_endpoint("history", "scan_id", "4", 1);

    let history = HistoryService::new(client(&test), TEST_USER_ID);

    let row = history.add_to_history(4, Some("check later"), false).await?;
    assert_eq!(row.history_id, 1);
    assert_eq!(history.history().len(), 1);
    assert!(history.history()[0].scan.is_some());

    history.remove_from_history(4).await?;

    insert.assert();
    list.assert();
    delete.assert();
    assert!(history.history().is_empty());

    Ok(())
}
