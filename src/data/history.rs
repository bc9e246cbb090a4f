use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::{
        history::{HistoryChanges, HistoryEntry, HistoryRow, NewHistoryEntry},
        table,
    },
};

/// History row joined with its scan and the scan's reports.
pub const HISTORY_SELECT: &str =
    "*,scan:scan(*,detailedreport(*,scorereport(*)),threatsummary(*))";

pub struct HistoryRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> HistoryRepository<'a> {
    /// Creates a new instance of [`HistoryRepository`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// All saved scans for a user, most recently saved first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<HistoryEntry>, BackendError> {
        self.client
            .from(table::HISTORY)
            .select(HISTORY_SELECT)
            .eq("user_id", user_id)
            .order("saved_at", false)
            .fetch()
            .await
    }

    /// Creates a new history row
    pub async fn create(&self, entry: &NewHistoryEntry) -> Result<HistoryRow, BackendError> {
        self.client.from(table::HISTORY).insert(entry).await
    }

    /// Apply changes to the user's history rows for a scan, returning the updated rows.
    pub async fn update(
        &self,
        user_id: i32,
        scan_id: i32,
        changes: &HistoryChanges,
    ) -> Result<Vec<HistoryEntry>, BackendError> {
        self.client
            .from(table::HISTORY)
            .select(HISTORY_SELECT)
            .eq("user_id", user_id)
            .eq("scan_id", scan_id)
            .update(changes)
            .await
    }

    /// Delete the user's history rows for a scan.
    pub async fn delete(&self, user_id: i32, scan_id: i32) -> Result<(), BackendError> {
        self.client
            .from(table::HISTORY)
            .eq("user_id", user_id)
            .eq("scan_id", scan_id)
            .delete()
            .await
    }
}
