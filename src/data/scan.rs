use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::{
        scan::{NewScan, Scan, ScanStatusUpdate, ScanWithDetails},
        table,
        view::UserScanSummary,
    },
};

/// Scan row joined with its reports.
pub const SCAN_DETAILS_SELECT: &str = "*,detailedreport(*,scorereport(*)),threatsummary(*)";

pub struct ScanRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> ScanRepository<'a> {
    /// Creates a new instance of [`ScanRepository`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// All scans for a user, newest submission first.
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<ScanWithDetails>, BackendError> {
        self.client
            .from(table::SCAN)
            .select(SCAN_DETAILS_SELECT)
            .eq("user_id", user_id)
            .order("submitted_at", false)
            .fetch()
            .await
    }

    pub async fn find_with_details(
        &self,
        scan_id: i32,
    ) -> Result<Option<ScanWithDetails>, BackendError> {
        self.client
            .from(table::SCAN)
            .select(SCAN_DETAILS_SELECT)
            .eq("scan_id", scan_id)
            .maybe_single()
            .await
    }

    /// Creates a new scan row
    pub async fn create(&self, scan: &NewScan) -> Result<Scan, BackendError> {
        self.client.from(table::SCAN).insert(scan).await
    }

    /// Apply a status transition, returning the updated row or `None` if no row matched.
    pub async fn update_status(
        &self,
        scan_id: i32,
        update: &ScanStatusUpdate,
    ) -> Result<Option<Scan>, BackendError> {
        let rows: Vec<Scan> = self
            .client
            .from(table::SCAN)
            .eq("scan_id", scan_id)
            .update(update)
            .await?;

        Ok(rows.into_iter().next())
    }

    /// Totals from the `user_scan_summary` view.
    pub async fn summary(&self, user_id: i32) -> Result<Option<UserScanSummary>, BackendError> {
        self.client
            .from(table::USER_SCAN_SUMMARY)
            .select("*")
            .eq("user_id", user_id)
            .maybe_single()
            .await
    }
}
