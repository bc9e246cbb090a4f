//! Scan accessor for the signed-in user.
//!
//! Submits scan rows for the external scanning engine and mirrors their progress. The
//! engine itself runs elsewhere; this side only writes `pending` rows and observes.

use std::sync::Arc;

use chrono::Utc;
use dioxus_logger::tracing;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    backend::{
        realtime::{ChangeEvent, ChangeFilter},
        BackendClient,
    },
    data::{history::HistoryRepository, scan::ScanRepository},
    error::{Error, FieldErrors},
    model::{
        history::{HistoryRow, NewHistoryEntry},
        scan::{is_scannable_url, NewScan, Scan, ScanStatus, ScanStatusUpdate, ScanWithDetails},
        table,
        view::UserScanSummary,
    },
    service::{collection::LiveCollection, spawn_change_loop, usage::UsageGate},
};

#[derive(Clone)]
pub struct ScanService {
    inner: Arc<ScanInner>,
}

struct ScanInner {
    client: BackendClient,
    user_id: i32,
    gate: UsageGate,
    scans: watch::Sender<LiveCollection<ScanWithDetails>>,
    cancel: CancellationToken,
}

impl PartialEq for ScanService {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl ScanService {
    /// Creates a new instance of [`ScanService`] for one user, submitting only while
    /// `gate` allows it
    pub fn new(client: BackendClient, user_id: i32, gate: UsageGate) -> Self {
        Self::with_cancel(client, user_id, gate, CancellationToken::new())
    }

    /// Like [`new`](Self::new) with the change feed stopped by `cancel`.
    pub fn with_cancel(
        client: BackendClient,
        user_id: i32,
        gate: UsageGate,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner: Arc::new(ScanInner {
                client,
                user_id,
                gate,
                scans: watch::channel(LiveCollection::default()).0,
                cancel,
            }),
        }
    }

    /// Read the user's scans with their reports, newest submission first, replacing the
    /// local list.
    pub async fn fetch_scans(&self) -> Result<Vec<ScanWithDetails>, Error> {
        let scans = ScanRepository::new(&self.inner.client)
            .list_for_user(self.inner.user_id)
            .await?;

        tracing::debug!(user_id = self.inner.user_id, count = scans.len(), "Fetched scans");
        self.inner.scans.send_replace(LiveCollection::new(scans.clone()));

        Ok(scans)
    }

    /// Submit a URL for scanning as a `pending` row.
    ///
    /// Refused with [`UsageError`](crate::error::usage::UsageError) while the usage gate
    /// is closed.
    pub async fn submit_scan(&self, url: &str, scan_type: Option<&str>) -> Result<Scan, Error> {
        let url = url.trim();
        if !is_scannable_url(url) {
            let mut errors = FieldErrors::new();
            errors.insert(
                "url".to_string(),
                "Please enter a valid http or https URL".to_string(),
            );
            return Err(Error::Validation(errors));
        }

        self.inner.gate.check()?;

        let scan = ScanRepository::new(&self.inner.client)
            .create(&NewScan::pending(self.inner.user_id, url, scan_type, Utc::now()))
            .await?;

        tracing::info!(user_id = self.inner.user_id, scan_id = scan.scan_id, "Submitted scan");
        self.inner
            .scans
            .send_modify(|scans| scans.upsert(ScanWithDetails::from(scan.clone())));

        Ok(scan)
    }

    /// Move a scan to `status`, stamping the matching timestamps.
    ///
    /// Returns `None` when no row matched. [`ScanStatus::Unknown`] is refused before any
    /// request.
    pub async fn update_scan_status(
        &self,
        scan_id: i32,
        status: ScanStatus,
        progress: Option<i32>,
        error_message: Option<String>,
    ) -> Result<Option<Scan>, Error> {
        let Some(update) = ScanStatusUpdate::transition(status, progress, error_message, Utc::now())
        else {
            let mut errors = FieldErrors::new();
            errors.insert(
                "status".to_string(),
                format!("A scan cannot be moved to status {:?}", status.to_string()),
            );
            return Err(Error::Validation(errors));
        };
        let scan = ScanRepository::new(&self.inner.client)
            .update_status(scan_id, &update)
            .await?;

        match &scan {
            Some(scan) => {
                self.inner
                    .scans
                    .send_if_modified(|scans| scans.apply(ChangeEvent::Update(scan.clone())));
            }
            None => tracing::debug!(scan_id, "Status update matched no scan"),
        }

        Ok(scan)
    }

    pub async fn scan_details(&self, scan_id: i32) -> Result<Option<ScanWithDetails>, Error> {
        Ok(ScanRepository::new(&self.inner.client)
            .find_with_details(scan_id)
            .await?)
    }

    pub async fn save_to_history(
        &self,
        scan_id: i32,
        notes: Option<&str>,
    ) -> Result<HistoryRow, Error> {
        let entry = NewHistoryEntry {
            user_id: self.inner.user_id,
            scan_id,
            notes: notes.map(str::to_string),
            is_favorite: false,
            saved_at: Utc::now(),
        };

        Ok(HistoryRepository::new(&self.inner.client)
            .create(&entry)
            .await?)
    }

    pub async fn remove_from_history(&self, scan_id: i32) -> Result<(), Error> {
        Ok(HistoryRepository::new(&self.inner.client)
            .delete(self.inner.user_id, scan_id)
            .await?)
    }

    /// Totals for the account dashboard.
    pub async fn fetch_summary(&self) -> Result<Option<UserScanSummary>, Error> {
        Ok(ScanRepository::new(&self.inner.client)
            .summary(self.inner.user_id)
            .await?)
    }

    /// Apply a scan table change to the local list. Returns true when it changed.
    pub fn apply_change(&self, event: ChangeEvent<Scan>) -> bool {
        self.inner.scans.send_if_modified(|scans| scans.apply(event))
    }

    /// Subscribe to the user's scan changes until [`dispose`](Self::dispose).
    pub async fn start_change_feed(&self) -> Result<(), Error> {
        let channel = format!("scans_{}", self.inner.user_id);
        let feed = self
            .inner
            .client
            .realtime()
            .subscribe::<Scan>(
                &channel,
                table::SCAN,
                Some(ChangeFilter::eq("user_id", self.inner.user_id)),
            )
            .await?;

        let service = self.clone();
        spawn_change_loop(feed, self.inner.cancel.clone(), move |event| {
            service.apply_change(event);
            async {}
        });

        Ok(())
    }

    pub fn dispose(&self) {
        self.inner.cancel.cancel();
    }

    pub fn scans(&self) -> Vec<ScanWithDetails> {
        self.inner.scans.borrow().rows().to_vec()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveCollection<ScanWithDetails>> {
        self.inner.scans.subscribe()
    }
}
