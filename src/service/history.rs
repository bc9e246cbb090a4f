//! History accessor: the user's saved scans with notes and favorites.

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
    data::history::HistoryRepository,
    error::Error,
    model::{
        history::{HistoryChanges, HistoryEntry, HistoryRow, NewHistoryEntry},
        table,
    },
    service::{collection::LiveCollection, spawn_change_loop},
};

#[derive(Clone)]
pub struct HistoryService {
    inner: Arc<HistoryInner>,
}

struct HistoryInner {
    client: BackendClient,
    user_id: i32,
    entries: watch::Sender<LiveCollection<HistoryEntry>>,
    cancel: CancellationToken,
}

impl PartialEq for HistoryService {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl HistoryService {
    /// Creates a new instance of [`HistoryService`] for one user
    pub fn new(client: BackendClient, user_id: i32) -> Self {
        Self::with_cancel(client, user_id, CancellationToken::new())
    }

    /// Like [`new`](Self::new) with the change feed stopped by `cancel`.
    pub fn with_cancel(client: BackendClient, user_id: i32, cancel: CancellationToken) -> Self {
        Self {
            inner: Arc::new(HistoryInner {
                client,
                user_id,
                entries: watch::channel(LiveCollection::default()).0,
                cancel,
            }),
        }
    }

    /// Read saved scans, most recently saved first, replacing the local list.
    pub async fn fetch_history(&self) -> Result<Vec<HistoryEntry>, Error> {
        let entries = HistoryRepository::new(&self.inner.client)
            .list_for_user(self.inner.user_id)
            .await?;

        tracing::debug!(user_id = self.inner.user_id, count = entries.len(), "Fetched history");
        self.inner
            .entries
            .send_replace(LiveCollection::new(entries.clone()));

        Ok(entries)
    }

    /// Save a scan, then re-read the history so the new entry carries its scan.
    pub async fn add_to_history(
        &self,
        scan_id: i32,
        notes: Option<&str>,
        is_favorite: bool,
    ) -> Result<HistoryRow, Error> {
        let entry = NewHistoryEntry {
            user_id: self.inner.user_id,
            scan_id,
            notes: notes.map(str::to_string),
            is_favorite,
            saved_at: Utc::now(),
        };

        let row = HistoryRepository::new(&self.inner.client)
            .create(&entry)
            .await?;
        self.fetch_history().await?;

        Ok(row)
    }

    pub async fn remove_from_history(&self, scan_id: i32) -> Result<(), Error> {
        HistoryRepository::new(&self.inner.client)
            .delete(self.inner.user_id, scan_id)
            .await?;

        self.inner
            .entries
            .send_if_modified(|entries| entries.remove_where(|entry| entry.row.scan_id == scan_id));

        Ok(())
    }

    /// Write notes and/or the favorite flag for a saved scan.
    pub async fn update_history_entry(
        &self,
        scan_id: i32,
        changes: &HistoryChanges,
    ) -> Result<Vec<HistoryEntry>, Error> {
        let updated = HistoryRepository::new(&self.inner.client)
            .update(self.inner.user_id, scan_id, changes)
            .await?;

        self.inner.entries.send_modify(|entries| {
            for entry in &updated {
                entries.upsert(entry.clone());
            }
        });

        Ok(updated)
    }

    /// Flip the favorite flag of a saved scan. Does nothing if the scan is not saved.
    pub async fn toggle_favorite(&self, scan_id: i32) -> Result<(), Error> {
        let current = self
            .inner
            .entries
            .borrow()
            .rows()
            .iter()
            .find(|entry| entry.row.scan_id == scan_id)
            .map(|entry| entry.row.is_favorite);

        let Some(is_favorite) = current else {
            tracing::debug!(scan_id, "Scan is not in history, nothing to toggle");
            return Ok(());
        };

        let changes = HistoryChanges {
            notes: None,
            is_favorite: Some(!is_favorite),
        };
        self.update_history_entry(scan_id, &changes).await?;

        Ok(())
    }

    pub fn favorites(&self) -> Vec<HistoryEntry> {
        self.inner
            .entries
            .borrow()
            .rows()
            .iter()
            .filter(|entry| entry.row.is_favorite)
            .cloned()
            .collect()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.entries.borrow().rows().to_vec()
    }

    pub fn subscribe(&self) -> watch::Receiver<LiveCollection<HistoryEntry>> {
        self.inner.entries.subscribe()
    }

    /// Apply a history table change. Inserts re-read the history to pick up the joined
    /// scan; updates and deletes apply locally.
    pub async fn apply_change(&self, event: ChangeEvent<HistoryRow>) {
        match event {
            ChangeEvent::Insert(_) => {
                if let Err(e) = self.fetch_history().await {
                    tracing::warn!(user_id = self.inner.user_id, error = %e, "Failed to refresh history");
                }
            }
            event => {
                self.inner
                    .entries
                    .send_if_modified(|entries| entries.apply(event));
            }
        }
    }

    /// Subscribe to the user's history changes until [`dispose`](Self::dispose).
    pub async fn start_change_feed(&self) -> Result<(), Error> {
        let channel = format!("history_{}", self.inner.user_id);
        let feed = self
            .inner
            .client
            .realtime()
            .subscribe::<HistoryRow>(
                &channel,
                table::HISTORY,
                Some(ChangeFilter::eq("user_id", self.inner.user_id)),
            )
            .await?;

        let service = self.clone();
        spawn_change_loop(feed, self.inner.cancel.clone(), move |event| {
            let service = service.clone();
            async move { service.apply_change(event).await }
        });

        Ok(())
    }

    pub fn dispose(&self) {
        self.inner.cancel.cancel();
    }
}
