//! Usage accessor: today's usage, the usage ledger and live refresh.
//!
//! Today's figures live in a [`UsageGate`] shared with the session manager, and every
//! gating decision delegates to [`UsagePolicy`].

pub mod gate;
pub mod policy;

use std::sync::Arc;

use dioxus_logger::tracing;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::{
    backend::{
        realtime::{ChangeEvent, ChangeFilter},
        BackendClient,
    },
    data::usage::UsageRepository,
    error::Error,
    model::{
        table,
        usage::{PlanLimits, UsageCounter, UsageStats},
    },
    service::spawn_change_loop,
};

pub use gate::UsageGate;
pub use policy::UsagePolicy;

/// Number of ledger periods kept for the usage history chart.
pub const USAGE_HISTORY_LIMIT: usize = 12;

#[derive(Clone)]
pub struct UsageService {
    inner: Arc<UsageInner>,
}

struct UsageInner {
    client: BackendClient,
    user_id: i32,
    gate: UsageGate,
    history: watch::Sender<Vec<UsageCounter>>,
    error: watch::Sender<Option<String>>,
    cancel: CancellationToken,
}

impl PartialEq for UsageService {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl UsageService {
    /// Creates a new instance of [`UsageService`] for one user
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
            inner: Arc::new(UsageInner {
                client,
                user_id,
                gate,
                history: watch::channel(Vec::new()).0,
                error: watch::channel(None).0,
                cancel,
            }),
        }
    }

    /// Read today's usage. A missing row means no stats yet and is not an error.
    pub async fn fetch_usage_stats(&self) -> Result<Option<UsageStats>, Error> {
        let repository = UsageRepository::new(&self.inner.client);

        match repository.daily_stats(self.inner.user_id).await {
            Ok(stats) => {
                self.inner.error.send_replace(None);
                self.inner.gate.set_stats(stats.clone());

                Ok(stats)
            }
            Err(e) => {
                tracing::error!(user_id = self.inner.user_id, error = %e, "Failed to fetch usage stats");
                self.inner.error.send_replace(Some(e.user_message()));

                Err(e.into())
            }
        }
    }

    /// Read the latest ledger periods, newest first. Errors are logged and the previous
    /// history is kept.
    pub async fn fetch_usage_history(&self) -> Vec<UsageCounter> {
        let repository = UsageRepository::new(&self.inner.client);

        match repository
            .counters(self.inner.user_id, USAGE_HISTORY_LIMIT)
            .await
        {
            Ok(counters) => {
                self.inner.history.send_replace(counters.clone());
                counters
            }
            Err(e) => {
                tracing::error!(user_id = self.inner.user_id, error = %e, "Failed to fetch usage history");
                self.inner.history.borrow().clone()
            }
        }
    }

    /// Refresh after a ledger change. Inserts and updates re-read stats and history.
    pub async fn apply_change(&self, event: ChangeEvent<UsageCounter>) {
        match event {
            ChangeEvent::Insert(_) | ChangeEvent::Update(_) => {
                let _ = self.fetch_usage_stats().await;
                self.fetch_usage_history().await;
            }
            ChangeEvent::Delete(_) => {}
        }
    }

    /// Subscribe to the user's ledger changes until [`dispose`](Self::dispose).
    pub async fn start_change_feed(&self) -> Result<(), Error> {
        let channel = format!("usage_{}", self.inner.user_id);
        let feed = self
            .inner
            .client
            .realtime()
            .subscribe::<UsageCounter>(
                &channel,
                table::USAGE_COUNTER,
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

    /// Stop the change feed.
    pub fn dispose(&self) {
        self.inner.cancel.cancel();
    }

    pub fn usage_stats(&self) -> Option<UsageStats> {
        self.inner.gate.stats()
    }

    /// The gate this accessor writes today's figures to.
    pub fn gate(&self) -> &UsageGate {
        &self.inner.gate
    }

    pub fn usage_history(&self) -> Vec<UsageCounter> {
        self.inner.history.borrow().clone()
    }

    /// Banner message from the last failed stats read.
    pub fn error(&self) -> Option<String> {
        self.inner.error.borrow().clone()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<Option<UsageStats>> {
        self.inner.gate.subscribe_stats()
    }

    pub fn subscribe_history(&self) -> watch::Receiver<Vec<UsageCounter>> {
        self.inner.history.subscribe()
    }

    pub fn usage_percentage(&self) -> u8 {
        self.inner.gate.usage_percentage()
    }

    pub fn can_perform_scan(&self) -> bool {
        self.inner.gate.can_perform_scan()
    }

    pub fn remaining_scans(&self) -> i32 {
        self.inner.gate.remaining_scans()
    }

    pub fn plan_limits(&self) -> Option<PlanLimits> {
        self.inner.gate.plan_limits()
    }
}
