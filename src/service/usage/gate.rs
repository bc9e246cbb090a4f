//! Today's usage and the email verification flag, shared by the session manager and
//! every accessor it hands out so they all gate scans on the same figures.

use std::sync::Arc;

use tokio::sync::watch;

use crate::{
    error::usage::UsageError,
    model::usage::{PlanLimits, UsageStats},
    service::usage::UsagePolicy,
};

#[derive(Clone)]
pub struct UsageGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    stats: watch::Sender<Option<UsageStats>>,
    email_verified: watch::Sender<bool>,
}

impl PartialEq for UsageGate {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl UsageGate {
    /// Creates a new instance of [`UsageGate`] with no stats
    pub fn new(email_verified: bool) -> Self {
        Self {
            inner: Arc::new(GateInner {
                stats: watch::channel(None).0,
                email_verified: watch::channel(email_verified).0,
            }),
        }
    }

    pub fn stats(&self) -> Option<UsageStats> {
        self.inner.stats.borrow().clone()
    }

    pub fn set_stats(&self, stats: Option<UsageStats>) {
        self.inner.stats.send_replace(stats);
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<Option<UsageStats>> {
        self.inner.stats.subscribe()
    }

    pub fn email_verified(&self) -> bool {
        *self.inner.email_verified.borrow()
    }

    pub fn set_email_verified(&self, verified: bool) {
        self.inner.email_verified.send_if_modified(|current| {
            let changed = *current != verified;
            *current = verified;
            changed
        });
    }

    /// Forget the signed-out user's figures.
    pub fn clear(&self) {
        self.set_stats(None);
        self.set_email_verified(false);
    }

    /// Refuse a scan with the reason the gate is closed.
    pub fn check(&self) -> Result<(), UsageError> {
        if !self.email_verified() {
            return Err(UsageError::EmailNotVerified);
        }

        let stats = self.inner.stats.borrow();
        match stats.as_ref() {
            None => Err(UsageError::StatsUnavailable),
            Some(stats) if UsagePolicy::limit_reached(Some(stats)) => Err(UsageError::LimitReached),
            Some(_) => Ok(()),
        }
    }

    pub fn can_perform_scan(&self) -> bool {
        UsagePolicy::can_perform_scan(self.email_verified(), self.inner.stats.borrow().as_ref())
    }

    pub fn remaining_scans(&self) -> i32 {
        UsagePolicy::remaining_scans(self.inner.stats.borrow().as_ref())
    }

    pub fn usage_percentage(&self) -> u8 {
        UsagePolicy::usage_percentage(self.inner.stats.borrow().as_ref())
    }

    pub fn plan_limits(&self) -> Option<PlanLimits> {
        UsagePolicy::plan_limits(self.inner.stats.borrow().as_ref())
    }
}
