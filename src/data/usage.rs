use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::{
        table,
        usage::{UsageCounter, UsageStats},
    },
};

pub struct UsageRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> UsageRepository<'a> {
    /// Creates a new instance of [`UsageRepository`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Today's usage from the `daily_usage_stats` view. `None` means no stats yet.
    pub async fn daily_stats(&self, user_id: i32) -> Result<Option<UsageStats>, BackendError> {
        self.client
            .from(table::DAILY_USAGE_STATS)
            .select("*")
            .eq("user_id", user_id)
            .maybe_single()
            .await
    }

    /// The latest `limit` ledger rows, newest period first.
    pub async fn counters(
        &self,
        user_id: i32,
        limit: usize,
    ) -> Result<Vec<UsageCounter>, BackendError> {
        self.client
            .from(table::USAGE_COUNTER)
            .select("*")
            .eq("user_id", user_id)
            .order("period_start", false)
            .limit(limit)
            .fetch()
            .await
    }
}
