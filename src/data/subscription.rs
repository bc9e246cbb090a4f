use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::{
        table,
        user::{NewSubscription, Subscription},
        view::ActiveSubscription,
    },
};

pub struct SubscriptionRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> SubscriptionRepository<'a> {
    /// Creates a new instance of [`SubscriptionRepository`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Creates a new subscription row
    pub async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, BackendError> {
        self.client.from(table::SUBSCRIPTION).insert(subscription).await
    }

    /// Active subscriptions for an email address, from the `active_subscriptions` view.
    pub async fn active_by_email(
        &self,
        email: &str,
    ) -> Result<Vec<ActiveSubscription>, BackendError> {
        self.client
            .from(table::ACTIVE_SUBSCRIPTIONS)
            .select("*")
            .eq("email", email)
            .fetch()
            .await
    }
}
