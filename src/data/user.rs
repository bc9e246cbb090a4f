use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::{
        table,
        user::{NewUserProfile, ProfileChanges, UserProfile, UserRow},
    },
};

/// Profile row joined with its role and subscriptions (with plan).
pub const PROFILE_SELECT: &str = "*,role:role(*),subscription:subscription(*,plan:plan(*))";

pub struct UserRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> UserRepository<'a> {
    /// Creates a new instance of [`UserRepository`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    /// Find the profile owned by an auth identity, joined with role and subscriptions.
    pub async fn find_by_auth_id(
        &self,
        auth_user_id: &str,
    ) -> Result<Option<UserProfile>, BackendError> {
        self.client
            .from(table::USERS)
            .select(PROFILE_SELECT)
            .eq("auth_user_id", auth_user_id)
            .maybe_single()
            .await
    }

    /// Creates a new profile row
    pub async fn create(&self, profile: &NewUserProfile) -> Result<UserRow, BackendError> {
        self.client.from(table::USERS).insert(profile).await
    }

    /// Apply profile changes, returning the updated row or `None` if no row matched.
    pub async fn update(
        &self,
        user_id: i32,
        changes: &ProfileChanges,
    ) -> Result<Option<UserRow>, BackendError> {
        let rows: Vec<UserRow> = self
            .client
            .from(table::USERS)
            .eq("user_id", user_id)
            .update(changes)
            .await?;

        Ok(rows.into_iter().next())
    }
}
