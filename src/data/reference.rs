use crate::{
    backend::BackendClient,
    error::backend::BackendError,
    model::{
        table,
        user::{Plan, Role},
    },
};

/// Read-only lookups of roles and plans.
pub struct ReferenceRepository<'a> {
    client: &'a BackendClient,
}

impl<'a> ReferenceRepository<'a> {
    /// Creates a new instance of [`ReferenceRepository`]
    pub fn new(client: &'a BackendClient) -> Self {
        Self { client }
    }

    pub async fn role_by_name(&self, name: &str) -> Result<Option<Role>, BackendError> {
        self.client
            .from(table::ROLE)
            .select("*")
            .eq("name", name)
            .maybe_single()
            .await
    }

    pub async fn plan_by_name(&self, name: &str) -> Result<Option<Plan>, BackendError> {
        self.client
            .from(table::PLAN)
            .select("*")
            .eq("name", name)
            .maybe_single()
            .await
    }

    /// Read at most `limit` roles. Used to check the table is reachable.
    pub async fn roles(&self, limit: usize) -> Result<Vec<Role>, BackendError> {
        self.client
            .from(table::ROLE)
            .select("*")
            .limit(limit)
            .fetch()
            .await
    }

    /// Read at most `limit` plans. Used to check the table is reachable.
    pub async fn plans(&self, limit: usize) -> Result<Vec<Plan>, BackendError> {
        self.client
            .from(table::PLAN)
            .select("*")
            .limit(limit)
            .fetch()
            .await
    }
}
