use std::fmt::Display;

use serde::{de::DeserializeOwned, Serialize};

use crate::{backend::BackendClient, error::backend::BackendError};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";

/// A REST query against one table or view.
///
/// Filters, ordering and limits are collected as query parameters and sent by one of the
/// terminal methods ([`fetch`](Self::fetch), [`single`](Self::single), [`insert`](Self::insert),
/// ...).
pub struct TableQuery<'a> {
    client: &'a BackendClient,
    table: String,
    params: Vec<(String, String)>,
}

impl<'a> TableQuery<'a> {
    /// Creates a new instance of [`TableQuery`]
    pub fn new(client: &'a BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
            params: Vec::new(),
        }
    }

    /// Columns to return, including embedded relations such as `*,role:role(*)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    /// Filter rows where `column` equals `value`.
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.params.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.params
            .push(("order".to_string(), format!("{}.{}", column, direction)));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.params.push(("limit".to_string(), count.to_string()));
        self
    }

    /// Query parameters collected so far, in insertion order.
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    fn request(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        let url = self.client.url(&format!("/rest/v1/{}", self.table));
        let request = self.client.http().request(method, url).query(&self.params);

        self.client.authorize(request)
    }

    /// Return all matching rows.
    pub async fn fetch<T: DeserializeOwned>(self) -> Result<Vec<T>, BackendError> {
        let response = self.request(reqwest::Method::GET).send().await?;

        BackendClient::parse_response(response).await
    }

    /// Return exactly one row. Zero rows is a not-found [`BackendError::Api`].
    pub async fn single<T: DeserializeOwned>(self) -> Result<T, BackendError> {
        let response = self
            .request(reqwest::Method::GET)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .send()
            .await?;

        BackendClient::parse_response(response).await
    }

    /// Return one row, or `None` when nothing matched.
    pub async fn maybe_single<T: DeserializeOwned>(self) -> Result<Option<T>, BackendError> {
        match self.single().await {
            Ok(row) => Ok(Some(row)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Insert one row and return it as stored.
    pub async fn insert<B, T>(self, row: &B) -> Result<T, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(reqwest::Method::POST)
            .header("Prefer", RETURN_REPRESENTATION)
            .header(reqwest::header::ACCEPT, SINGLE_OBJECT)
            .json(row)
            .send()
            .await?;

        BackendClient::parse_response(response).await
    }

    /// Apply `changes` to every matching row and return the updated rows.
    pub async fn update<B, T>(self, changes: &B) -> Result<Vec<T>, BackendError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(reqwest::Method::PATCH)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(changes)
            .send()
            .await?;

        BackendClient::parse_response(response).await
    }

    /// Delete every matching row.
    pub async fn delete(self) -> Result<(), BackendError> {
        let response = self.request(reqwest::Method::DELETE).send().await?;

        BackendClient::ensure_success(response).await?;

        Ok(())
    }
}
