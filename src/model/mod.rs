//! Row and wire types for the hosted backend.
//!
//! Field names match the store's column names so rows deserialize directly from REST
//! responses and change-feed payloads.

pub mod auth;
pub mod form;
pub mod history;
pub mod scan;
pub mod usage;
pub mod user;
pub mod view;

use serde::{Deserialize, Deserializer};

/// Table and view names exposed by the REST layer.
pub mod table {
    pub const USERS: &str = "users";
    pub const ROLE: &str = "role";
    pub const PLAN: &str = "plan";
    pub const SUBSCRIPTION: &str = "subscription";
    pub const SCAN: &str = "scan";
    pub const HISTORY: &str = "history";
    pub const USAGE_COUNTER: &str = "usagecounter";
    pub const DAILY_USAGE_STATS: &str = "daily_usage_stats";
    pub const ACTIVE_SUBSCRIPTIONS: &str = "active_subscriptions";
    pub const USER_SCAN_SUMMARY: &str = "user_scan_summary";
}

/// A row identified by an integer primary key.
///
/// `KEY_FIELD` names the primary key column so delete events, which only carry the old
/// key, can be matched against local rows.
pub trait Keyed {
    const KEY_FIELD: &'static str;

    fn key(&self) -> i32;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Deserialize an embedded relation that may come back as `null`, an object or an array.
///
/// The REST layer embeds to-one relations as objects and to-many relations as arrays;
/// which one a join produces depends on the foreign key's uniqueness.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value = Option::<OneOrMany<T>>::deserialize(deserializer)?;

    Ok(match value {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

/// Like [`one_or_many`] but keeps only the first related row.
pub(crate) fn first_of_many<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(one_or_many(deserializer)?.into_iter().next())
}
