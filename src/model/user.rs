use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    auth::{Identity, SignUpDetails},
    one_or_many,
};

pub const DEFAULT_ROLE: &str = "Free";
pub const DEFAULT_PLAN: &str = "Free";
pub const SUBSCRIPTION_DAYS: u64 = 365;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub user_id: i32,
    pub role_id: i32,
    pub email: String,
    pub username: String,
    pub status: String,
    pub auth_user_id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub role_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub subscription_id: i32,
    pub user_id: i32,
    pub plan_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    #[serde(default)]
    pub auto_renew: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

/// Application-level profile for an identity, joined with its role and subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserRow,
    pub role: Role,
    #[serde(default, deserialize_with = "one_or_many")]
    pub subscription: Vec<Subscription>,
}

impl UserProfile {
    pub fn active_subscription(&self) -> Option<&Subscription> {
        self.subscription.iter().find(|s| s.is_active())
    }

    pub fn plan_name(&self) -> Option<&str> {
        self.active_subscription()
            .and_then(|s| s.plan.as_ref())
            .map(|plan| plan.name.as_str())
    }

    pub fn display_name(&self) -> String {
        match (&self.user.first_name, &self.user.last_name) {
            (Some(first), Some(last)) if !last.is_empty() => format!("{} {}", first, last),
            (Some(first), _) => first.clone(),
            _ => self.user.username.clone(),
        }
    }
}

/// Names used to seed a new profile row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSeed {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

impl ProfileSeed {
    /// Seed from auth metadata, falling back to "User", "" and the email's local part.
    pub fn from_identity(identity: &Identity) -> Self {
        let metadata = &identity.user_metadata;
        let username = metadata
            .username
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| {
                identity
                    .email
                    .as_deref()
                    .and_then(|email| email.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "user".to_string());

        Self {
            first_name: metadata
                .first_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "User".to_string()),
            last_name: metadata.last_name.clone().unwrap_or_default(),
            username,
        }
    }
}

impl From<&SignUpDetails> for ProfileSeed {
    fn from(details: &SignUpDetails) -> Self {
        Self {
            first_name: details.first_name.clone(),
            last_name: details.last_name.clone(),
            username: details.username.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUserProfile {
    pub auth_user_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role_id: i32,
    pub status: String,
}

impl NewUserProfile {
    pub fn new(identity: &Identity, seed: ProfileSeed, role_id: i32) -> Self {
        Self {
            auth_user_id: identity.id.clone(),
            email: identity.email().to_string(),
            username: seed.username,
            first_name: seed.first_name,
            last_name: seed.last_name,
            role_id,
            status: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSubscription {
    pub user_id: i32,
    pub plan_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub auto_renew: bool,
}

impl NewSubscription {
    /// An active, non-renewing subscription covering one year from `today`.
    pub fn one_year(user_id: i32, plan_id: i32, today: NaiveDate) -> Self {
        let end_date = today
            .checked_add_days(Days::new(SUBSCRIPTION_DAYS))
            .unwrap_or(NaiveDate::MAX);

        Self {
            user_id,
            plan_id,
            start_date: today,
            end_date,
            status: "active".to_string(),
            auto_renew: false,
        }
    }
}

/// Profile fields a user may change themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.avatar_url.is_none()
    }
}
