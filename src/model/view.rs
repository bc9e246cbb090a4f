use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row of the `active_subscriptions` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSubscription {
    pub subscription_id: i32,
    pub user_id: i32,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A row of the `user_scan_summary` view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserScanSummary {
    pub user_id: i32,
    #[serde(default)]
    pub total_scans: i64,
    #[serde(default)]
    pub completed_scans: i64,
    #[serde(default)]
    pub failed_scans: i64,
    #[serde(default)]
    pub favorite_count: i64,
}
