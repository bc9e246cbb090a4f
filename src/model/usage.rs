use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Keyed;

/// Sentinel `daily_scan_limit` for plans without a daily cap.
pub const UNLIMITED: i32 = -1;

/// A row of the `daily_usage_stats` view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStats {
    pub user_id: i32,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub plan_name: Option<String>,
    pub daily_scan_limit: i32,
    #[serde(default)]
    pub scans_used_today: i32,
    #[serde(default)]
    pub remaining_scans: i32,
    #[serde(default)]
    pub limit_reached: bool,
}

impl UsageStats {
    pub fn is_unlimited(&self) -> bool {
        self.daily_scan_limit == UNLIMITED
    }

    pub fn daily_limit(&self) -> DailyLimit {
        if self.daily_scan_limit < 0 {
            DailyLimit::Unlimited
        } else {
            DailyLimit::Limited(self.daily_scan_limit)
        }
    }
}

/// A row of the usage ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageCounter {
    pub usage_id: i32,
    pub user_id: i32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default)]
    pub scans_used: i32,
    #[serde(default)]
    pub api_calls_used: i32,
    #[serde(default)]
    pub last_reset: Option<DateTime<Utc>>,
}

impl Keyed for UsageCounter {
    const KEY_FIELD: &'static str = "usage_id";

    fn key(&self) -> i32 {
        self.usage_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DailyLimit {
    Unlimited,
    Limited(i32),
}

impl fmt::Display for DailyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("Unlimited"),
            Self::Limited(limit) => write!(f, "{}", limit),
        }
    }
}

/// Summary of the current plan's daily allowance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanLimits {
    pub daily: DailyLimit,
    pub used: i32,
    pub remaining: i32,
    pub plan: String,
}
