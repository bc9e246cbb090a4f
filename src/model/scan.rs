use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{first_of_many, one_or_many, Keyed};

pub const DEFAULT_SCAN_TYPE: &str = "full";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
    /// A status written by another client that this build does not know about.
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        };

        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scan {
    pub scan_id: i32,
    pub user_id: i32,
    pub url_scanned: String,
    #[serde(default = "default_scan_type")]
    pub scan_type: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ScanStatus,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub scan_duration_seconds: Option<f64>,
}

fn default_scan_type() -> String {
    DEFAULT_SCAN_TYPE.to_string()
}

impl Keyed for Scan {
    const KEY_FIELD: &'static str = "scan_id";

    fn key(&self) -> i32 {
        self.scan_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score_id: i32,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedReport {
    pub report_id: i32,
    pub scan_id: i32,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "first_of_many")]
    pub scorereport: Option<ScoreReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreatSummary {
    pub summary_id: i32,
    pub scan_id: i32,
    #[serde(default)]
    pub threat_type: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A scan joined with its read-only reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanWithDetails {
    #[serde(flatten)]
    pub scan: Scan,
    #[serde(default, deserialize_with = "first_of_many")]
    pub detailedreport: Option<DetailedReport>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub threatsummary: Vec<ThreatSummary>,
}

impl From<Scan> for ScanWithDetails {
    fn from(scan: Scan) -> Self {
        Self {
            scan,
            detailedreport: None,
            threatsummary: Vec::new(),
        }
    }
}

impl Keyed for ScanWithDetails {
    const KEY_FIELD: &'static str = Scan::KEY_FIELD;

    fn key(&self) -> i32 {
        self.scan.scan_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewScan {
    pub user_id: i32,
    pub url_scanned: String,
    pub scan_type: String,
    pub status: ScanStatus,
    pub progress: i32,
    pub submitted_at: DateTime<Utc>,
}

impl NewScan {
    pub fn pending(user_id: i32, url: &str, scan_type: Option<&str>, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            url_scanned: url.to_string(),
            scan_type: scan_type.unwrap_or(DEFAULT_SCAN_TYPE).to_string(),
            status: ScanStatus::Pending,
            progress: 0,
            submitted_at: now,
        }
    }
}

/// Column changes applied when a scan moves between statuses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanStatusUpdate {
    pub status: ScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ScanStatusUpdate {
    /// Build the columns written when a scan moves to `status`.
    ///
    /// Returns `None` for [`ScanStatus::Unknown`], which is only ever read.
    pub fn transition(
        status: ScanStatus,
        progress: Option<i32>,
        error_message: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let mut update = Self {
            status,
            progress: progress.map(|p| p.clamp(0, 100)),
            error_message,
            started_at: None,
            analyzed_at: None,
            completed_at: None,
        };

        match status {
            ScanStatus::Processing => update.started_at = Some(now),
            ScanStatus::Completed => {
                update.analyzed_at = Some(now);
                update.completed_at = Some(now);
                update.progress = Some(100);
            }
            ScanStatus::Failed => update.completed_at = Some(now),
            ScanStatus::Pending => {}
            ScanStatus::Unknown => return None,
        }

        Some(update)
    }
}

/// True for absolute `http` and `https` URLs.
pub fn is_scannable_url(url: &str) -> bool {
    reqwest::Url::parse(url.trim())
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some())
        .unwrap_or(false)
}
