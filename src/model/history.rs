use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{first_of_many, scan::ScanWithDetails, Keyed};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub history_id: i32,
    pub user_id: i32,
    pub scan_id: i32,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

impl Keyed for HistoryRow {
    const KEY_FIELD: &'static str = "history_id";

    fn key(&self) -> i32 {
        self.history_id
    }
}

/// A saved scan, joined with the scan it references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub row: HistoryRow,
    #[serde(default, deserialize_with = "first_of_many")]
    pub scan: Option<ScanWithDetails>,
}

impl HistoryEntry {
    /// URL of the saved scan, empty when the join was not loaded.
    pub fn url(&self) -> &str {
        self.scan
            .as_ref()
            .map(|scan| scan.scan.url_scanned.as_str())
            .unwrap_or_default()
    }
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self { row, scan: None }
    }
}

impl Keyed for HistoryEntry {
    const KEY_FIELD: &'static str = HistoryRow::KEY_FIELD;

    fn key(&self) -> i32 {
        self.row.history_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewHistoryEntry {
    pub user_id: i32,
    pub scan_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub saved_at: DateTime<Utc>,
}

/// Editable history fields. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HistoryChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}
