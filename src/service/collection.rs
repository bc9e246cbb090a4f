//! Local mirror of a remote table kept in sync by change events.

use serde::de::DeserializeOwned;

use crate::{
    backend::realtime::ChangeEvent,
    model::{history::HistoryEntry, history::HistoryRow, scan::Scan, scan::ScanWithDetails, Keyed},
};

/// A locally held row that change events can update.
///
/// Change events carry bare table rows (`Record`) while local rows may be joined with
/// related data, so updates merge into the existing row instead of replacing it.
pub trait LiveRow: Keyed + Clone {
    type Record: DeserializeOwned + Keyed + Send + 'static;

    fn from_record(record: Self::Record) -> Self;

    /// Replace the row's own columns with `record`, keeping joined relations.
    fn merge(&mut self, record: Self::Record);
}

impl LiveRow for ScanWithDetails {
    type Record = Scan;

    fn from_record(record: Scan) -> Self {
        ScanWithDetails::from(record)
    }

    fn merge(&mut self, record: Scan) {
        self.scan = record;
    }
}

impl LiveRow for HistoryEntry {
    type Record = HistoryRow;

    fn from_record(record: HistoryRow) -> Self {
        HistoryEntry::from(record)
    }

    fn merge(&mut self, record: HistoryRow) {
        self.row = record;
    }
}

/// Ordered rows, newest first, updated idempotently by primary key.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveCollection<T> {
    rows: Vec<T>,
}

impl<T> Default for LiveCollection<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: LiveRow> LiveCollection<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: i32) -> Option<&T> {
        self.rows.iter().find(|row| row.key() == key)
    }

    /// Apply a change event. Returns true when the collection changed.
    ///
    /// Inserts of a known key and updates merge into the existing row; updates of an
    /// unknown key are ignored; deletes remove by key.
    pub fn apply(&mut self, event: ChangeEvent<T::Record>) -> bool {
        match event {
            ChangeEvent::Insert(record) => {
                let key = record.key();
                match self.rows.iter_mut().find(|row| row.key() == key) {
                    Some(row) => row.merge(record),
                    None => self.rows.insert(0, T::from_record(record)),
                }
                true
            }
            ChangeEvent::Update(record) => {
                let key = record.key();
                match self.rows.iter_mut().find(|row| row.key() == key) {
                    Some(row) => {
                        row.merge(record);
                        true
                    }
                    None => false,
                }
            }
            ChangeEvent::Delete(key) => self.remove(key),
        }
    }

    /// Insert a full row at the front, or replace the row with the same key.
    pub fn upsert(&mut self, row: T) {
        let key = row.key();
        match self.rows.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = row,
            None => self.rows.insert(0, row),
        }
    }

    pub fn remove(&mut self, key: i32) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.key() != key);
        self.rows.len() != before
    }

    /// Remove every row matching `predicate`.
    pub fn remove_where<F>(&mut self, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let before = self.rows.len();
        self.rows.retain(|row| !predicate(row));
        self.rows.len() != before
    }
}
