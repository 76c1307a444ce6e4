use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

use crate::TimestampMs;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("host error: {0}")]
    Host(String),
    #[error("table '{table}' is malformed: {reason}")]
    Malformed { table: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Tabular payload of a cached dataset: one header row plus string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Index of the header cell matching `name` (case-insensitive).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    /// Cell at `(row, col)`, with missing cells reading as empty.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A dataset as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTable {
    pub table: Table,
    /// `None` when the timestamp marker is missing or unreadable.
    pub written_at: Option<TimestampMs>,
}

/// Named-table storage backing the metadata cache.
///
/// `replace_all` must be applied as one unit: a concurrent `read_all` sees
/// either the previous dataset or the new one with its timestamp, never a mix.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool>;

    async fn read_all(&self, name: &str) -> Result<Option<StoredTable>>;

    /// Drop any existing table called `name` and write `table`, stamping it
    /// with `written_at` last.
    async fn replace_all(&self, name: &str, table: Table, written_at: TimestampMs) -> Result<()>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, name: &str) -> Result<bool>;
}

/// Process-local [`TableStore`], used in tests and headless runs.
#[derive(Default)]
pub struct InMemoryTableStore {
    tables: Mutex<HashMap<String, StoredTable>>,
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `stored` verbatim, e.g. a legacy table without a timestamp.
    pub fn seed(&self, name: &str, stored: StoredTable) {
        self.tables
            .lock()
            .expect("table store mutex poisoned")
            .insert(name.to_string(), stored);
    }

    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tables
            .lock()
            .expect("table store mutex poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for InMemoryTableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTableStore")
            .field("tables", &self.table_names())
            .finish()
    }
}

#[async_trait]
impl TableStore for InMemoryTableStore {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self
            .tables
            .lock()
            .expect("table store mutex poisoned")
            .contains_key(name))
    }

    async fn read_all(&self, name: &str) -> Result<Option<StoredTable>> {
        Ok(self
            .tables
            .lock()
            .expect("table store mutex poisoned")
            .get(name)
            .cloned())
    }

    async fn replace_all(&self, name: &str, table: Table, written_at: TimestampMs) -> Result<()> {
        let stored = StoredTable {
            table,
            written_at: Some(written_at),
        };
        self.tables
            .lock()
            .expect("table store mutex poisoned")
            .insert(name.to_string(), stored);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self
            .tables
            .lock()
            .expect("table store mutex poisoned")
            .remove(name)
            .is_some())
    }
}
