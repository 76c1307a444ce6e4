//! [`TableStore`] and [`ValidationHost`] over an in-memory [`Workbook`].
//!
//! Each cached dataset lives in its own hidden worksheet:
//!
//! | row | A             | B              | C ...  |
//! |-----|---------------|----------------|--------|
//! | 1   | `LastUpdated` | timestamp (ms) |        |
//! | 2   | header        | header         | header |
//! | 3.. | payload       | payload        | ...    |

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use envizi_model::{
    CellAddress, CellRef, CellValue, ListValidation, SheetVisibility, Workbook, Worksheet,
};

use crate::host::{HostError, ValidationHost};
use crate::store::{Result, StoreError, StoredTable, Table, TableStore};
use crate::TimestampMs;

pub const TIMESTAMP_LABEL: &str = "LastUpdated";

const TIMESTAMP_LABEL_CELL: CellRef = CellRef::new(0, 0);
const TIMESTAMP_CELL: CellRef = CellRef::new(0, 1);
const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;

/// Shared handle to the active workbook.
#[derive(Clone, Default)]
pub struct WorkbookHost {
    workbook: Arc<Mutex<Workbook>>,
}

impl WorkbookHost {
    pub fn new(workbook: Workbook) -> Self {
        Self {
            workbook: Arc::new(Mutex::new(workbook)),
        }
    }

    pub fn shared(workbook: Arc<Mutex<Workbook>>) -> Self {
        Self { workbook }
    }

    /// Run `f` against the workbook under the host lock.
    pub fn with_workbook<R>(&self, f: impl FnOnce(&Workbook) -> R) -> R {
        f(&self.lock())
    }

    pub fn with_workbook_mut<R>(&self, f: impl FnOnce(&mut Workbook) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Workbook> {
        self.workbook.lock().expect("workbook mutex poisoned")
    }
}

impl std::fmt::Debug for WorkbookHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.with_workbook(|wb| wb.sheets.iter().map(|s| s.name.clone()).collect());
        f.debug_struct("WorkbookHost").field("sheets", &names).finish()
    }
}

fn read_timestamp(sheet: &Worksheet) -> Option<TimestampMs> {
    let label = sheet.value(TIMESTAMP_LABEL_CELL).to_text();
    if label.trim() != TIMESTAMP_LABEL {
        log::warn!("cache sheet '{}' has no {TIMESTAMP_LABEL} marker", sheet.name);
        return None;
    }
    match sheet.value(TIMESTAMP_CELL).as_number() {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Some(ms as TimestampMs),
        _ => {
            log::warn!("cache sheet '{}' has an unreadable timestamp", sheet.name);
            None
        }
    }
}

fn read_table(sheet: &Worksheet) -> Table {
    let grid = sheet.read_used();
    let mut rows = grid
        .into_iter()
        .skip(HEADER_ROW as usize)
        .map(|row| row.iter().map(CellValue::to_text).collect::<Vec<_>>());

    let mut header = rows.next().unwrap_or_default();
    while header.last().is_some_and(|h| h.is_empty()) {
        header.pop();
    }
    let width = header.len();
    let rows = rows
        .map(|mut row| {
            row.truncate(width);
            row
        })
        .collect();
    Table { header, rows }
}

fn to_cells(row: &[String]) -> Vec<CellValue> {
    row.iter().map(|s| CellValue::from(s.as_str())).collect()
}

#[async_trait]
impl TableStore for WorkbookHost {
    async fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.with_workbook(|wb| wb.sheet_by_name(name).is_some()))
    }

    async fn read_all(&self, name: &str) -> Result<Option<StoredTable>> {
        Ok(self.with_workbook(|wb| {
            wb.sheet_by_name(name).map(|sheet| StoredTable {
                table: read_table(sheet),
                written_at: read_timestamp(sheet),
            })
        }))
    }

    async fn replace_all(&self, name: &str, table: Table, written_at: TimestampMs) -> Result<()> {
        let mut wb = self.lock();
        wb.delete_sheet_by_name(name);
        let id = wb
            .add_sheet(name)
            .map_err(|e| StoreError::Host(e.to_string()))?;
        wb.set_visibility(name, SheetVisibility::Hidden)
            .map_err(|e| StoreError::Host(e.to_string()))?;
        let sheet = wb.sheet_mut(id).ok_or_else(|| StoreError::Malformed {
            table: name.to_string(),
            reason: "sheet vanished while being written".to_string(),
        })?;

        sheet.write_block(CellRef::new(HEADER_ROW, 0), &[to_cells(&table.header)]);
        let rows: Vec<Vec<CellValue>> = table.rows.iter().map(|r| to_cells(r)).collect();
        sheet.write_block(CellRef::new(FIRST_DATA_ROW, 0), &rows);
        sheet.set_value(TIMESTAMP_LABEL_CELL, TIMESTAMP_LABEL);
        sheet.set_value(TIMESTAMP_CELL, written_at as f64);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.with_workbook_mut(|wb| wb.delete_sheet_by_name(name)))
    }
}

#[async_trait]
impl ValidationHost for WorkbookHost {
    async fn apply_list_validation(
        &self,
        address: &str,
        rule: ListValidation,
    ) -> std::result::Result<(), HostError> {
        let parsed = CellAddress::parse(address).map_err(|source| HostError::Address {
            address: address.to_string(),
            source,
        })?;

        let mut wb = self.lock();
        let (sheet_id, cell) = wb.resolve(&parsed)?;
        let sheet = wb
            .sheet_mut(sheet_id)
            .ok_or_else(|| HostError::Other(format!("sheet for '{address}' disappeared")))?;
        sheet.clear_validation(cell);
        sheet.set_validation(cell, rule);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn host_with_inputs() -> WorkbookHost {
        let mut wb = Workbook::new();
        wb.add_sheet("Inputs").unwrap();
        WorkbookHost::new(wb)
    }

    fn sample_table() -> Table {
        Table::new(
            vec!["apiGroup".into(), "alpha3".into(), "countryName".into()],
            vec![
                vec!["mobile".into(), "USA".into(), "United States".into()],
                vec!["mobile".into(), "CAN".into(), String::new()],
            ],
        )
    }

    #[tokio::test]
    async fn replace_all_writes_hidden_sheet_with_marker() {
        let host = host_with_inputs();
        host.replace_all("API_Area_Data", sample_table(), 1_700_000_000_123)
            .await
            .unwrap();

        host.with_workbook(|wb| {
            let sheet = wb.sheet_by_name("API_Area_Data").expect("cache sheet");
            assert!(sheet.is_hidden());
            assert_eq!(sheet.value(CellRef::new(0, 0)), CellValue::from("LastUpdated"));
            assert_eq!(sheet.value(CellRef::new(2, 1)), CellValue::from("USA"));
            assert_eq!(wb.active_sheet().map(|s| s.name.as_str()), Some("Inputs"));
        });

        let stored = host.read_all("API_Area_Data").await.unwrap().expect("stored");
        assert_eq!(stored.written_at, Some(1_700_000_000_123));
        assert_eq!(stored.table, sample_table());
    }

    #[tokio::test]
    async fn replace_all_drops_previous_rows() {
        let host = host_with_inputs();
        host.replace_all("T", sample_table(), 1).await.unwrap();
        host.replace_all(
            "T",
            Table::new(vec!["apiGroup".into(), "alpha3".into()], vec![]),
            2,
        )
        .await
        .unwrap();

        let stored = host.read_all("T").await.unwrap().expect("stored");
        assert_eq!(stored.written_at, Some(2));
        assert!(stored.table.rows.is_empty());
        assert_eq!(stored.table.header, vec!["apiGroup", "alpha3"]);
    }

    #[tokio::test]
    async fn missing_marker_reads_as_no_timestamp() {
        let host = host_with_inputs();
        host.with_workbook_mut(|wb| {
            let id = wb.add_sheet("Legacy").unwrap();
            let sheet = wb.sheet_mut(id).unwrap();
            sheet.set_value(CellRef::new(1, 0), "Location");
            sheet.set_value(CellRef::new(2, 0), "Electricity");
        });

        let stored = host.read_all("legacy").await.unwrap().expect("stored");
        assert_eq!(stored.written_at, None);
        assert_eq!(stored.table.header, vec!["Location"]);
        assert_eq!(stored.table.rows, vec![vec!["Electricity".to_string()]]);
    }

    #[tokio::test]
    async fn validation_targets_active_sheet_and_replaces_rule() {
        let host = host_with_inputs();
        host.apply_list_validation("B2", ListValidation::new(vec!["a".into()]))
            .await
            .unwrap();
        host.apply_list_validation("Inputs!$B$2", ListValidation::new(vec!["b".into()]))
            .await
            .unwrap();

        host.with_workbook(|wb| {
            let sheet = wb.sheet_by_name("Inputs").unwrap();
            let rule = sheet.validation(CellRef::new(1, 1)).expect("rule");
            assert_eq!(rule.options, vec!["b"]);
        });
    }

    #[tokio::test]
    async fn validation_on_unknown_sheet_fails() {
        let host = host_with_inputs();
        let err = host
            .apply_list_validation("Missing!A1", ListValidation::new(vec!["a".into()]))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Workbook(_)), "unexpected error: {err:?}");

        let err = host
            .apply_list_validation("not an address", ListValidation::new(vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::Address { .. }), "unexpected error: {err:?}");
    }
}
