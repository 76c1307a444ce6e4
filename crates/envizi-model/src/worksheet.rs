use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CellRef, CellValue, ListValidation};

/// Identifier for a worksheet within a workbook.
pub type WorksheetId = u32;

/// Worksheet visibility state (Excel-compatible).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetVisibility {
    #[default]
    Visible,
    /// Hidden, but the user can unhide it from the UI.
    Hidden,
    /// Hidden and only reachable programmatically.
    VeryHidden,
}

/// A sparse worksheet: only non-empty cells and cells carrying a validation
/// rule occupy memory.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Worksheet {
    pub id: WorksheetId,
    pub name: String,
    #[serde(default)]
    pub visibility: SheetVisibility,
    #[serde(default)]
    cells: BTreeMap<CellRef, CellValue>,
    #[serde(default)]
    validations: BTreeMap<CellRef, ListValidation>,
}

impl Worksheet {
    pub fn new(id: WorksheetId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visibility: SheetVisibility::Visible,
            cells: BTreeMap::new(),
            validations: BTreeMap::new(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.visibility != SheetVisibility::Visible
    }

    pub fn value(&self, cell: CellRef) -> CellValue {
        self.cells.get(&cell).cloned().unwrap_or_default()
    }

    /// Set a single cell. Writing an empty value removes the cell.
    pub fn set_value(&mut self, cell: CellRef, value: impl Into<CellValue>) {
        let value = value.into();
        if value.is_empty() {
            self.cells.remove(&cell);
        } else {
            self.cells.insert(cell, value);
        }
    }

    /// Write a rectangular block whose top-left corner is `origin`.
    ///
    /// Rows may be ragged; missing trailing cells are left untouched.
    pub fn write_block(&mut self, origin: CellRef, rows: &[Vec<CellValue>]) {
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                let cell = CellRef::new(origin.row + r as u32, origin.col + c as u32);
                self.set_value(cell, value.clone());
            }
        }
    }

    /// Inclusive bounds of the populated area, or `None` for an empty sheet.
    pub fn used_range(&self) -> Option<(CellRef, CellRef)> {
        let mut cells = self.cells.keys();
        let first = *cells.next()?;
        let (mut min, mut max) = (first, first);
        for cell in cells {
            min.row = min.row.min(cell.row);
            min.col = min.col.min(cell.col);
            max.row = max.row.max(cell.row);
            max.col = max.col.max(cell.col);
        }
        Some((min, max))
    }

    /// Read the inclusive block `start..=end` as a dense grid.
    pub fn read_block(&self, start: CellRef, end: CellRef) -> Vec<Vec<CellValue>> {
        (start.row..=end.row)
            .map(|row| {
                (start.col..=end.col)
                    .map(|col| self.value(CellRef::new(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Read everything from `A1` to the bottom-right of the used range.
    pub fn read_used(&self) -> Vec<Vec<CellValue>> {
        match self.used_range() {
            Some((_, end)) => self.read_block(CellRef::new(0, 0), end),
            None => Vec::new(),
        }
    }

    pub fn validation(&self, cell: CellRef) -> Option<&ListValidation> {
        self.validations.get(&cell)
    }

    /// Replace any rule on `cell` with `rule`.
    pub fn set_validation(&mut self, cell: CellRef, rule: ListValidation) {
        self.validations.insert(cell, rule);
    }

    pub fn clear_validation(&mut self, cell: CellRef) -> Option<ListValidation> {
        self.validations.remove(&cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_and_read_block() {
        let mut sheet = Worksheet::new(1, "Data");
        sheet.write_block(
            CellRef::new(1, 0),
            &[
                vec!["a".into(), "b".into()],
                vec!["c".into(), CellValue::Empty],
            ],
        );

        assert_eq!(sheet.used_range(), Some((CellRef::new(1, 0), CellRef::new(2, 1))));
        let grid = sheet.read_used();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec![CellValue::Empty, CellValue::Empty]);
        assert_eq!(grid[2], vec![CellValue::from("c"), CellValue::Empty]);
    }

    #[test]
    fn empty_sheet_reads_nothing() {
        let sheet = Worksheet::new(1, "Empty");
        assert_eq!(sheet.used_range(), None);
        assert!(sheet.read_used().is_empty());
    }
}
