use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellAddress, CellRef, SheetVisibility, Worksheet, WorksheetId};

/// Errors raised by workbook-level operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WorkbookError {
    #[error("sheet name cannot be empty")]
    EmptyName,
    #[error("sheet name already exists: {0}")]
    DuplicateName(String),
    #[error("sheet not found: {0}")]
    SheetNotFound(String),
    #[error("workbook has no active sheet")]
    NoActiveSheet,
}

/// A workbook: an ordered list of worksheets plus the active-sheet pointer
/// used to resolve unqualified cell addresses.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<Worksheet>,
    #[serde(default)]
    active_sheet: Option<WorksheetId>,
    #[serde(skip)]
    next_sheet_id: WorksheetId,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

fn sheet_name_eq(a: &str, b: &str) -> bool {
    // Excel compares sheet names case-insensitively.
    a.to_lowercase() == b.to_lowercase()
}

impl Workbook {
    pub fn new() -> Self {
        Self {
            sheets: Vec::new(),
            active_sheet: None,
            next_sheet_id: 1,
        }
    }

    /// Add a worksheet, returning its id. The first sheet added becomes active.
    pub fn add_sheet(&mut self, name: impl Into<String>) -> Result<WorksheetId, WorkbookError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(WorkbookError::EmptyName);
        }
        if self.sheet_by_name(&name).is_some() {
            return Err(WorkbookError::DuplicateName(name));
        }

        let id = self.allocate_sheet_id();
        self.sheets.push(Worksheet::new(id, name));
        if self.active_sheet.is_none() {
            self.active_sheet = Some(id);
        }
        Ok(id)
    }

    fn allocate_sheet_id(&mut self) -> WorksheetId {
        // Deserialized workbooks start with `next_sheet_id == 0`.
        let floor = self.sheets.iter().map(|s| s.id).max().unwrap_or(0) + 1;
        let id = self.next_sheet_id.max(floor);
        self.next_sheet_id = id.wrapping_add(1);
        id
    }

    pub fn sheet(&self, id: WorksheetId) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    pub fn sheet_mut(&mut self, id: WorksheetId) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| s.id == id)
    }

    pub fn sheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| sheet_name_eq(&s.name, name))
    }

    pub fn sheet_by_name_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.sheets.iter_mut().find(|s| sheet_name_eq(&s.name, name))
    }

    /// Delete a sheet by name. Returns `false` if no such sheet exists.
    ///
    /// Deleting the active sheet moves the active pointer to the first
    /// remaining visible sheet, or clears it if every sheet is hidden.
    pub fn delete_sheet_by_name(&mut self, name: &str) -> bool {
        let Some(idx) = self.sheets.iter().position(|s| sheet_name_eq(&s.name, name)) else {
            return false;
        };
        let removed = self.sheets.remove(idx);
        if self.active_sheet == Some(removed.id) {
            self.active_sheet = self.first_visible_sheet();
        }
        true
    }

    /// Change a sheet's visibility. Hiding the active sheet moves the active
    /// pointer to the first visible sheet (or clears it).
    pub fn set_visibility(
        &mut self,
        name: &str,
        visibility: SheetVisibility,
    ) -> Result<(), WorkbookError> {
        let sheet = self
            .sheet_by_name_mut(name)
            .ok_or_else(|| WorkbookError::SheetNotFound(name.to_string()))?;
        sheet.visibility = visibility;
        let id = sheet.id;
        if visibility != SheetVisibility::Visible && self.active_sheet == Some(id) {
            self.active_sheet = self.first_visible_sheet();
        }
        Ok(())
    }

    fn first_visible_sheet(&self) -> Option<WorksheetId> {
        self.sheets.iter().find(|s| !s.is_hidden()).map(|s| s.id)
    }

    pub fn active_sheet(&self) -> Option<&Worksheet> {
        self.active_sheet.and_then(|id| self.sheet(id))
    }

    pub fn set_active_sheet(&mut self, name: &str) -> Result<(), WorkbookError> {
        let id = self
            .sheet_by_name(name)
            .ok_or_else(|| WorkbookError::SheetNotFound(name.to_string()))?
            .id;
        self.active_sheet = Some(id);
        Ok(())
    }

    /// Resolve an address to a concrete sheet + cell. Unqualified addresses
    /// target the active sheet, which must be visible.
    pub fn resolve(&self, address: &CellAddress) -> Result<(WorksheetId, CellRef), WorkbookError> {
        let sheet = match &address.sheet {
            Some(name) => self
                .sheet_by_name(name)
                .ok_or_else(|| WorkbookError::SheetNotFound(name.clone()))?,
            None => self
                .active_sheet()
                .filter(|s| !s.is_hidden())
                .ok_or(WorkbookError::NoActiveSheet)?,
        };
        Ok((sheet.id, address.cell))
    }
}
