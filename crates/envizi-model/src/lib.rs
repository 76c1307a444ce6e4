//! `envizi-model` is a small in-memory stand-in for the host spreadsheet's
//! object model.
//!
//! It covers exactly what the metadata cache and lookup functions need from a
//! host:
//! - cell addresses (`A1`, `Sheet!A1`, `'My Sheet'!$A$1`) resolved against an
//!   active sheet
//! - named worksheets with visibility, written and read as rectangular blocks
//! - list data-validation rules attached to single cells

mod address;
mod data_validation;
mod value;
mod workbook;
mod worksheet;

pub use address::{
    A1ParseError, AddressParseError, CellAddress, CellRef, EXCEL_MAX_COLS, EXCEL_MAX_ROWS,
};
pub use data_validation::{ListValidation, ValidationErrorAlert};
pub use value::{CellValue, ErrorValue};
pub use workbook::{Workbook, WorkbookError};
pub use worksheet::{SheetVisibility, Worksheet, WorksheetId};
