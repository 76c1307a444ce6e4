use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Excel's row limit (1,048,576 rows).
pub const EXCEL_MAX_ROWS: u32 = 1_048_576;
/// Excel's column limit (16,384 columns, `XFD`).
pub const EXCEL_MAX_COLS: u32 = 16_384;

/// A reference to a single cell within a worksheet.
///
/// Rows and columns are **0-indexed**:
/// - `row = 0` is Excel row `1`
/// - `col = 0` is Excel column `A`
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellRef {
    /// 0-indexed row.
    pub row: u32,
    /// 0-indexed column.
    pub col: u32,
}

impl CellRef {
    #[inline]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Convert to Excel A1 notation (e.g. `A1`, `BC32`).
    pub fn to_a1(self) -> String {
        format!("{}{}", col_to_name(self.col), self.row + 1)
    }

    /// Parse an Excel A1-style reference (e.g. `A1`, `$B$2`).
    pub fn from_a1(a1: &str) -> Result<Self, A1ParseError> {
        let s = a1.trim();
        if s.is_empty() {
            return Err(A1ParseError::Empty);
        }

        let bytes = s.as_bytes();
        let mut idx = 0usize;
        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let col_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_alphabetic() {
            idx += 1;
        }
        if idx == col_start {
            return Err(A1ParseError::MissingColumn);
        }
        let col_end = idx;

        if bytes.get(idx) == Some(&b'$') {
            idx += 1;
        }

        let row_start = idx;
        while idx < bytes.len() && bytes[idx].is_ascii_digit() {
            idx += 1;
        }
        if idx == row_start {
            return Err(A1ParseError::MissingRow);
        }
        if idx != bytes.len() {
            return Err(A1ParseError::TrailingCharacters);
        }

        let col = name_to_col(&s[col_start..col_end])?;
        if col >= EXCEL_MAX_COLS {
            return Err(A1ParseError::InvalidColumn);
        }
        let row_1_based: u32 = s[row_start..idx]
            .parse()
            .map_err(|_| A1ParseError::InvalidRow)?;
        if row_1_based == 0 || row_1_based > EXCEL_MAX_ROWS {
            return Err(A1ParseError::InvalidRow);
        }

        Ok(Self {
            row: row_1_based - 1,
            col,
        })
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1())
    }
}

/// Errors that can occur when parsing an A1 cell reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum A1ParseError {
    #[error("empty A1 reference")]
    Empty,
    #[error("missing column in A1 reference")]
    MissingColumn,
    #[error("missing row in A1 reference")]
    MissingRow,
    #[error("invalid column in A1 reference")]
    InvalidColumn,
    #[error("invalid row in A1 reference")]
    InvalidRow,
    #[error("trailing characters in A1 reference")]
    TrailingCharacters,
}

/// A cell address as handed to a custom function by the host: either a bare
/// reference (`B7`) that targets the active sheet, or a sheet-qualified one
/// (`Inputs!B7`, `'Fuel Use'!$B$7`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellAddress {
    /// Sheet name, or `None` for the active sheet.
    pub sheet: Option<String>,
    pub cell: CellRef,
}

impl CellAddress {
    pub fn new(sheet: Option<String>, cell: CellRef) -> Self {
        Self { sheet, cell }
    }

    pub fn parse(address: &str) -> Result<Self, AddressParseError> {
        let s = address.trim();
        if s.is_empty() {
            return Err(AddressParseError::Empty);
        }

        let Some(bang) = s.rfind('!') else {
            let cell = CellRef::from_a1(s)?;
            return Ok(Self { sheet: None, cell });
        };

        let (sheet_part, cell_part) = (&s[..bang], &s[bang + 1..]);
        let sheet = unquote_sheet_name(sheet_part)?;
        let cell = CellRef::from_a1(cell_part)?;
        Ok(Self {
            sheet: Some(sheet),
            cell,
        })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sheet {
            None => write!(f, "{}", self.cell),
            Some(sheet) if sheet_name_needs_quotes(sheet) => {
                write!(f, "'{}'!{}", sheet.replace('\'', "''"), self.cell)
            }
            Some(sheet) => write!(f, "{sheet}!{}", self.cell),
        }
    }
}

impl std::str::FromStr for CellAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AddressParseError {
    #[error("empty cell address")]
    Empty,
    #[error("empty sheet name in cell address")]
    EmptySheetName,
    #[error("unterminated quoted sheet name in cell address")]
    UnterminatedQuote,
    #[error("invalid cell reference: {0}")]
    Cell(#[from] A1ParseError),
}

fn unquote_sheet_name(raw: &str) -> Result<String, AddressParseError> {
    let raw = raw.trim();
    if let Some(inner) = raw.strip_prefix('\'') {
        let Some(inner) = inner.strip_suffix('\'') else {
            return Err(AddressParseError::UnterminatedQuote);
        };
        let name = inner.replace("''", "'");
        if name.is_empty() {
            return Err(AddressParseError::EmptySheetName);
        }
        return Ok(name);
    }
    if raw.is_empty() {
        return Err(AddressParseError::EmptySheetName);
    }
    Ok(raw.to_string())
}

fn sheet_name_needs_quotes(name: &str) -> bool {
    name.chars()
        .any(|c| !(c.is_alphanumeric() || c == '_' || c == '.'))
}

fn col_to_name(col: u32) -> String {
    // A1 columns are 1-based; we store 0-based.
    let mut n = col + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.iter().rev().map(|&b| b as char).collect()
}

fn name_to_col(s: &str) -> Result<u32, A1ParseError> {
    let mut col: u32 = 0;
    for b in s.bytes() {
        if !b.is_ascii_alphabetic() {
            return Err(A1ParseError::InvalidColumn);
        }
        let v = (b.to_ascii_uppercase() - b'A') as u32 + 1;
        col = col
            .checked_mul(26)
            .and_then(|c| c.checked_add(v))
            .ok_or(A1ParseError::InvalidColumn)?;
    }
    if col == 0 {
        return Err(A1ParseError::InvalidColumn);
    }
    Ok(col - 1)
}
