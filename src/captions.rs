//! Caption table loading.
//!
//! Captions live in one sheet of a spreadsheet (`.ods`, `.xlsx`, `.xls`),
//! read with [`calamine`]:
//!
//! ```text
//!          A                      B                   C
//! 1   Hello world            Second line
//! 2   (empty row, skipped)
//! 3   Another post           with three          captions
//! ```
//!
//! Each row is a post; each cell is one caption slot in that post. Trailing
//! empty cells are dropped, so a row that is entirely empty has no captions
//! and is skipped by the run. Empty cells between captions stay as empty
//! captions and keep their slot number.
//!
//! Row indices are absolute sheet rows (0-based), so post numbers in output
//! folder names match the row numbers a user sees in their spreadsheet.

use calamine::{Data, Range, Reader, open_workbook_auto};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Failed to open caption source {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("Sheet '{sheet}' not found in {path} (available: {available})")]
    SheetNotFound {
        sheet: String,
        path: PathBuf,
        available: String,
    },
    #[error("Failed to read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
}

/// One spreadsheet row: a post and its captions in slot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionRow {
    /// 0-based sheet row.
    pub index: usize,
    pub captions: Vec<String>,
}

impl CaptionRow {
    /// 1-based post number used in pack folder names.
    pub fn post_number(&self) -> usize {
        self.index + 1
    }

    pub fn is_empty(&self) -> bool {
        self.captions.is_empty()
    }
}

/// All caption rows of the run, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionTable {
    pub rows: Vec<CaptionRow>,
}

impl CaptionTable {
    /// Build a table from in-memory rows; row `i` gets index `i`.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| CaptionRow {
                index,
                captions: trim_trailing_empty(cells.into_iter().map(Into::into).collect()),
            })
            .collect();
        Self { rows }
    }

    /// Build a table from a calamine cell range.
    pub fn from_range(range: &Range<Data>) -> Self {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);
        let rows = range
            .rows()
            .enumerate()
            .map(|(i, cells)| {
                // Columns left of the range are empty cells the sheet never
                // materialized; keep them so slot numbers match columns.
                let leading = std::iter::repeat_n(String::new(), first_col);
                let captions = leading.chain(cells.iter().map(cell_text)).collect();
                CaptionRow {
                    index: first_row + i,
                    captions: trim_trailing_empty(captions),
                }
            })
            .collect();
        Self { rows }
    }

    /// Rows that have at least one caption.
    pub fn non_empty_rows(&self) -> impl Iterator<Item = &CaptionRow> {
        self.rows.iter().filter(|row| !row.is_empty())
    }

    /// Total caption slots over all rows, for one repeat.
    pub fn slot_count(&self) -> usize {
        self.rows.iter().map(|row| row.captions.len()).sum()
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn trim_trailing_empty(mut captions: Vec<String>) -> Vec<String> {
    while captions.last().is_some_and(|c| c.is_empty()) {
        captions.pop();
    }
    captions
}

/// Load the caption table from `sheet` of the spreadsheet at `path`.
pub fn load_captions(path: &Path, sheet: &str) -> Result<CaptionTable, CaptionError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| CaptionError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let names = workbook.sheet_names();
    if !names.iter().any(|name| name == sheet) {
        return Err(CaptionError::SheetNotFound {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
            available: names.join(", "),
        });
    }

    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| CaptionError::Read {
            sheet: sheet.to_string(),
            source,
        })?;
    Ok(CaptionTable::from_range(&range))
}
