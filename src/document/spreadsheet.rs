/*!
 * Spreadsheet loading.
 *
 * Workbooks are read with calamine into plain rows of optional strings so the
 * Q&A conversion never touches the spreadsheet library directly.
 */

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use log::{error, warn};
use std::io::Cursor;
use std::path::Path;

use crate::errors::DocumentError;

/// One worksheet as text cells; the first row is the header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { name: name.into(), rows }
    }

    /// Widest row, header included
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Rows after the header row
    pub fn data_rows(&self) -> &[Vec<Option<String>>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// No data rows, or only blank ones
    pub fn is_empty(&self) -> bool {
        self.data_rows().iter().all(|row| row.iter().all(|c| c.is_none()))
    }
}

/// Read every sheet of a workbook held in memory
///
/// A sheet that cannot be read is logged and left out.
pub fn read_workbook(bytes: &[u8]) -> Result<Vec<Sheet>, DocumentError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| DocumentError::Spreadsheet(e.to_string()))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let rows = range
                    .rows()
                    .map(|row| row.iter().map(cell_text).collect())
                    .collect();
                sheets.push(Sheet::new(name, rows));
            }
            Err(e) => {
                error!("Error reading sheet {}: {}", name, e);
            }
        }
    }

    if sheets.is_empty() {
        warn!("Workbook contains no readable sheets");
    }

    Ok(sheets)
}

/// Read a workbook from disk
pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Vec<Sheet>, DocumentError> {
    let bytes = std::fs::read(path.as_ref())
        .map_err(|e| DocumentError::Spreadsheet(format!("{}: {}", path.as_ref().display(), e)))?;
    read_workbook(&bytes)
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
