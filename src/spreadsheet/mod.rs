//! # Spreadsheet Module
//!
//! Grid collaborators: everything that moves an attendance table in or out of a file.
//! Sources implement [`GridSource`] so callers treat a CSV export and an Excel workbook
//! the same way.

pub(crate) mod cell;
pub mod delimited;
pub(crate) mod reference;
pub(crate) mod sheet;
pub mod xlsx;

pub use crate::helpers::xml::XmlError;
pub use delimited::{write_csv, CsvGridSource};
pub use xlsx::XlsxGridSource;

use crate::error::CourtTallyError;
use crate::ledger::Table;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading grid files.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Missing part '{0}' in workbook")]
    FileError(String),

    #[error("Workbook '{0}' has no worksheets")]
    SpreadsheetEmptyError(String),

    #[error("Sheet matching '{1}' not found in '{0}'")]
    SheetNotFoundError(String, String),

    #[error("Invalid cell value in '{0}' sheet '{1}' at {2}: '{3}'")]
    CellValueError(String, String, String, String),

    #[error("Cannot detect grid format for '{0}'")]
    FormatError(String),
}

/// Something that supplies an attendance table snapshot.
pub trait GridSource {
    /// Name of the underlying file, for messages.
    fn name(&self) -> String;

    /// Reads the table. The first record holds the column labels.
    fn load(&mut self) -> Result<Table, CourtTallyError>;
}

/// Opens a grid file, picking the reader from the file extension.
pub fn open_source(file_name: &str, sheet_pattern: Option<&str>) -> Result<Box<dyn GridSource>, CourtTallyError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => Ok(Box::new(CsvGridSource::open(file_name)?)),
        Some("xlsx") | Some("xlsm") => Ok(Box::new(XlsxGridSource::open(file_name, sheet_pattern)?)),
        _ => Err(SpreadsheetError::FormatError(file_name.to_owned()))?,
    }
}

/// Splits raw records into the header row and the table rows.
pub(crate) fn records_to_table(mut records: Vec<Vec<String>>) -> Table {
    if records.is_empty() {
        return Table::default();
    }
    let rows = records.split_off(1);
    let columns = records.pop().unwrap_or_default();
    Table::from_records(columns, &rows)
}
