use crate::spreadsheet::reference::index_to_reference;

/// Types of cell data found in a worksheet.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) enum CellType {
    #[default]
    Empty,
    /// Boolean values stored as 0/1
    Boolean,
    /// Numeric values
    Number,
    /// Inline or formula string values
    InlineString,
    /// Shared string table references
    SharedString,
    /// Error values
    Error,
}

/// A single worksheet cell with position, type and raw value.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    /// Row index (0-based)
    pub(crate) row: usize,
    /// Column index (0-based)
    pub(crate) col: usize,
    /// Cell data type
    pub(crate) kind: CellType,
    /// Cell value as stored in the file
    pub(crate) value: String,
}

impl Cell {
    /// Returns the A1-style reference of the cell.
    pub(crate) fn reference(&self) -> String {
        index_to_reference(self.row, self.col)
    }

    /// Text the grid shows for this cell. Shared strings are resolved through `shared_strings`.
    pub(crate) fn text(&self, shared_strings: &[String]) -> String {
        match self.kind {
            CellType::Empty | CellType::Error => String::new(),
            CellType::Boolean => (if self.value == "1" { "TRUE" } else { "FALSE" }).to_owned(),
            CellType::Number => trim_number(&self.value),
            CellType::InlineString => self.value.to_owned(),
            CellType::SharedString => self
                .value
                .parse::<usize>()
                .ok()
                .and_then(|index| shared_strings.get(index))
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Drops a trailing all-zero fraction ("80.0" becomes "80").
fn trim_number(value: &str) -> String {
    match value.split_once('.') {
        Some((integer, fraction)) if fraction.bytes().all(|byte| byte == b'0') => integer.to_owned(),
        _ => value.to_owned(),
    }
}
