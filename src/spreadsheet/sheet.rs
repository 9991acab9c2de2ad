use crate::spreadsheet::cell::Cell;

/// Rows an attendance sheet may span. Cells below are not part of the grid.
pub(crate) const MAX_ROWS: usize = 4096;
/// Columns an attendance sheet may span, up to column IV.
pub(crate) const MAX_COLUMNS: usize = 256;

/// Cells read from one worksheet, in row-major order, with the occupied data range.
pub(crate) struct Sheet {
    /// Sheet name
    pub(crate) name: String,
    /// All non-empty cells in the sheet
    pub(crate) cells: Vec<Cell>,
    /// Actual data range (determined from cell data)
    pub(crate) row_lower_bound: Option<usize>,
    pub(crate) row_upper_bound: Option<usize>,
    pub(crate) col_upper_bound: Option<usize>,
}

impl Sheet {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: Vec::new(),
            row_lower_bound: None,
            row_upper_bound: None,
            col_upper_bound: None,
        }
    }

    /// Whether a cell at (`row`, `col`) lies inside the grid [`Sheet::records`] lays out.
    pub(crate) fn within_limits(row: usize, col: usize) -> bool {
        row < MAX_ROWS && col < MAX_COLUMNS
    }

    /// Adds a cell to the sheet, updating the data range.
    pub(crate) fn push(&mut self, cell: Cell) {
        self.update_bound(cell.row, cell.col);
        self.cells.push(cell);
    }

    fn update_bound(&mut self, row: usize, col: usize) {
        if self.row_lower_bound.map(|row_lower_bound| row < row_lower_bound).unwrap_or(true) {
            self.row_lower_bound = Some(row);
        }
        if self.row_upper_bound.map(|row_upper_bound| row_upper_bound < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        if self.col_upper_bound.map(|col_upper_bound| col_upper_bound < col).unwrap_or(true) {
            self.col_upper_bound = Some(col);
        }
    }

    /// Lays the cells out as dense text records starting at the first occupied row and
    /// column A. Gaps become empty strings.
    pub(crate) fn records(&self, shared_strings: &[String]) -> Vec<Vec<String>> {
        let (Some(row_lower), Some(row_upper), Some(col_upper)) =
            (self.row_lower_bound, self.row_upper_bound, self.col_upper_bound)
        else {
            return Vec::new();
        };
        let mut records = vec![vec![String::new(); col_upper + 1]; row_upper - row_lower + 1];
        for cell in &self.cells {
            records[cell.row - row_lower][cell.col] = cell.text(shared_strings);
        }
        records
    }
}
