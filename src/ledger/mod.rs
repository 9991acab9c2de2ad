//! # Ledger Module
//!
//! The table-to-ledger calculation engine. A [`Table`] holds the attendance grid as
//! edited by the user; [`compute_table`] derives per-row usage counts and prices plus the
//! session totals, [`last_active_row_index`] finds the processed range and
//! [`check_columns`] flags game columns whose token totals look like entry mistakes.
//!
//! Everything here is pure: no I/O, no shared state.

pub mod active;
pub mod engine;
pub mod params;
pub mod row;
pub mod template;
pub mod validity;

pub use active::last_active_row_index;
pub use engine::{compute_table, ResultsSummary};
pub use params::{PricingParameters, TallyRules};
pub use row::{DerivedCell, Row};
pub use template::template;
pub use validity::{check_columns, ImbalancedColumn};

use thiserror::Error;

/// Column holding the player name.
pub const NAME_COL: usize = 0;
/// Column holding the display-only arrival time.
pub const TIME_COL: usize = 1;
/// Column holding the derived token count.
pub const TOTAL_COUNT_COL: usize = 2;
/// Column holding the derived price.
pub const PRICE_COL: usize = 3;
/// First game slot column.
pub const FIRST_GAME_COL: usize = 4;
/// Number of game slots per row.
pub const GAME_SLOTS: usize = 20;
/// Columns a complete attendance grid exposes.
pub const REQUIRED_COLUMNS: usize = FIRST_GAME_COL + GAME_SLOTS;
/// Minimum number of rows in a computed table.
pub const MIN_ROWS: usize = 23;

/// Errors raised by the ledger checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("The table has {found} columns, at least {required} are needed for game data validation")]
    InsufficientColumns { found: usize, required: usize },
}

/// Returns the label a grid uses for column `index` when it supplies none.
pub fn default_label(index: usize) -> String {
    match index {
        NAME_COL => "Name".to_owned(),
        TIME_COL => "Time".to_owned(),
        TOTAL_COUNT_COL => "Total /".to_owned(),
        PRICE_COL => "Price".to_owned(),
        _ if index < REQUIRED_COLUMNS => format!("game{}", index - FIRST_GAME_COL + 1),
        _ => format!("column{}", index + 1),
    }
}

/// An attendance table: the column labels the grid exposed plus its rows in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Column labels as supplied by the grid collaborator, possibly fewer than 24
    pub columns: Vec<String>,
    /// Rows in original order
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Builds a table from raw string records. Short records are widened, never rejected.
    pub fn from_records(columns: Vec<String>, records: &[Vec<String>]) -> Self {
        let rows = records.iter().map(|record| Row::from_cells(record)).collect();
        Self { columns, rows }
    }

    /// Number of columns the grid exposed.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Label of game slot `slot` (0-based).
    pub fn game_label(&self, slot: usize) -> String {
        let index = FIRST_GAME_COL + slot;
        self.columns
            .get(index)
            .filter(|label| !label.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| default_label(index))
    }

    /// Labels for every column a record of this table carries, filling gaps with defaults.
    pub fn labels(&self) -> Vec<String> {
        let extra = self.rows.iter().map(|row| row.extra.len()).max().unwrap_or(0);
        let width = self.columns.len().max(REQUIRED_COLUMNS + extra);
        (0..width)
            .map(|index| {
                self.columns
                    .get(index)
                    .filter(|label| !label.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| default_label(index))
            })
            .collect()
    }

    /// Rows as string records, each exactly as wide as [`Table::labels`].
    pub fn to_records(&self) -> Vec<Vec<String>> {
        let width = self.labels().len();
        self.rows
            .iter()
            .map(|row| {
                let mut cells = row.to_cells();
                cells.resize(width, String::new());
                cells
            })
            .collect()
    }
}

/// Formats a number the way cells display it: integral values without a fraction.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn default_labels() {
        assert_eq!(default_label(0), "Name");
        assert_eq!(default_label(2), "Total /");
        assert_eq!(default_label(4), "game1");
        assert_eq!(default_label(23), "game20");
        assert_eq!(default_label(24), "column25");
    }

    #[test]
    fn short_records_are_widened() {
        let table = Table::from_records(record(&["Name", "Time"]), &[record(&["Ann"])]);
        assert_eq!(table.width(), 2);
        assert_eq!(table.rows[0].name, "Ann");
        assert_eq!(table.to_records()[0].len(), REQUIRED_COLUMNS);
        assert_eq!(table.labels()[5], "game2");
    }

    #[test]
    fn game_label_prefers_supplied_header() {
        let mut columns: Vec<String> = (0..REQUIRED_COLUMNS).map(default_label).collect();
        columns[4] = "Court A 18:00".to_owned();
        let table = Table::new(columns, Vec::new());
        assert_eq!(table.game_label(0), "Court A 18:00");
        assert_eq!(table.game_label(19), "game20");
    }

    #[test]
    fn extra_columns_are_kept() {
        let mut cells = vec![String::new(); REQUIRED_COLUMNS];
        cells[0] = "Bo".to_owned();
        cells.push("note".to_owned());
        let table = Table::from_records(Vec::new(), &[cells]);
        let labels = table.labels();
        assert_eq!(labels.len(), REQUIRED_COLUMNS + 1);
        assert_eq!(labels[REQUIRED_COLUMNS], "column25");
        assert_eq!(table.to_records()[0][REQUIRED_COLUMNS], "note");
    }

    #[test]
    fn format_numbers() {
        assert_eq!(format_number(80.0), "80");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(12.5), "12.5");
    }
}
