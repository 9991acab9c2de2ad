use crate::ledger::{format_number, FIRST_GAME_COL, GAME_SLOTS, NAME_COL, PRICE_COL, REQUIRED_COLUMNS, TIME_COL, TOTAL_COUNT_COL};
use std::fmt::Display;

/// Content of a derived column (TotalCount or Price).
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DerivedCell {
    #[default]
    Empty,
    /// Value written by the engine
    Number(f64),
    /// Whatever the user typed, kept verbatim until the engine overwrites it
    Text(String),
}

impl DerivedCell {
    /// Reads a raw grid cell. Blank text becomes `Empty`.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            DerivedCell::Empty
        } else {
            DerivedCell::Text(raw.to_owned())
        }
    }

    /// Numeric value of the cell, `None` when empty or unparseable.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DerivedCell::Empty => None,
            DerivedCell::Number(value) => Some(*value),
            DerivedCell::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DerivedCell::Empty)
    }
}

impl Display for DerivedCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DerivedCell::Empty => Ok(()),
            DerivedCell::Number(value) => write!(f, "{}", format_number(*value)),
            DerivedCell::Text(text) => write!(f, "{}", text),
        }
    }
}

/// One player row of the attendance table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub name: String,
    pub time: String,
    pub total_count: DerivedCell,
    pub price: DerivedCell,
    /// Raw game slot cells, each holding zero or more usage tokens
    pub games: [String; GAME_SLOTS],
    /// Cells beyond the last game slot, kept verbatim
    pub extra: Vec<String>,
}

impl Row {
    /// Builds a row from raw cells, padding missing positions with empty cells.
    pub fn from_cells(cells: &[String]) -> Self {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        Row {
            name: cell(NAME_COL),
            time: cell(TIME_COL),
            total_count: DerivedCell::parse(&cell(TOTAL_COUNT_COL)),
            price: DerivedCell::parse(&cell(PRICE_COL)),
            games: std::array::from_fn(|slot| cell(FIRST_GAME_COL + slot)),
            extra: cells.get(REQUIRED_COLUMNS..).map(<[String]>::to_vec).unwrap_or_default(),
        }
    }

    /// Row as raw cells: the 24 fixed columns followed by any extra cells.
    pub fn to_cells(&self) -> Vec<String> {
        let mut cells = Vec::with_capacity(REQUIRED_COLUMNS + self.extra.len());
        cells.push(self.name.to_owned());
        cells.push(self.time.to_owned());
        cells.push(self.total_count.to_string());
        cells.push(self.price.to_string());
        cells.extend(self.games.iter().cloned());
        cells.extend(self.extra.iter().cloned());
        cells
    }

    /// A row is active when its trimmed name is non-empty.
    pub fn is_active(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Number of `token` occurrences across the game slots.
    pub fn count_tokens(&self, token: char) -> u64 {
        self.games
            .iter()
            .map(|cell| cell.matches(token).count() as u64)
            .sum()
    }

    /// Clears the derived columns.
    pub(crate) fn clear_derived(&mut self) {
        self.total_count = DerivedCell::Empty;
        self.price = DerivedCell::Empty;
    }
}
