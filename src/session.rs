//! Session-scoped state: the live table, the latest results and the warnings of the last
//! calculation. A session is a plain value owned by the caller; every calculation replaces
//! its table, results and warnings wholesale.

use crate::config::LedgerConfig;
use crate::ledger::{
    check_columns, compute_table, last_active_row_index, ImbalancedColumn, LedgerError, ResultsSummary, Table,
};
use chrono::NaiveDate;
use std::fmt::Display;
use tracing::{debug, info, warn};

/// Date format shown next to the table title.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Advisory conditions surfaced to the user after a calculation.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// No row has a name; nothing was computed
    NoActiveData,
    /// The grid is too narrow for the per-game check
    InsufficientColumns { found: usize, required: usize },
    /// Game columns whose token total does not split into groups
    ColumnTokenImbalance { group: u32, columns: Vec<ImbalancedColumn> },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::NoActiveData => write!(
                f,
                "No names found in the table to process. Please enter data in the 'Name' column."
            ),
            Warning::InsufficientColumns { found, required } => write!(
                f,
                "The table does not have enough columns for full game data validation \
                 (expected at least {required} columns for 'game1' to 'game20', found {found})."
            ),
            Warning::ColumnTokenImbalance { group, columns } => {
                let listed = columns
                    .iter()
                    .map(|column| format!("{} ({}, {} tokens)", column.label, column.reference, column.tokens))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Games whose token total is not divisible by {group}: {listed}")
            }
        }
    }
}

/// The state of one tallying session.
#[derive(Clone, Debug)]
pub struct Session {
    pub config: LedgerConfig,
    pub date: NaiveDate,
    pub table: Table,
    pub results: Option<ResultsSummary>,
    pub warnings: Vec<Warning>,
}

impl Session {
    pub fn new(config: LedgerConfig, date: NaiveDate, table: Table) -> Self {
        Session {
            config,
            date,
            table,
            results: None,
            warnings: Vec::new(),
        }
    }

    /// The session date as displayed next to the table title.
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Takes the edited table, checks it and computes the ledger.
    ///
    /// Without any named row the calculation is skipped, the results are cleared and
    /// [`Warning::NoActiveData`] is recorded. Column warnings never block the calculation.
    pub fn calculate(&mut self, edited: Table) -> Option<ResultsSummary> {
        self.table = edited;
        self.warnings.clear();

        let last = last_active_row_index(&self.table);
        if last == 0 {
            warn!("no named rows, calculation skipped");
            self.results = None;
            self.warnings.push(Warning::NoActiveData);
            return None;
        }

        let rules = &self.config.rules;
        match check_columns(&self.table, last, rules) {
            Err(LedgerError::InsufficientColumns { found, required }) => {
                self.warnings.push(Warning::InsufficientColumns { found, required });
            }
            Ok(columns) if !columns.is_empty() => {
                self.warnings.push(Warning::ColumnTokenImbalance {
                    group: rules.tokens_per_unit,
                    columns,
                });
            }
            Ok(_) => debug!("all game columns balanced"),
        }

        let (table, results) = compute_table(&self.table, &self.config.pricing, rules, last);
        info!(
            date = %self.date_text(),
            rows = last,
            tokens = results.total_tokens,
            net = results.net_price_total,
            delta = results.delta,
            "session calculated"
        );
        self.table = table;
        self.results = Some(results);
        self.results
    }
}
