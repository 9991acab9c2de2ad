//! # Court Tally
//!
//! Tallies badminton court usage and computes session fees from a hand-edited attendance
//! table.
//!
//! ## Features
//!
//! - **Ledger engine**: counts usage tokens per player, prices every named row, sums the
//!   session and reconciles the per-player total against the legacy court-plus-shuttle
//!   formula
//! - **Entry checks**: flags game columns whose token total does not split into groups of
//!   four players and reports grids too narrow to check
//! - **Grid files**: reads the attendance table from CSV or Excel (`.xlsx`) and writes the
//!   computed table back out as CSV
//! - **Rendering**: lays the final table out as text or as a PNG picture with a title and
//!   boxed date
//!
//! ## Table layout
//!
//! | Column | Role                                   |
//! |--------|----------------------------------------|
//! | A      | Name, blank rows are skipped           |
//! | B      | Time, display only                     |
//! | C      | Token count, derived                   |
//! | D      | Price, derived                         |
//! | E..X   | Twenty game slots holding usage tokens |
pub mod config;
pub mod error;
pub(crate) mod helpers;
pub mod ledger;
pub mod render;
pub mod session;
pub mod spreadsheet;

pub use config::{LedgerConfig, PricingOverrides};
pub use error::{CourtTallyError, ResultMessage};
pub use ledger::{
    check_columns, compute_table, last_active_row_index, template, ImbalancedColumn, PricingParameters,
    ResultsSummary, Row, TallyRules, Table,
};
pub use session::{Session, Warning};
pub use spreadsheet::{open_source, write_csv, GridSource};
