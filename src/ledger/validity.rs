use crate::ledger::{LedgerError, TallyRules, Table, FIRST_GAME_COL, GAME_SLOTS, REQUIRED_COLUMNS};
use crate::spreadsheet::reference::index_to_col;

/// A game column whose token total does not split into whole groups.
#[derive(Clone, Debug, PartialEq)]
pub struct ImbalancedColumn {
    /// Column label as shown in the grid
    pub label: String,
    /// Spreadsheet column letter (e.g. "E")
    pub reference: String,
    /// Tokens found in the column
    pub tokens: u64,
}

/// Flags the game columns whose raw token sum over rows `[0, last_active_row_index)` is not
/// a multiple of the group size. Blank-name rows are counted too.
///
/// Fails with [`LedgerError::InsufficientColumns`] when the grid exposes fewer than 24
/// columns.
pub fn check_columns(
    table: &Table,
    last_active_row_index: usize,
    rules: &TallyRules,
) -> Result<Vec<ImbalancedColumn>, LedgerError> {
    if table.width() < REQUIRED_COLUMNS {
        return Err(LedgerError::InsufficientColumns {
            found: table.width(),
            required: REQUIRED_COLUMNS,
        });
    }

    let last = last_active_row_index.min(table.rows.len());
    let mut totals = [0u64; GAME_SLOTS];
    for row in &table.rows[..last] {
        for (total, cell) in totals.iter_mut().zip(row.games.iter()) {
            *total += cell.matches(rules.token).count() as u64;
        }
    }

    let imbalanced = totals
        .iter()
        .enumerate()
        .filter(|(_, tokens)| !rules.is_balanced(**tokens))
        .map(|(slot, tokens)| ImbalancedColumn {
            label: table.game_label(slot),
            reference: index_to_col(FIRST_GAME_COL + slot),
            tokens: *tokens,
        })
        .collect();
    Ok(imbalanced)
}
