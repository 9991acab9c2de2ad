use crate::ledger::Table;

/// One past the index of the last row with a non-blank name, or 0 when there is none.
///
/// Rows are scanned in their original order; blank rows before the last named row stay
/// inside the range.
pub fn last_active_row_index(table: &Table) -> usize {
    table
        .rows
        .iter()
        .rposition(|row| row.is_active())
        .map(|index| index + 1)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Row;

    fn table(names: &[&str]) -> Table {
        let rows = names
            .iter()
            .map(|name| Row {
                name: name.to_string(),
                ..Row::default()
            })
            .collect();
        Table::new(Vec::new(), rows)
    }

    #[test]
    fn empty_table() {
        assert_eq!(last_active_row_index(&Table::default()), 0);
    }

    #[test]
    fn no_names() {
        assert_eq!(last_active_row_index(&table(&["", "  ", "\t"])), 0);
    }

    #[test]
    fn last_named_row_wins() {
        assert_eq!(last_active_row_index(&table(&["Ann", "", "Bo", "", ""])), 3);
        assert_eq!(last_active_row_index(&table(&["", "", "Cy"])), 3);
    }

    #[test]
    fn duplicate_names_are_independent() {
        assert_eq!(last_active_row_index(&table(&["Ann", "Ann", "", "Ann"])), 4);
    }
}
