use crate::ledger::{default_label, Row, Table, REQUIRED_COLUMNS};

/// Sample players pre-filled in a new sheet: name, arrival time and the game slots
/// already marked as played.
const SAMPLE_PLAYERS: &[(&str, &str, &[usize])] = &[
    ("is", "18:00", &[0]),
    ("ploy", "18:00", &[0]),
    ("mart", "18:00", &[1]),
    ("voy", "18:00", &[1]),
    ("jump", "18:00", &[2]),
    ("tong", "18:00", &[2]),
    ("k", "18:00", &[2]),
    ("song", "18:00", &[2]),
    ("nice", "18:00", &[1]),
    ("nut", "18:00", &[0, 1]),
    ("temp", "18:00", &[0, 1]),
    ("pin", "18:00", &[0]),
];

/// A starter table: the full 24 column header and a few sample players.
pub fn template() -> Table {
    let columns = (0..REQUIRED_COLUMNS).map(default_label).collect();
    let mut table = Table::new(columns, Vec::new());
    for (name, time, slots) in SAMPLE_PLAYERS {
        let mut row = Row {
            name: name.to_string(),
            time: time.to_string(),
            ..Row::default()
        };
        for slot in slots.iter() {
            row.games[*slot] = "l".to_owned();
        }
        table.rows.push(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::last_active_row_index;

    #[test]
    fn template_shape() {
        let table = template();
        assert_eq!(table.width(), REQUIRED_COLUMNS);
        assert_eq!(table.columns[2], "Total /");
        assert_eq!(table.columns[23], "game20");
        assert_eq!(last_active_row_index(&table), SAMPLE_PLAYERS.len());
        assert_eq!(table.rows[2].games[1], "l");
    }

    #[test]
    fn template_tokens() {
        let table = template();
        assert_eq!(table.rows.len(), 12);
        assert_eq!(table.rows[9].name, "nut");
        assert_eq!(table.rows[9].count_tokens('l'), 2);
        assert_eq!(table.rows[11].name, "pin");
        let tokens: u64 = table.rows.iter().map(|row| row.count_tokens('l')).sum();
        assert_eq!(tokens, 14);
    }
}
