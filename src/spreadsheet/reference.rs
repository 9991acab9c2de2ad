//! Conversions between zero-based (row, col) indexes and A1-style cell references.

use regex::Regex;
use std::sync::LazyLock;

static REFERENCE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Z]+)([1-9]\d*)$").expect("Hardcode regex pattern"));

/// Converts a column name ("A", "AB") to a 0-based index.
pub(crate) fn col_to_index(name: &str) -> Option<usize> {
    if name.is_empty() || !name.bytes().all(|byte| byte.is_ascii_uppercase()) {
        return None;
    }
    name.bytes().try_fold(0usize, |index, byte| {
        index.checked_mul(26)?.checked_add((byte - b'A') as usize + 1)
    }).map(|index| index - 1)
}

/// Converts a 1-based row number ("1", "42") to a 0-based index.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number.parse::<usize>().ok()?.checked_sub(1)
}

/// Converts a 0-based column index to its column name.
pub(crate) fn index_to_col(col: usize) -> String {
    let mut letters = Vec::<char>::new();
    let mut remaining = col + 1;
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(char::from(b'A' + digit as u8));
        remaining = (remaining - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts a 0-based (row, col) pair to an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", index_to_col(col), row + 1)
}

/// Parses an A1-style reference ("E3") to a 0-based (row, col) pair.
pub(crate) fn reference_to_index(reference: &str) -> Option<(usize, usize)> {
    let reference = reference.to_ascii_uppercase();
    let captures = REFERENCE_PATTERN.captures(&reference)?;
    let col = col_to_index(captures.get(1)?.as_str())?;
    let row = row_to_index(captures.get(2)?.as_str())?;
    Some((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("Z"), Some(25));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(col_to_index("AZ"), Some(51));
        assert_eq!(col_to_index(""), None);
        assert_eq!(col_to_index("a1"), None);

        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(4), "E");
        assert_eq!(index_to_col(23), "X");
        assert_eq!(index_to_col(26), "AA");
        assert_eq!(index_to_col(701), "ZZ");
        assert_eq!(index_to_col(702), "AAA");
    }

    #[test]
    fn references() {
        assert_eq!(reference_to_index("A1"), Some((0, 0)));
        assert_eq!(reference_to_index("e3"), Some((2, 4)));
        assert_eq!(reference_to_index("X23"), Some((22, 23)));
        assert_eq!(reference_to_index("A0"), None);
        assert_eq!(reference_to_index("3E"), None);
        assert_eq!(index_to_reference(2, 4), "E3");
    }
}
