//! A1-style cell addressing helpers.

/// Converts a 1-indexed column number into its letter form (1 -> "A", 27 -> "AA").
pub fn column_letters(col: u32) -> String {
    debug_assert!(col >= 1);
    let mut col = col;
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).expect("ascii letters")
}

/// Builds an A1 cell reference from 1-indexed column and row.
pub fn cell(col: u32, row: u32) -> String {
    format!("{}{}", column_letters(col), row)
}

/// A parsed A1 reference, both components 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAddress {
    pub col: u32,
    pub row: u32,
}

impl CellAddress {
    pub fn parse(s: &str) -> Option<Self> {
        let split_idx = s.find(|c: char| c.is_ascii_digit())?;
        let (col_str, row_str) = s.split_at(split_idx);

        let row = row_str.parse::<u32>().ok()?;
        if row == 0 {
            return None;
        }
        let col = col_from_letters(col_str)?;
        Some(Self { col, row })
    }
}

fn col_from_letters(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut col = 0;
    for c in s.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    Some(col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letters() {
        assert_eq!(column_letters(1), "A");
        assert_eq!(column_letters(2), "B");
        assert_eq!(column_letters(8), "H");
        assert_eq!(column_letters(26), "Z");
        assert_eq!(column_letters(27), "AA");
        assert_eq!(column_letters(52), "AZ");
        assert_eq!(column_letters(53), "BA");
    }

    #[test]
    fn test_parse_round_trips() {
        let parsed = CellAddress::parse("H14").unwrap();
        assert_eq!(parsed, CellAddress { col: 8, row: 14 });
        assert_eq!(cell(parsed.col, parsed.row), "H14");

        let parsed = CellAddress::parse("aa3").unwrap();
        assert_eq!(parsed, CellAddress { col: 27, row: 3 });
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CellAddress::parse("12").is_none());
        assert!(CellAddress::parse("B0").is_none());
        assert!(CellAddress::parse("B-1").is_none());
        assert!(CellAddress::parse("").is_none());
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(2, 1), "B1");
        assert_eq!(cell(8, 14), "H14");
        assert_eq!(cell(28, 3), "AB3");
    }
}
