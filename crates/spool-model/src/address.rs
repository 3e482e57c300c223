//! Spreadsheet cell addressing.
//!
//! Rows and columns are **0-indexed** everywhere in the model:
//! - `row = 0` is spreadsheet row `1`
//! - `col = 0` is spreadsheet column `A`

/// Converts a 0-based column index to its spreadsheet name (`0 -> A`, `26 -> AA`).
pub fn column_name(index: usize) -> String {
    // Bijective base 26: there is no zero digit.
    let mut n = index + 1;
    let mut out = Vec::<u8>::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    out.into_iter().map(char::from).collect()
}

/// Converts a spreadsheet column name back to its 0-based index.
///
/// Accepts lower or upper case letters. Returns `None` for an empty name,
/// any non-letter, or overflow.
pub fn column_index(name: &str) -> Option<usize> {
    let mut col: usize = 0;
    for b in name.bytes() {
        if !b.is_ascii_alphabetic() {
            return None;
        }
        let v = (b.to_ascii_uppercase() - b'A') as usize + 1;
        col = col.checked_mul(26)?.checked_add(v)?;
    }
    col.checked_sub(1)
}

/// Spreadsheet rows are counted from 1.
#[inline]
pub const fn excel_row(row: usize) -> usize {
    row + 1
}

/// A1-style address of a 0-based `(row, col)` pair.
pub fn cell_address(row: usize, col: usize) -> String {
    format!("{}{}", column_name(col), excel_row(row))
}
