use crate::types::{RawCell, RawRow, RawTableRow};

/// Rows narrower than this can't have the two dropped columns removed safely.
pub const MIN_CELLS: usize = 3;

/// Pull data rows out of one rendered page.
///
/// The first row is the header and the last is the summary footer; both are
/// skipped. Data rows lose their second- and third-to-last cells, the last
/// cell is taken from its markup (the site hides it visually) and every other
/// cell from its trimmed visible text.
pub fn extract_rows(table: &[RawTableRow]) -> Vec<RawRow> {
    if table.len() < 3 {
        return Vec::new();
    }
    table[1..table.len() - 1]
        .iter()
        .filter_map(|cells| extract_row(cells))
        .collect()
}

/// Apply the column rules to a single row. `None` for rows with too few cells.
pub fn extract_row(cells: &[RawCell]) -> Option<RawRow> {
    let k = cells.len();
    if k < MIN_CELLS {
        return None;
    }

    let mut row = Vec::with_capacity(k - 2);
    for (i, cell) in cells.iter().enumerate() {
        if i == k - 2 || i == k - 3 {
            continue;
        }
        if i == k - 1 {
            row.push(cell.html.trim().to_string());
        } else {
            row.push(cell.text.trim().to_string());
        }
    }
    Some(row)
}
