use crate::config::ChangeDetection;
use crate::db::models::StoredRow;
use crate::db::Snapshot;
use crate::types::ScrapedRow;

/// Does `row` carry new information relative to the snapshot?
///
/// A security the snapshot has never seen is always new. Otherwise the row
/// is compared with the latest stored row for that security, on Trades only
/// or on all seven value columns depending on `mode`.
pub fn is_changed(row: &ScrapedRow, snapshot: &Snapshot, mode: ChangeDetection) -> bool {
    match snapshot.get(&row.security_description) {
        None => true,
        Some(stored) => differs(row, stored, mode),
    }
}

fn differs(row: &ScrapedRow, stored: &StoredRow, mode: ChangeDetection) -> bool {
    match mode {
        ChangeDetection::TradesOnly => row.trades != stored.trades,
        ChangeDetection::AllFields => {
            row.trades != stored.trades
                || row.tta != stored.tta
                || row.open != stored.open
                || row.high != stored.high
                || row.low != stored.low
                || row.ltp != stored.ltp
                || row.lty != stored.lty
        }
    }
}

/// Rows from `rows` that should be written, in their original order.
pub fn changed_rows(rows: &[ScrapedRow], snapshot: &Snapshot, mode: ChangeDetection) -> Vec<ScrapedRow> {
    rows.iter()
        .filter(|row| is_changed(row, snapshot, mode))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped(desc: &str, trades: i64) -> ScrapedRow {
        ScrapedRow {
            security_description: desc.to_string(),
            trades,
            tta: 250.0,
            open: Some(99.0),
            high: Some(99.4),
            low: Some(98.9),
            ltp: Some(99.1),
            lty: Some(7.05),
        }
    }

    fn snapshot_of(rows: &[ScrapedRow]) -> Snapshot {
        Snapshot::from_rows(rows.iter().map(StoredRow::from))
    }

    #[test]
    fn unknown_security_is_always_new() {
        let row = scraped("ABC", 10);
        for mode in [ChangeDetection::TradesOnly, ChangeDetection::AllFields] {
            assert!(is_changed(&row, &Snapshot::default(), mode));
            assert!(is_changed(&row, &snapshot_of(&[scraped("XYZ", 10)]), mode));
        }
    }

    #[test]
    fn identical_row_is_unchanged() {
        let row = scraped("ABC", 10);
        let snapshot = snapshot_of(&[row.clone()]);
        for mode in [ChangeDetection::TradesOnly, ChangeDetection::AllFields] {
            assert!(!is_changed(&row, &snapshot, mode));
        }
    }

    #[test]
    fn trades_difference_is_seen_in_both_modes() {
        let snapshot = snapshot_of(&[scraped("ABC", 10)]);
        let row = scraped("ABC", 11);
        assert!(is_changed(&row, &snapshot, ChangeDetection::TradesOnly));
        assert!(is_changed(&row, &snapshot, ChangeDetection::AllFields));
    }

    #[test]
    fn price_only_change_needs_all_fields_mode() {
        let snapshot = snapshot_of(&[scraped("ABC", 10)]);
        let mut row = scraped("ABC", 10);
        row.ltp = Some(99.3);
        assert!(!is_changed(&row, &snapshot, ChangeDetection::TradesOnly));
        assert!(is_changed(&row, &snapshot, ChangeDetection::AllFields));

        let mut row = scraped("ABC", 10);
        row.lty = None;
        assert!(is_changed(&row, &snapshot, ChangeDetection::AllFields));
    }

    #[test]
    fn compares_against_latest_stored_row() {
        let snapshot = snapshot_of(&[scraped("ABC", 10), scraped("ABC", 12)]);
        assert!(!is_changed(&scraped("ABC", 12), &snapshot, ChangeDetection::AllFields));
        assert!(is_changed(&scraped("ABC", 10), &snapshot, ChangeDetection::AllFields));
    }

    #[test]
    fn same_inputs_same_answer() {
        let snapshot = snapshot_of(&[scraped("ABC", 10)]);
        let row = scraped("ABC", 11);
        let first = is_changed(&row, &snapshot, ChangeDetection::AllFields);
        for _ in 0..10 {
            assert_eq!(is_changed(&row, &snapshot, ChangeDetection::AllFields), first);
        }
    }

    #[test]
    fn changed_rows_filters_and_keeps_order() {
        let snapshot = snapshot_of(&[scraped("ABC", 10)]);
        let rows = vec![scraped("NEW", 1), scraped("ABC", 10), scraped("ABC2", 3)];
        let changed = changed_rows(&rows, &snapshot, ChangeDetection::AllFields);
        let names: Vec<&str> = changed.iter().map(|r| r.security_description.as_str()).collect();
        assert_eq!(names, vec!["NEW", "ABC2"]);
    }
}
