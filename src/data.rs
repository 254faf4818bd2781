//! Mock datasets rendered into the report tables.

use std::ops::Range;

use chrono::{Days, NaiveDate};
use rand::Rng;

/// Number of rows in the generated ledger.
pub const LEDGER_ROWS: usize = 30;

/// Half-open range from which debit and credit amounts are sampled.
pub const AMOUNT_RANGE: Range<u32> = 100..1000;

/// Format used when printing ledger dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column captions of the ledger table.
pub const LEDGER_HEADER: [&str; 3] = ["Date", "Debit", "Credit"];

/// Number of rows in the placeholder grid.
pub const PLACEHOLDER_ROWS: usize = 20;

/// Number of columns in the placeholder grid.
pub const PLACEHOLDER_COLUMNS: usize = 10;

/// Text repeated in every placeholder cell.
pub const PLACEHOLDER_TEXT: &str = "sample";

/// First date of the generated ledger (2023-10-01).
pub fn ledger_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 1).unwrap_or_default()
}

/// A single ledger entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerRow {
    /// Booking date.
    pub date: NaiveDate,
    /// Debit amount.
    pub debit: u32,
    /// Credit amount.
    pub credit: u32,
}

impl LedgerRow {
    /// Returns the row as printable table cells.
    pub fn cells(&self) -> [String; 3] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.debit.to_string(),
            self.credit.to_string(),
        ]
    }
}

/// Generates the 30-row sample ledger using the thread-local random generator.
pub fn generate_ledger() -> Vec<LedgerRow> {
    generate_ledger_with(&mut rand::rng(), ledger_start_date(), LEDGER_ROWS)
}

/// Generates `rows` consecutive daily ledger entries starting at `start`.
///
/// Debit and credit are drawn independently from [`AMOUNT_RANGE`]. Dates that would overflow the
/// calendar end the ledger early.
pub fn generate_ledger_with<R: Rng>(
    rng: &mut R,
    start: NaiveDate,
    rows: usize,
) -> Vec<LedgerRow> {
    (0..rows)
        .map_while(|offset| start.checked_add_days(Days::new(offset as u64)))
        .map(|date| LedgerRow {
            date,
            debit: rng.random_range(AMOUNT_RANGE),
            credit: rng.random_range(AMOUNT_RANGE),
        })
        .collect()
}

/// Fixed-size table of identical filler cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderGrid {
    rows: Vec<Vec<String>>,
}

impl PlaceholderGrid {
    /// Creates a grid with `rows` × `columns` copies of `text`.
    pub fn filled(rows: usize, columns: usize, text: &str) -> Self {
        Self {
            rows: vec![vec![text.to_owned(); columns]; rows],
        }
    }

    /// Returns the grid rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Returns the number of columns, taken from the first row.
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Generates the 20×10 placeholder grid.
pub fn generate_placeholder_grid() -> PlaceholderGrid {
    PlaceholderGrid::filled(PLACEHOLDER_ROWS, PLACEHOLDER_COLUMNS, PLACEHOLDER_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn ledger_has_thirty_consecutive_days() {
        let ledger = generate_ledger();
        assert_eq!(ledger.len(), LEDGER_ROWS);
        assert_eq!(ledger[0].date, ledger_start_date());
        for pair in ledger.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
        assert_eq!(ledger[29].cells()[0], "2023-10-30");
    }

    #[test]
    fn ledger_amounts_stay_in_range() {
        for row in generate_ledger() {
            assert!(AMOUNT_RANGE.contains(&row.debit), "debit {}", row.debit);
            assert!(AMOUNT_RANGE.contains(&row.credit), "credit {}", row.credit);
        }
    }

    #[test]
    fn seeded_ledgers_are_reproducible() {
        let a = generate_ledger_with(&mut StdRng::seed_from_u64(7), ledger_start_date(), 30);
        let b = generate_ledger_with(&mut StdRng::seed_from_u64(7), ledger_start_date(), 30);
        assert_eq!(a, b);
    }

    #[test]
    fn ledger_crosses_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let ledger = generate_ledger_with(&mut StdRng::seed_from_u64(1), start, 3);
        let dates: Vec<_> = ledger.iter().map(|row| row.cells()[0].clone()).collect();
        assert_eq!(dates, ["2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn ledger_stops_at_calendar_end() {
        let ledger = generate_ledger_with(&mut StdRng::seed_from_u64(1), NaiveDate::MAX, 5);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn placeholder_grid_is_twenty_by_ten() {
        let grid = generate_placeholder_grid();
        assert_eq!(grid.rows().len(), PLACEHOLDER_ROWS);
        assert_eq!(grid.column_count(), PLACEHOLDER_COLUMNS);
        assert!(grid
            .rows()
            .iter()
            .all(|row| row.len() == 10 && row.iter().all(|cell| cell == PLACEHOLDER_TEXT)));
    }
}
