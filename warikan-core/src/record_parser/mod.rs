//! Turns decoded ledger rows into typed [`ExpenseRecord`]s.
//!
//! The first row is the header. Every later row with at least
//! [`MIN_FIELDS`] fields becomes a record; shorter rows are dropped and an
//! unparsable amount becomes zero, so parsing never fails on content.

mod csv_reader;

pub use csv_reader::LedgerReader;

use shared_types::ExpenseRecord;
use tracing::{debug, warn};

/// Number of positional fields a ledger row must carry
pub const MIN_FIELDS: usize = 10;

/// Splits `rows` into the header and a lazy iterator over the remaining
/// rows as records.
pub fn parse_records<I>(rows: I) -> (Vec<String>, Records<I::IntoIter>)
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    debug!(columns = header.len(), "Read ledger header");

    (header, Records { rows, index: 0 })
}

/// Single-pass iterator of records produced by [`parse_records`]
pub struct Records<I> {
    rows: I,
    index: usize,
}

impl<I> Iterator for Records<I>
where
    I: Iterator<Item = Vec<String>>,
{
    type Item = ExpenseRecord;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.rows.next()?;
            self.index += 1;

            if let Some(record) = parse_row(self.index, &row) {
                return Some(record);
            }
        }
    }
}

/// Converts one data row. `index` is 1-based with the header at 0.
pub fn parse_row(index: usize, row: &[String]) -> Option<ExpenseRecord> {
    if row.len() < MIN_FIELDS {
        debug!(row = index, fields = row.len(), "Skipping short ledger row");
        return None;
    }

    let amount = match try_parse_amount(&row[3]) {
        Some(amount) => amount,
        None => {
            warn!(row = index, raw = %row[3], "Unparsable amount, treating as 0");
            0
        }
    };

    Some(ExpenseRecord {
        calculation_target: row[0].clone(),
        date: row[1].clone(),
        content: row[2].clone(),
        amount,
        institution: row[4].clone(),
        large_category: row[5].clone(),
        medium_category: row[6].clone(),
        memo: row[7].clone(),
        transfer: row[8].clone(),
        id: row[9].clone(),
    })
}

/// Parses a ledger amount such as `-1,234`, yielding 0 when it is not an
/// integer.
pub fn parse_amount(raw: &str) -> i64 {
    try_parse_amount(raw).unwrap_or(0)
}

fn try_parse_amount(raw: &str) -> Option<i64> {
    raw.replace(',', "").parse().ok()
}
