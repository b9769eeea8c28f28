use super::parse_records;
use csv::ReaderBuilder;
use shared_types::{ExpenseRecord, LedgerError};
use std::io::Read;
use tracing::debug;

/// Reads decoded ledger CSV text into rows.
///
/// Row length is not enforced here; short rows are left for the record
/// parser to drop. Only a malformed CSV envelope is an error.
pub struct LedgerReader {
    delimiter: u8,
}

impl LedgerReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn read_rows<R: Read>(&self, input: R) -> Result<Vec<Vec<String>>, LedgerError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| LedgerError::Csv {
                line: e.position().map(|p| p.line()).unwrap_or_default(),
                message: e.to_string(),
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        debug!(rows = rows.len(), "Read ledger rows");
        Ok(rows)
    }

    /// Reads `input` and returns the header and every parsed record
    pub fn read_ledger<R: Read>(
        &self,
        input: R,
    ) -> Result<(Vec<String>, Vec<ExpenseRecord>), LedgerError> {
        let rows = self.read_rows(input)?;
        let (header, records) = parse_records(rows);
        let records: Vec<ExpenseRecord> = records.collect();

        debug!(records = records.len(), "Parsed ledger records");
        Ok((header, records))
    }
}

impl Default for LedgerReader {
    fn default() -> Self {
        Self::new()
    }
}
