//! Warikan core
//!
//! Splits a household ledger between two parties.
//!
//! - `record_parser`: decoded ledger rows into [`ExpenseRecord`]s
//! - `settlement`: classifies expenditures by owner, spouse or shared and
//!   computes who owes whom
//!
//! Both are pure: no I/O beyond the reader handed in, no shared state.
//! Degraded-data events are reported through `tracing` and are silent
//! unless the host installs a subscriber.
//!
//! # Example
//!
//! ```rust,ignore
//! use warikan_core::{calculate, LedgerReader};
//! use shared_types::Settings;
//!
//! let (_header, records) = LedgerReader::new().read_ledger(text.as_bytes())?;
//! let result = calculate(&records, &Settings::default());
//! ```

pub mod record_parser;
pub mod settlement;

pub use record_parser::{parse_amount, parse_records, LedgerReader, Records};
pub use settlement::{calculate, classify, PartyMatcher};

pub use shared_types::{
    CalculationResult, CalculationTarget, ExpenseRecord, LedgerError, Settings,
};
