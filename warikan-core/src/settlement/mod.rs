//! Classification of expenditures and the owner/spouse settlement.

mod calculator;
mod matcher;

pub use calculator::{calculate, owner_share, settle};
pub use matcher::{classify, PartyMatcher};
