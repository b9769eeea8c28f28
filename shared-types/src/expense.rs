use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// Which party an expenditure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum CalculationTarget {
    Owner,
    Spouse,
    Shared,
}

impl CalculationTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationTarget::Owner => "owner",
            CalculationTarget::Spouse => "spouse",
            CalculationTarget::Shared => "shared",
        }
    }

    /// Parses a wire value, returning `None` for anything that is not a
    /// classification (the ledger's own flag column carries "0"/"1").
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "owner" => Some(CalculationTarget::Owner),
            "spouse" => Some(CalculationTarget::Spouse),
            "shared" => Some(CalculationTarget::Shared),
            _ => None,
        }
    }
}

/// One line of the household ledger export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct ExpenseRecord {
    /// The ledger's "計算対象" flag as uploaded, replaced by the
    /// `CalculationTarget` wire value once an expenditure is classified
    #[serde(default, deserialize_with = "nullable_string")]
    pub calculation_target: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub content: String,
    /// Negative for expenditure, positive for income
    #[serde(default)]
    #[ts(type = "number")]
    pub amount: i64,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub large_category: String,
    #[serde(default)]
    pub medium_category: String,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub transfer: String,
    #[serde(default)]
    pub id: String,
}

impl ExpenseRecord {
    pub fn is_expenditure(&self) -> bool {
        self.amount < 0
    }

    /// The classification written by the calculator, if any
    pub fn classification(&self) -> Option<CalculationTarget> {
        CalculationTarget::from_wire(&self.calculation_target)
    }

    pub fn set_classification(&mut self, target: CalculationTarget) {
        self.calculation_target = target.as_str().to_string();
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

/// Errors raised at the ledger transport boundary. Content defects inside
/// well-formed rows never produce one of these.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("Encoding error: {0}")]
    Encoding(String),
}
