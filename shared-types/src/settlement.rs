use crate::expense::ExpenseRecord;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Record field that the party patterns are matched against.
///
/// On the wire this is the ledger's own column label ("中項目", "大項目",
/// "内容", "メモ"). The English field names are accepted as aliases and any
/// other value falls back to the medium category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdentificationColumn {
    #[default]
    MediumCategory,
    LargeCategory,
    Content,
    Memo,
}

impl IdentificationColumn {
    pub fn label(&self) -> &'static str {
        match self {
            IdentificationColumn::MediumCategory => "中項目",
            IdentificationColumn::LargeCategory => "大項目",
            IdentificationColumn::Content => "内容",
            IdentificationColumn::Memo => "メモ",
        }
    }

    /// Picks the value of this column from a record
    pub fn select<'a>(&self, record: &'a ExpenseRecord) -> &'a str {
        match self {
            IdentificationColumn::MediumCategory => &record.medium_category,
            IdentificationColumn::LargeCategory => &record.large_category,
            IdentificationColumn::Content => &record.content,
            IdentificationColumn::Memo => &record.memo,
        }
    }
}

impl From<&str> for IdentificationColumn {
    fn from(value: &str) -> Self {
        match value.trim() {
            "大項目" | "large_category" => IdentificationColumn::LargeCategory,
            "内容" | "content" | "description" => IdentificationColumn::Content,
            "メモ" | "memo" => IdentificationColumn::Memo,
            _ => IdentificationColumn::MediumCategory,
        }
    }
}

impl From<String> for IdentificationColumn {
    fn from(value: String) -> Self {
        IdentificationColumn::from(value.as_str())
    }
}

impl From<IdentificationColumn> for String {
    fn from(column: IdentificationColumn) -> Self {
        column.label().to_string()
    }
}

/// Calculation settings supplied with every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct Settings {
    #[ts(type = "string")]
    pub identification_column: IdentificationColumn,
    /// Regular expression identifying owner-paid expenditures
    pub owner_pattern: String,
    /// Regular expression identifying spouse-paid expenditures
    pub spouse_pattern: String,
    /// Owner's share of the total, in percent
    pub owner_ratio: f64,
    /// Accepted for display only; the spouse share is always derived
    pub spouse_ratio: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            identification_column: IdentificationColumn::default(),
            owner_pattern: String::new(),
            spouse_pattern: String::new(),
            owner_ratio: 50.0,
            spouse_ratio: 50.0,
        }
    }
}

/// Who pays whom once the period is settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub enum SettlementDirection {
    #[serde(rename = "配偶者から代表者へ")]
    SpouseToOwner,
    #[serde(rename = "代表者から配偶者へ")]
    OwnerToSpouse,
    #[serde(rename = "精算不要")]
    None,
}

impl SettlementDirection {
    pub fn label(&self) -> &'static str {
        match self {
            SettlementDirection::SpouseToOwner => "配偶者から代表者へ",
            SettlementDirection::OwnerToSpouse => "代表者から配偶者へ",
            SettlementDirection::None => "精算不要",
        }
    }
}

/// Outcome of a settlement calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CalculationResult {
    pub period: String,
    #[ts(type = "number")]
    pub owner_total: i64,
    #[ts(type = "number")]
    pub spouse_total: i64,
    #[ts(type = "number")]
    pub total_expense: i64,
    #[ts(type = "number")]
    pub owner_share: i64,
    #[ts(type = "number")]
    pub spouse_share: i64,
    /// Always non-negative; see `settlement_direction`
    #[ts(type = "number")]
    pub settlement_amount: i64,
    pub settlement_direction: SettlementDirection,
    pub owner_count: usize,
    pub spouse_count: usize,
    pub shared_count: usize,
    pub records: Vec<ExpenseRecord>,
}

/// Request body for the calculate endpoint
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct CalculateRequest {
    pub records: Vec<ExpenseRecord>,
    #[serde(default)]
    pub settings: Settings,
}

/// Response for the upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UploadResponse {
    pub headers: Vec<String>,
    pub records: Vec<ExpenseRecord>,
}
