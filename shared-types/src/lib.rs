use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod expense;
pub mod settlement;

pub use expense::{CalculationTarget, ExpenseRecord, LedgerError};
pub use settlement::{
    CalculateRequest, CalculationResult, IdentificationColumn, SettlementDirection, Settings,
    UploadResponse,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Response for the health endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct HealthResponse {
    pub status: String,
}
