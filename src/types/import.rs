//! Import types for spreadsheet ingestion

use serde::{Deserialize, Serialize};

/// One chunk-level failure. `batch` is the 1-based chunk ordinal.
/// `message` carries a failed primary insert, `deals` a failed dependent deal insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    pub batch: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals: Option<String>,
}

impl BatchError {
    pub fn records(batch: usize, message: impl Into<String>) -> Self {
        Self {
            batch,
            message: Some(message.into()),
            deals: None,
        }
    }

    pub fn deals(batch: usize, message: impl Into<String>) -> Self {
        Self {
            batch,
            message: None,
            deals: Some(message.into()),
        }
    }
}

/// Result of a client spreadsheet import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientImportSummary {
    pub success: bool,
    pub imported: usize,
    pub imported_clients: usize,
    pub imported_deals: usize,
    /// Rows that survived normalization
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchError>,
}

/// Result of a lead account import
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountImportSummary {
    pub success: bool,
    pub imported: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchError>,
}

/// Request to open a deal for every client that has none
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDealsRequest {
    pub country: Option<String>,
}

/// Result of the deal backfill
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealBackfillSummary {
    pub success: bool,
    pub created: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<BatchError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
