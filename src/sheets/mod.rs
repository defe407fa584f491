//! Backend seam for the remote spreadsheet service.
//!
//! The orchestrator in [`crate::upload`] only talks through [`SheetsBackend`],
//! so the REST client stays a thin adapter and tests can substitute an
//! in-memory worksheet.

pub mod auth;
pub mod rest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::SheetsError;

/// Opaque cell formatting, carried verbatim as the service's
/// `userEnteredFormat` JSON. Copying a format never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellFormat(pub serde_json::Value);

/// One cell of the batched row write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub cell: String,
    pub value: String,
}

impl CellUpdate {
    pub fn new(cell: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            cell: cell.into(),
            value: value.into(),
        }
    }
}

/// Operations the upload path needs from a spreadsheet already opened by
/// name. All addressing is A1 within a named worksheet.
#[async_trait]
pub trait SheetsBackend {
    async fn worksheet_exists(&self, title: &str) -> Result<bool, SheetsError>;

    /// Populated cells of a 1-indexed column, in row order. Trailing empty
    /// rows are not represented.
    async fn col_values(&self, title: &str, col: u32) -> Result<Vec<String>, SheetsError>;

    /// The user-entered format of one cell, if any was ever set.
    async fn cell_format(
        &self,
        title: &str,
        cell: &str,
    ) -> Result<Option<CellFormat>, SheetsError>;

    async fn format_cell(
        &self,
        title: &str,
        cell: &str,
        format: &CellFormat,
    ) -> Result<(), SheetsError>;

    /// Applies all updates as a single batched values write.
    async fn batch_update(&self, title: &str, updates: &[CellUpdate]) -> Result<(), SheetsError>;
}
