use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy for the upload path. Each variant maps to one of the
/// categorized console messages; metric-file parse problems never reach this
/// enum (the parser recovers with a zero-filled record).
#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("credential file '{0}' not found")]
    CredentialsMissing(PathBuf),

    #[error("spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),

    #[error("worksheet '{0}' not found")]
    WorksheetNotFound(String),

    #[error("sheets api error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SheetsError {
    /// The console line printed when an upload aborts, matching the
    /// original tool's wording per category.
    pub fn console_message(&self) -> String {
        match self {
            SheetsError::CredentialsMissing(path) => {
                format!("❌ Error: '{}' not found.", path.display())
            }
            SheetsError::SpreadsheetNotFound(name) => {
                format!("❌ Error: Spreadsheet '{name}' not found.")
            }
            SheetsError::WorksheetNotFound(name) => {
                format!("❌ Error: Worksheet '{name}' not found.")
            }
            other => format!("❌ Unexpected error: {other}"),
        }
    }
}
