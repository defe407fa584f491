use std::path::PathBuf;

use crate::cli::Cli;

pub const DEFAULT_CREDENTIALS_PATH: &str = "/workdir/gspread/account.json";
pub const DEFAULT_SPREADSHEET_NAME: &str = "EX-results";

/// Column holding the method name; also the reference column used to find
/// the next empty row.
pub const METHOD_COLUMN: u32 = 2;
/// Columns B..H receive the row values and the copied formatting.
pub const FORMAT_COLUMNS: std::ops::RangeInclusive<u32> = 2..=8;

/// Resolved invocation settings: where the credential file lives, which
/// spreadsheet to open, and what to write where.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub credentials_path: PathBuf,
    pub spreadsheet_name: String,
    pub worksheet: String,
    pub method_name: String,
    pub test_metrics_path: PathBuf,
    pub pose_metrics_path: PathBuf,
}

impl UploadConfig {
    pub fn from_args(args: Cli) -> Self {
        Self {
            credentials_path: args.credentials,
            spreadsheet_name: args.spreadsheet,
            worksheet: args.sheet_name,
            method_name: args.method_name,
            test_metrics_path: args.test_metrics,
            pose_metrics_path: args.pose_metrics,
        }
    }
}
