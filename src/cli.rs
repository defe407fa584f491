use clap::Parser;
use std::path::PathBuf;

use crate::config::{DEFAULT_CREDENTIALS_PATH, DEFAULT_SPREADSHEET_NAME};

#[derive(Debug, Parser)]
#[command(
    name = "metrics-sheet",
    version,
    about = "Append evaluation metrics as a row of a Google Sheets worksheet"
)]
pub struct Cli {
    /// File with the image-quality metrics line (PSNR, SSIM, LPIPS)
    pub test_metrics: PathBuf,

    /// File with the pose-error metrics line (RPE_trans, RPE_rot, ATE)
    pub pose_metrics: PathBuf,

    /// Method label written into column B
    pub method_name: String,

    /// Worksheet title inside the spreadsheet
    pub sheet_name: String,

    /// Service-account credential file
    #[arg(long, env = "METRICS_SHEET_CREDENTIALS", default_value = DEFAULT_CREDENTIALS_PATH)]
    pub credentials: PathBuf,

    /// Spreadsheet name, resolved via the Drive file listing
    #[arg(long, env = "METRICS_SHEET_SPREADSHEET", default_value = DEFAULT_SPREADSHEET_NAME)]
    pub spreadsheet: String,
}
