pub mod address;
pub mod cli;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod sheets;
pub mod upload;

pub use config::UploadConfig;
pub use errors::SheetsError;
pub use metrics::MetricRecord;
pub use sheets::{CellFormat, CellUpdate, SheetsBackend};
pub use upload::{UploadOutcome, UploadRequest, upload_results};
