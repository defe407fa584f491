use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use metrics_sheet::cli::Cli;
use metrics_sheet::config::UploadConfig;
use metrics_sheet::metrics::{IMAGE_QUALITY_KEYS, MetricRecord, POSE_ERROR_KEYS};
use metrics_sheet::sheets::rest::RestSheets;
use metrics_sheet::upload::{UploadRequest, upload_results};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = UploadConfig::from_args(Cli::parse());
    run(config).await;
    Ok(())
}

/// Upload failures are reported, not propagated: only CLI misuse (handled by
/// clap before we get here) exits non-zero.
async fn run(config: UploadConfig) {
    let image_quality = MetricRecord::from_file(&config.test_metrics_path, IMAGE_QUALITY_KEYS);
    let pose_error = MetricRecord::from_file(&config.pose_metrics_path, POSE_ERROR_KEYS);

    let request = UploadRequest {
        sheet: config.worksheet.clone(),
        method: config.method_name.clone(),
        image_quality,
        pose_error,
    };

    let outcome = async {
        let backend = RestSheets::connect(&config.credentials_path, &config.spreadsheet_name).await?;
        upload_results(&backend, &request).await
    }
    .await;

    match outcome {
        Ok(outcome) => {
            tracing::debug!(row = outcome.row, "upload finished");
            println!("✅ Data uploaded successfully!");
        }
        Err(error) => {
            tracing::debug!("upload aborted: {error:?}");
            eprintln!("{}", error.console_message());
        }
    }
}
