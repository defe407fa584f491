//! Row placement, formatting copy, and the single batched write.

use crate::address::cell;
use crate::config::{FORMAT_COLUMNS, METHOD_COLUMN};
use crate::errors::SheetsError;
use crate::metrics::MetricRecord;
use crate::sheets::{CellUpdate, SheetsBackend};

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub sheet: String,
    pub method: String,
    pub image_quality: MetricRecord,
    pub pose_error: MetricRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOutcome {
    /// 1-indexed row the values landed in.
    pub row: u32,
}

/// Appends one result row: verifies the worksheet, picks the first empty row
/// by counting populated cells in the method column, copies the previous
/// row's formatting, then writes method + six metrics in one batched call.
///
/// No retry and no rollback; a failure part-way leaves whatever the service
/// already applied.
pub async fn upload_results(
    backend: &dyn SheetsBackend,
    request: &UploadRequest,
) -> Result<UploadOutcome, SheetsError> {
    if !backend.worksheet_exists(&request.sheet).await? {
        return Err(SheetsError::WorksheetNotFound(request.sheet.clone()));
    }

    let populated = backend.col_values(&request.sheet, METHOD_COLUMN).await?;
    let row = populated.len() as u32 + 1;

    copy_row_format(backend, &request.sheet, row).await;

    println!("📤 Uploading to Sheet '{}', Row {row}...", request.sheet);
    println!("  Method: {}", request.method);
    println!(
        "  PSNR={}, SSIM={}, LPIPS={}",
        request.image_quality.get("PSNR"),
        request.image_quality.get("SSIM"),
        request.image_quality.get("LPIPS"),
    );
    println!(
        "  RPE_trans={}, RPE_rot={}, ATE={}",
        request.pose_error.get("RPE_trans"),
        request.pose_error.get("RPE_rot"),
        request.pose_error.get("ATE"),
    );

    let updates = row_updates(
        &request.method,
        &request.image_quality,
        &request.pose_error,
        row,
    );
    backend.batch_update(&request.sheet, &updates).await?;
    tracing::info!(sheet = %request.sheet, row, method = %request.method, "row uploaded");

    Ok(UploadOutcome { row })
}

/// The seven single-cell updates of one result row: method in column B,
/// image-quality metrics in C..E, pose-error metrics in F..H.
pub fn row_updates(
    method: &str,
    image_quality: &MetricRecord,
    pose_error: &MetricRecord,
    row: u32,
) -> Vec<CellUpdate> {
    let mut updates = vec![CellUpdate::new(cell(METHOD_COLUMN, row), method)];
    let mut col = METHOD_COLUMN + 1;
    for value in image_quality.values().chain(pose_error.values()) {
        updates.push(CellUpdate::new(cell(col, row), value));
        col += 1;
    }
    updates
}

/// Copies the format of columns B..H from the row above `dest_row`. Rows 1
/// and 2 have no usable source row (row 1 is the header), so nothing happens
/// there. Per-column read or write failures are suppressed.
pub async fn copy_row_format(backend: &dyn SheetsBackend, sheet: &str, dest_row: u32) {
    if dest_row <= 2 {
        return;
    }
    let source_row = dest_row - 1;
    for col in FORMAT_COLUMNS {
        let source = cell(col, source_row);
        let dest = cell(col, dest_row);
        match backend.cell_format(sheet, &source).await {
            Ok(Some(format)) => {
                if let Err(error) = backend.format_cell(sheet, &dest, &format).await {
                    tracing::debug!(%source, %dest, "format write skipped: {error}");
                }
            }
            Ok(None) => {}
            Err(error) => {
                tracing::debug!(%source, "format read skipped: {error}");
            }
        }
    }
}
