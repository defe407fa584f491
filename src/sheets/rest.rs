//! Thin reqwest client over the Sheets v4 and Drive v3 REST surfaces.
//!
//! Only the five operations the upload path needs are wrapped; everything
//! else about the service stays a black box. Requests are issued one at a
//! time, mirroring the single-operator batch use of the tool.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;

use crate::address::{CellAddress, column_letters};
use crate::errors::SheetsError;
use crate::sheets::auth::{self, ServiceAccountKey};
use crate::sheets::{CellFormat, CellUpdate, SheetsBackend};

const SHEETS_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// A client bound to one spreadsheet, resolved by name at connect time.
pub struct RestSheets {
    http: reqwest::Client,
    token: String,
    spreadsheet_id: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    #[serde(rename = "sheetId")]
    sheet_id: i64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct ColumnValues {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl RestSheets {
    /// Authenticates with the credential file and resolves `spreadsheet_name`
    /// to an id through the Drive file listing.
    pub async fn connect(
        credentials_path: &Path,
        spreadsheet_name: &str,
    ) -> Result<Self, SheetsError> {
        let key = ServiceAccountKey::load(credentials_path)?;
        let http = reqwest::Client::new();
        let token = auth::fetch_access_token(&http, &key).await?;

        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            spreadsheet_name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let response = http
            .get(DRIVE_FILES_URL)
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("fields", "files(id)"), ("pageSize", "1")])
            .send()
            .await
            .context("drive file listing request failed")
            .map_err(SheetsError::Other)?;
        let listing: DriveFileList = Self::check(response)
            .await?
            .json()
            .await
            .context("malformed drive file listing")
            .map_err(SheetsError::Other)?;

        let Some(file) = listing.files.into_iter().next() else {
            return Err(SheetsError::SpreadsheetNotFound(spreadsheet_name.to_string()));
        };
        tracing::debug!(spreadsheet_id = %file.id, "resolved spreadsheet '{spreadsheet_name}'");

        Ok(Self {
            http,
            token,
            spreadsheet_id: file.id,
        })
    }

    fn spreadsheet_url(&self, trailing: &[&str]) -> Url {
        let mut url = Url::parse(SHEETS_BASE).expect("static base url");
        {
            let mut segments = url.path_segments_mut().expect("https url has segments");
            segments.push(&self.spreadsheet_id);
            for segment in trailing {
                segments.push(segment);
            }
        }
        url
    }

    /// `POST /v4/spreadsheets/{id}:batchUpdate` — the method suffix is part
    /// of the final path segment.
    fn batch_update_url(&self) -> Url {
        let mut url = Url::parse(SHEETS_BASE).expect("static base url");
        url.path_segments_mut()
            .expect("https url has segments")
            .push(&format!("{}:batchUpdate", self.spreadsheet_id));
        url
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, SheetsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.pointer("/error/message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);
        Err(SheetsError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn metadata(&self, fields: &str) -> Result<SpreadsheetMeta, SheetsError> {
        let url = self.spreadsheet_url(&[]);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("fields", fields)])
            .send()
            .await
            .context("spreadsheet metadata request failed")
            .map_err(SheetsError::Other)?;
        Self::check(response)
            .await?
            .json()
            .await
            .context("malformed spreadsheet metadata")
            .map_err(SheetsError::Other)
    }

    async fn sheet_id(&self, title: &str) -> Result<i64, SheetsError> {
        let meta = self.metadata("sheets.properties(sheetId,title)").await?;
        meta.sheets
            .into_iter()
            .find(|entry| entry.properties.title == title)
            .map(|entry| entry.properties.sheet_id)
            .ok_or_else(|| SheetsError::WorksheetNotFound(title.to_string()))
    }

    fn quoted_range(title: &str, reference: &str) -> String {
        format!("'{}'!{}", title.replace('\'', "''"), reference)
    }
}

#[async_trait]
impl SheetsBackend for RestSheets {
    async fn worksheet_exists(&self, title: &str) -> Result<bool, SheetsError> {
        match self.sheet_id(title).await {
            Ok(_) => Ok(true),
            Err(SheetsError::WorksheetNotFound(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    async fn col_values(&self, title: &str, col: u32) -> Result<Vec<String>, SheetsError> {
        let letters = column_letters(col);
        let range = Self::quoted_range(title, &format!("{letters}:{letters}"));
        let url = self.spreadsheet_url(&["values", &range]);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("majorDimension", "COLUMNS")])
            .send()
            .await
            .context("column values request failed")
            .map_err(SheetsError::Other)?;

        let column: ColumnValues = match Self::check(response).await {
            Ok(response) => response
                .json()
                .await
                .context("malformed column values response")
                .map_err(SheetsError::Other)?,
            // The values API reports an unknown sheet as an unparseable range.
            Err(SheetsError::Api { status: 400, message })
                if message.contains("Unable to parse range") =>
            {
                return Err(SheetsError::WorksheetNotFound(title.to_string()));
            }
            Err(other) => return Err(other),
        };

        Ok(column
            .values
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|value| match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect())
    }

    async fn cell_format(
        &self,
        title: &str,
        cell: &str,
    ) -> Result<Option<CellFormat>, SheetsError> {
        let url = self.spreadsheet_url(&[]);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&[
                ("ranges", Self::quoted_range(title, cell).as_str()),
                ("fields", "sheets(data(rowData(values(userEnteredFormat))))"),
            ])
            .send()
            .await
            .context("cell format request failed")
            .map_err(SheetsError::Other)?;
        let grid: serde_json::Value = Self::check(response)
            .await?
            .json()
            .await
            .context("malformed cell format response")
            .map_err(SheetsError::Other)?;

        Ok(grid
            .pointer("/sheets/0/data/0/rowData/0/values/0/userEnteredFormat")
            .filter(|format| !format.is_null())
            .cloned()
            .map(CellFormat))
    }

    async fn format_cell(
        &self,
        title: &str,
        cell: &str,
        format: &CellFormat,
    ) -> Result<(), SheetsError> {
        let address = CellAddress::parse(cell)
            .with_context(|| format!("invalid cell reference '{cell}'"))
            .map_err(SheetsError::Other)?;
        let sheet_id = self.sheet_id(title).await?;

        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": address.row - 1,
                        "endRowIndex": address.row,
                        "startColumnIndex": address.col - 1,
                        "endColumnIndex": address.col,
                    },
                    "cell": { "userEnteredFormat": format.0 },
                    "fields": "userEnteredFormat",
                }
            }]
        });

        let url = self.batch_update_url();
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("format write request failed")
            .map_err(SheetsError::Other)?;
        Self::check(response).await?;
        Ok(())
    }

    async fn batch_update(&self, title: &str, updates: &[CellUpdate]) -> Result<(), SheetsError> {
        let data: Vec<_> = updates
            .iter()
            .map(|update| {
                json!({
                    "range": Self::quoted_range(title, &update.cell),
                    "values": [[update.value]],
                })
            })
            .collect();
        let body = json!({
            "valueInputOption": "USER_ENTERED",
            "data": data,
        });

        let url = self.spreadsheet_url(&["values:batchUpdate"]);
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("batched values write failed")
            .map_err(SheetsError::Other)?;
        Self::check(response).await?;
        Ok(())
    }
}
