//! Wire models for the remote export function
//!
//! Request: `{"tableId": "Orders", "destination": "bkt"}`
//!
//! Response envelope, one of:
//! - `{"statusCode": 200, "destinationKey": "...", "destinationPath": "...", "exportStatus": "SUCCEEDED"}`
//! - `{"statusCode": 500, "message": "...", "exportStatus": "FAILED"}`
//!
//! Status check request: `{"destinationKey": "...", "destinationPath": "..."}`,
//! reply `{"exportStatus": "...", "message": "..."}` with `message` optional.

use crate::domain::{ExportOutcome, ExportStatus, RemoteCallError, StatusCheck};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest<'a> {
    pub table_id: &'a str,
    pub destination: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub status_code: u16,

    #[serde(default)]
    pub destination_key: Option<String>,

    #[serde(default)]
    pub destination_path: Option<String>,

    #[serde(default)]
    pub export_status: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl ExportResponse {
    /// Interpret the envelope
    ///
    /// `statusCode` 500 is a business failure and yields a `Failed` outcome,
    /// not an error. On success an unrecognised `exportStatus` is kept as
    /// in-progress so the caller keeps polling.
    pub fn into_outcome(self, destination: &str) -> Result<ExportOutcome, RemoteCallError> {
        match self.status_code {
            200 => {
                let key = self.destination_key.ok_or_else(|| {
                    RemoteCallError::InvalidResponse(
                        "Export succeeded without a destinationKey".to_string(),
                    )
                })?;
                let path = self
                    .destination_path
                    .unwrap_or_else(|| format!("{destination}/{key}"));
                Ok(ExportOutcome {
                    destination_key: key,
                    destination_path: path,
                    status: ExportStatus::from_wire(self.export_status.as_deref()),
                    message: self.message,
                })
            }
            500 => Ok(ExportOutcome::failed(
                self.destination_key.unwrap_or_default(),
                self.destination_path
                    .unwrap_or_else(|| destination.to_string()),
                self.message
                    .unwrap_or_else(|| "Export failed".to_string()),
            )),
            other => Err(RemoteCallError::UnexpectedStatus {
                status: other,
                message: self
                    .message
                    .unwrap_or_else(|| "Unexpected statusCode from export".to_string()),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest<'a> {
    pub destination_key: &'a str,
    pub destination_path: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[serde(default)]
    pub export_status: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn status(&self) -> ExportStatus {
        ExportStatus::from_wire(self.export_status.as_deref())
    }

    pub fn into_check(self) -> StatusCheck {
        StatusCheck {
            status: self.status(),
            message: self.message,
        }
    }
}
