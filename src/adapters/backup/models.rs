//! Wire models for the remote backup lookup function
//!
//! Request: `{"tableId": "Orders"}`
//!
//! Response envelope, one of:
//! - `{"statusCode": 200, "backupRef": "...", "backupCreationTime": "..."}`
//! - `{"statusCode": 404}`
//! - `{"statusCode": 500, "message": "..."}`

use crate::domain::{BackupRef, LocateError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateRequest<'a> {
    pub table_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocateResponse {
    pub status_code: u16,

    #[serde(default)]
    pub backup_ref: Option<String>,

    #[serde(default)]
    pub backup_creation_time: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

impl LocateResponse {
    /// Interpret the envelope for `table_id`
    pub fn into_result(self, table_id: &str) -> Result<BackupRef, LocateError> {
        match self.status_code {
            200 => {
                let arn = self.backup_ref.ok_or_else(|| {
                    LocateError::Remote("Lookup succeeded without a backupRef".to_string())
                })?;
                let raw_time = self.backup_creation_time.ok_or_else(|| {
                    LocateError::Remote("Lookup succeeded without a backupCreationTime".to_string())
                })?;
                let created_at = parse_backup_time(&raw_time).map_err(LocateError::Remote)?;
                Ok(BackupRef::new(arn, created_at))
            }
            404 => Err(LocateError::NotFound {
                table_id: table_id.to_string(),
            }),
            500 => Err(LocateError::Remote(
                self.message
                    .unwrap_or_else(|| "Backup lookup failed".to_string()),
            )),
            other => Err(LocateError::Remote(format!(
                "Unexpected statusCode {other} from backup lookup"
            ))),
        }
    }
}

/// Parse a backup creation time
///
/// Accepts RFC 3339 as well as the `YYYY-MM-DD HH:MM:SS[.ffffff][+HH:MM]`
/// form produced by stringifying a datetime. Values without an offset are
/// taken as UTC.
pub fn parse_backup_time(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }

    Err(format!("Unrecognised backupCreationTime '{raw}'"))
}
