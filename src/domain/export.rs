//! Export handles, outcomes and status values

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an export as reported by the exporter
///
/// Only the exact strings `SUCCEEDED` and `FAILED` are terminal. Anything
/// else, including a missing value, keeps the workflow polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    /// Export finished and the object is in place
    Succeeded,
    /// Export finished without producing the object
    Failed,
    /// Export still running (or status not understood)
    InProgress,
}

impl ExportStatus {
    /// Interpret a raw status string from an exporter
    ///
    /// # Examples
    ///
    /// ```
    /// use ferry::domain::ExportStatus;
    ///
    /// assert_eq!(ExportStatus::from_wire(Some("SUCCEEDED")), ExportStatus::Succeeded);
    /// assert_eq!(ExportStatus::from_wire(Some("succeeded")), ExportStatus::InProgress);
    /// assert_eq!(ExportStatus::from_wire(None), ExportStatus::InProgress);
    /// ```
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("SUCCEEDED") => Self::Succeeded,
            Some("FAILED") => Self::Failed,
            _ => Self::InProgress,
        }
    }

    /// Whether polling can stop on this status
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
            Self::InProgress => "IN_PROGRESS",
        };
        f.write_str(s)
    }
}

/// Handle to a started export, carried through the poll loop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportHandle {
    /// Object key inside the destination, `<tableId>-<timestamp>`
    pub destination_key: String,

    /// Fully qualified location of the object
    pub destination_path: String,

    /// Last status observed for this export
    pub status: ExportStatus,
}

/// Result of one status check on a started export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCheck {
    pub status: ExportStatus,

    /// Failure detail reported alongside a `Failed` status
    pub message: Option<String>,
}

impl From<ExportStatus> for StatusCheck {
    fn from(status: ExportStatus) -> Self {
        Self {
            status,
            message: None,
        }
    }
}

/// What an exporter reports back when an export is started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOutcome {
    pub destination_key: String,
    pub destination_path: String,
    pub status: ExportStatus,

    /// Failure detail when `status` is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExportOutcome {
    /// Outcome of an export that wrote its object
    pub fn succeeded(destination_key: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            destination_key: destination_key.into(),
            destination_path: destination_path.into(),
            status: ExportStatus::Succeeded,
            message: None,
        }
    }

    /// Outcome of an export that caught an error
    pub fn failed(
        destination_key: impl Into<String>,
        destination_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            destination_key: destination_key.into(),
            destination_path: destination_path.into(),
            status: ExportStatus::Failed,
            message: Some(message.into()),
        }
    }

    /// Turn the outcome into the handle the poll loop works with
    pub fn handle(&self) -> ExportHandle {
        ExportHandle {
            destination_key: self.destination_key.clone(),
            destination_path: self.destination_path.clone(),
            status: self.status,
        }
    }
}
