//! Backup references returned by the backup catalog

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a point-in-time backup of a table
///
/// Set on the table's run state once the backup locator succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRef {
    /// Opaque backup identifier (ARN or catalog ID)
    pub arn: String,

    /// When the backup was taken
    pub created_at: DateTime<Utc>,
}

impl BackupRef {
    /// Create a new backup reference
    pub fn new(arn: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            arn: arn.into(),
            created_at,
        }
    }
}

/// One entry of a table's backup listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub arn: String,
    pub created_at: DateTime<Utc>,
}

impl BackupSummary {
    pub fn new(arn: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            arn: arn.into(),
            created_at,
        }
    }
}

impl From<BackupSummary> for BackupRef {
    fn from(summary: BackupSummary) -> Self {
        BackupRef::new(summary.arn, summary.created_at)
    }
}
