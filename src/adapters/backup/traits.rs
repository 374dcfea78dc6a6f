//! Backup lookup traits

use crate::domain::{BackupRef, BackupSummary, LocateError, RemoteCallError, TableId};
use async_trait::async_trait;

/// Finds the most recent backup of a table
///
/// Implementations never retry; a failed lookup fails the table's run.
#[async_trait]
pub trait BackupLocator: Send + Sync {
    /// Locate the latest backup of `table_id`
    ///
    /// # Errors
    ///
    /// - [`LocateError::NotFound`] if the table has no backups
    /// - [`LocateError::Remote`] if the catalog could not be queried
    async fn locate(&self, table_id: &TableId) -> Result<BackupRef, LocateError>;
}

/// Lists every backup the catalog holds for a table
#[async_trait]
pub trait BackupCatalog: Send + Sync {
    async fn list_backups(&self, table_id: &TableId)
        -> Result<Vec<BackupSummary>, RemoteCallError>;
}
