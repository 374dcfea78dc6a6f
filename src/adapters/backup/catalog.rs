//! Latest-backup selection over a catalog listing

use super::traits::{BackupCatalog, BackupLocator};
use crate::domain::{BackupRef, BackupSummary, LocateError, TableId};
use async_trait::async_trait;

/// Pick the backup with the greatest creation time
///
/// Ties on creation time go to the greatest ARN so the choice does not depend
/// on listing order.
pub fn select_latest(backups: Vec<BackupSummary>) -> Option<BackupSummary> {
    backups.into_iter().max_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.arn.cmp(&b.arn))
    })
}

/// Backup locator that lists a catalog and selects the latest entry
pub struct CatalogBackupLocator<C> {
    catalog: C,
}

impl<C: BackupCatalog> CatalogBackupLocator<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

#[async_trait]
impl<C: BackupCatalog> BackupLocator for CatalogBackupLocator<C> {
    async fn locate(&self, table_id: &TableId) -> Result<BackupRef, LocateError> {
        let backups = self.catalog.list_backups(table_id).await?;

        tracing::debug!(
            table_id = %table_id,
            count = backups.len(),
            "Listed backups"
        );

        select_latest(backups)
            .map(BackupRef::from)
            .ok_or_else(|| LocateError::NotFound {
                table_id: table_id.to_string(),
            })
    }
}
