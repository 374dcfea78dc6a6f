//! Export by reading a table and writing it as one object

use super::traits::{Exporter, ObjectStore, TableSource};
use crate::domain::{ExportOutcome, RemoteCallError, Result, TableId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Timestamp layout used in object keys
const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%.3fZ";

/// Object key for an export of `table_id` taken at `at`
///
/// Two exports of the same table within the same millisecond produce the same
/// key; the later write overwrites the earlier one.
///
/// # Examples
///
/// ```
/// use ferry::adapters::export::export_key;
/// use ferry::domain::TableId;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
/// let key = export_key(&TableId::new("Orders").unwrap(), at);
/// assert_eq!(key, "Orders-20240501T103000.000Z");
/// ```
pub fn export_key(table_id: &TableId, at: DateTime<Utc>) -> String {
    format!("{}-{}", table_id.as_str(), at.format(KEY_TIMESTAMP_FORMAT))
}

/// Exporter that snapshots a table into an object store
pub struct SnapshotExporter<S, O> {
    source: S,
    store: O,
}

impl<S: TableSource, O: ObjectStore> SnapshotExporter<S, O> {
    pub fn new(source: S, store: O) -> Self {
        Self { source, store }
    }

    async fn write_snapshot(&self, table_id: &TableId, bucket: &str, key: &str) -> Result<usize> {
        let rows = self.source.scan(table_id).await?;
        let count = rows.len();
        let body = serde_json::to_vec(&rows)?;
        self.store.put_object(bucket, key, body).await?;
        Ok(count)
    }
}

#[async_trait]
impl<S: TableSource, O: ObjectStore> Exporter for SnapshotExporter<S, O> {
    async fn start_export(
        &self,
        table_id: &TableId,
        destination: &str,
    ) -> std::result::Result<ExportOutcome, RemoteCallError> {
        let key = export_key(table_id, Utc::now());
        let path = self.store.object_path(destination, &key);

        match self.write_snapshot(table_id, destination, &key).await {
            Ok(rows) => {
                tracing::info!(
                    table_id = %table_id,
                    destination_key = %key,
                    rows = rows,
                    "Table exported"
                );
                Ok(ExportOutcome::succeeded(key, path))
            }
            Err(e) => {
                tracing::warn!(
                    table_id = %table_id,
                    destination_key = %key,
                    error = %e,
                    "Table export failed"
                );
                Ok(ExportOutcome::failed(key, path, e.to_string()))
            }
        }
    }
}
