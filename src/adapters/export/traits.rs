//! Export traits

use crate::domain::{ExportHandle, ExportOutcome, RemoteCallError, Result, StatusCheck, TableId};
use async_trait::async_trait;

/// Starts table exports and reports their status
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Begin exporting the current contents of `table_id` to `destination`
    ///
    /// A failed export is an `Ok` outcome with
    /// [`ExportStatus::Failed`](crate::domain::ExportStatus::Failed);
    /// `Err` is reserved for calls that never produced an outcome.
    async fn start_export(
        &self,
        table_id: &TableId,
        destination: &str,
    ) -> std::result::Result<ExportOutcome, RemoteCallError>;

    /// Re-check the status of a started export
    ///
    /// A handle that already carries a terminal status must be reported
    /// as-is. Exporters that finish synchronously keep the default, which
    /// reports the status recorded on the handle.
    async fn export_status(
        &self,
        handle: &ExportHandle,
    ) -> std::result::Result<StatusCheck, RemoteCallError> {
        Ok(handle.status.into())
    }
}

/// Reads the full contents of a table
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Return every row of the table
    ///
    /// This is a single unbounded read; there is no pagination.
    async fn scan(&self, table_id: &TableId) -> Result<Vec<serde_json::Value>>;
}

/// Writes objects into a bucket-like destination
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Location string for `key` inside `bucket`
    fn object_path(&self, bucket: &str, key: &str) -> String;

    /// Store `body` under `key`, overwriting any existing object
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
