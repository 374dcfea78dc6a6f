//! Backup locator backed by a remote lookup function

use super::models::{LocateRequest, LocateResponse};
use super::traits::BackupLocator;
use crate::adapters::remote::RemoteFunctionClient;
use crate::config::RemoteFunctionConfig;
use crate::domain::{BackupRef, LocateError, Result, TableId};
use async_trait::async_trait;
use std::time::Duration;

/// Calls the configured lookup endpoint once per table
///
/// The remote function does the listing and latest-backup selection; this
/// adapter only interprets its reply.
#[derive(Debug)]
pub struct HttpBackupLocator {
    endpoint: String,
    client: RemoteFunctionClient,
}

impl HttpBackupLocator {
    /// Create a locator from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RemoteFunctionConfig) -> Result<Self> {
        let client = RemoteFunctionClient::new(
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl BackupLocator for HttpBackupLocator {
    async fn locate(&self, table_id: &TableId) -> std::result::Result<BackupRef, LocateError> {
        let request = LocateRequest {
            table_id: table_id.as_str(),
        };

        let response: LocateResponse = self.client.invoke(&self.endpoint, &request).await?;

        tracing::debug!(
            table_id = %table_id,
            status_code = response.status_code,
            "Backup lookup replied"
        );

        response.into_result(table_id.as_str())
    }
}
