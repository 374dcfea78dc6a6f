//! Exporter backed by a remote export function

use super::models::{ExportRequest, ExportResponse, StatusRequest, StatusResponse};
use super::traits::Exporter;
use crate::adapters::remote::RemoteFunctionClient;
use crate::config::ExporterConfig;
use crate::domain::{ExportHandle, ExportOutcome, RemoteCallError, Result, StatusCheck, TableId};
use async_trait::async_trait;
use std::time::Duration;

/// Calls the configured export endpoint, and optionally a status endpoint
#[derive(Debug)]
pub struct HttpExporter {
    endpoint: String,
    status_endpoint: Option<String>,
    client: RemoteFunctionClient,
}

impl HttpExporter {
    /// Create an exporter from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ExporterConfig) -> Result<Self> {
        let client = RemoteFunctionClient::new(
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            status_endpoint: config.status_endpoint.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Exporter for HttpExporter {
    async fn start_export(
        &self,
        table_id: &TableId,
        destination: &str,
    ) -> std::result::Result<ExportOutcome, RemoteCallError> {
        let request = ExportRequest {
            table_id: table_id.as_str(),
            destination,
        };

        let response: ExportResponse = self.client.invoke(&self.endpoint, &request).await?;

        tracing::debug!(
            table_id = %table_id,
            status_code = response.status_code,
            export_status = ?response.export_status,
            "Export function replied"
        );

        response.into_outcome(destination)
    }

    async fn export_status(
        &self,
        handle: &ExportHandle,
    ) -> std::result::Result<StatusCheck, RemoteCallError> {
        // A finished export has nothing left to ask the remote side about
        if handle.status.is_terminal() {
            return Ok(handle.status.into());
        }
        let Some(url) = &self.status_endpoint else {
            return Ok(handle.status.into());
        };

        let request = StatusRequest {
            destination_key: &handle.destination_key,
            destination_path: &handle.destination_path,
        };
        let response: StatusResponse = self.client.invoke(url, &request).await?;
        Ok(response.into_check())
    }
}
