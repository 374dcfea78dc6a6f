//! Shared client for invoking remote functions over HTTP
//!
//! Both remote collaborators (backup lookup and table export) are plain
//! request/response functions: a JSON body goes in, and a JSON envelope carrying
//! its own `statusCode` comes back. The envelope status is authoritative; the
//! transport status only matters when the body cannot be decoded.

use crate::config::SecretString;
use crate::domain::{FerryError, RemoteCallError, Result};
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// HTTP client bound to remote function endpoints
#[derive(Clone)]
pub struct RemoteFunctionClient {
    client: Client,
    api_key: Option<SecretString>,
    timeout: Duration,
}

impl RemoteFunctionClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(api_key: Option<SecretString>, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FerryError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            timeout,
        })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// POST `body` to `url` and decode the JSON reply
    pub async fn invoke<B, R>(&self, url: &str, body: &B) -> std::result::Result<R, RemoteCallError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                RemoteCallError::Timeout(self.timeout)
            } else {
                RemoteCallError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteCallError::Transport(e.to_string()))?;

        tracing::trace!(url = %url, status = status.as_u16(), "Remote function replied");

        match serde_json::from_str::<R>(&text) {
            Ok(parsed) => Ok(parsed),
            Err(e) if status.is_success() => Err(RemoteCallError::InvalidResponse(format!(
                "Failed to decode response from {url}: {e}"
            ))),
            Err(_) => Err(RemoteCallError::UnexpectedStatus {
                status: status.as_u16(),
                message: text,
            }),
        }
    }
}

impl std::fmt::Debug for RemoteFunctionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteFunctionClient")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}
