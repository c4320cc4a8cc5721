//! Time service implementation using reqwest.
//!
//! This adapter implements the `TimeService` port against the remote
//! `current-datetime` endpoint.

use async_trait::async_trait;
use reqwest::{Client, header};
use timeview_application::ports::{TimeService, TimeServiceError};
use timeview_domain::DateTimePayload;
use url::Url;

use crate::config::ServiceConfig;

/// `TimeService` adapter backed by `reqwest::Client`.
pub struct ReqwestTimeService {
    client: Client,
    endpoint: Url,
    timeout: Option<std::time::Duration>,
}

impl ReqwestTimeService {
    /// Creates a new adapter from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be built or the
    /// base URL cannot carry the `current-datetime` path (for example a
    /// cannot-be-a-base URL).
    pub fn new(config: &ServiceConfig) -> Result<Self, TimeServiceError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TimeServiceError::Network {
                message: format!("failed to build HTTP client: {e}"),
            })?;
        let endpoint = endpoint_url(&config.base_url)?;
        Ok(Self {
            client,
            endpoint,
            timeout: config.timeout,
        })
    }
}

/// Resolves `{base_url}/current-datetime`, tolerating a trailing slash on
/// the base.
fn endpoint_url(base_url: &Url) -> Result<Url, TimeServiceError> {
    let mut endpoint = base_url.clone();
    endpoint
        .path_segments_mut()
        .map_err(|()| TimeServiceError::Network {
            message: format!("base URL cannot carry a path: {base_url}"),
        })?
        .pop_if_empty()
        .push("current-datetime");
    Ok(endpoint)
}

/// Maps transport-level reqwest errors to the port taxonomy.
fn map_transport_error(error: &reqwest::Error) -> TimeServiceError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        format!("could not connect to the time service: {error}")
    } else {
        error.to_string()
    };
    TimeServiceError::Network { message }
}

#[async_trait]
impl TimeService for ReqwestTimeService {
    async fn fetch_current(&self) -> Result<DateTimePayload, TimeServiceError> {
        tracing::debug!(endpoint = %self.endpoint, "requesting current datetime");

        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(header::ACCEPT, "application/json");
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "non-success status");
            return Err(TimeServiceError::Protocol {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| map_transport_error(&e))?;
        let payload: DateTimePayload =
            serde_json::from_str(&body).map_err(|e| TimeServiceError::Format {
                message: e.to_string(),
            })?;

        Ok(payload)
    }
}
