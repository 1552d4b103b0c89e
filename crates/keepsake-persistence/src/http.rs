//! [`RemoteEndpoint`] over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};

use crate::endpoint::{RawResponse, RemoteEndpoint};
use crate::error::{PersistenceError, Result};

/// User agent string for endpoint requests.
const USER_AGENT_VALUE: &str = concat!("keepsake/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// The data endpoint at a single URL: GET downloads, POST replaces.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// Creates a client for `url` with the given per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PersistenceError::Connectivity {
                reason: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn into_raw(response: reqwest::Response) -> Result<RawResponse> {
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.text().await?;
        let raw = RawResponse {
            status,
            content_type,
            body,
        };
        tracing::debug!(
            status,
            content_type = raw.content_type.as_deref().unwrap_or("-"),
            body = raw.preview(200),
            "endpoint reply"
        );
        Ok(raw)
    }
}

#[async_trait]
impl RemoteEndpoint for HttpEndpoint {
    async fn fetch(&self) -> Result<RawResponse> {
        tracing::debug!("GET {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        Self::into_raw(response).await
    }

    async fn replace(&self, body: String) -> Result<RawResponse> {
        tracing::debug!(bytes = body.len(), "POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        Self::into_raw(response).await
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
