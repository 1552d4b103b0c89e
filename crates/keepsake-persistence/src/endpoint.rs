//! The seam between the gateway and whatever stores the document.

use async_trait::async_trait;

use crate::error::Result;

/// A response body as received, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("application/json".to_string()),
            body: body.into(),
        }
    }

    /// The first `max` characters of the body, for logs and diagnostics.
    pub fn preview(&self, max: usize) -> &str {
        match self.body.char_indices().nth(max) {
            Some((end, _)) => &self.body[..end],
            None => &self.body,
        }
    }
}

/// A single remote JSON document that can be downloaded and replaced whole.
///
/// Implementations report transport failures as
/// [`PersistenceError::Connectivity`](crate::PersistenceError::Connectivity)
/// and return every response they receive, whatever its status or body;
/// interpreting it is the gateway's job.
#[async_trait]
pub trait RemoteEndpoint: Send + Sync {
    /// Download the whole document envelope.
    async fn fetch(&self) -> Result<RawResponse>;

    /// Replace the whole document with `body` (a JSON object).
    async fn replace(&self, body: String) -> Result<RawResponse>;

    /// Human-readable location, for diagnostics.
    fn describe(&self) -> String;
}
