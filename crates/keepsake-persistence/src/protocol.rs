//! The JSON envelope spoken by the data endpoint.
//!
//! ```text
//! GET  -> { "success": true, "data": { ...document... }, "message"?: "defaults" }
//! POST -> { "success": true, "message": "...", "timestamp": "...", "fileSize": 1234 }
//! any  -> { "success": false, "error": "..." }
//! ```
//!
//! Misconfigured servers answer with HTML (or unexecuted PHP source) and a
//! 200 status, so bodies are inspected before they are parsed.

use keepsake_model::AppStateDocument;
use serde::{Deserialize, Serialize};

use crate::endpoint::RawResponse;
use crate::error::{PersistenceError, Result};

/// What kind of non-JSON page a body looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// The server returned the script's source instead of running it.
    PhpSource,
    /// An HTML page, typically a 404 or an error page.
    HtmlPage,
}

/// Classify `body` if it is markup rather than JSON.
pub fn detect_markup(body: &str) -> Option<Markup> {
    if body.contains("<?php") {
        return Some(Markup::PhpSource);
    }
    let head = body.trim_start();
    let starts_with = |prefix: &str| {
        head.get(..prefix.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
    };
    if starts_with("<!doctype") || starts_with("<html") {
        Some(Markup::HtmlPage)
    } else {
        None
    }
}

/// Wire shape of every endpoint reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// A successfully downloaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub document: AppStateDocument,
    /// The server had no file yet and sent its defaults.
    pub from_defaults: bool,
}

/// Confirmation of a successful save.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveReceipt {
    pub timestamp: Option<String>,
    pub file_size: Option<u64>,
    pub message: Option<String>,
}

/// Decode an envelope, rejecting markup and malformed bodies.
pub fn parse_envelope(raw: &RawResponse) -> Result<Envelope> {
    match detect_markup(&raw.body) {
        Some(Markup::PhpSource) => {
            return Err(PersistenceError::protocol(
                raw.status,
                "PHP is not executing on the server",
            ));
        }
        Some(Markup::HtmlPage) => {
            return Err(PersistenceError::protocol(
                raw.status,
                "got an HTML page instead of JSON",
            ));
        }
        None => {}
    }

    let envelope: Envelope = serde_json::from_str(&raw.body).map_err(|e| {
        tracing::debug!(status = raw.status, body = raw.preview(200), "unparseable reply");
        PersistenceError::protocol(raw.status, format!("invalid JSON: {e}"))
    })?;

    if !envelope.success {
        return Err(PersistenceError::Server {
            message: envelope
                .error
                .unwrap_or_else(|| "the server did not accept the request".to_string()),
        });
    }
    Ok(envelope)
}

/// Interpret the reply to a download.
pub fn parse_load(raw: &RawResponse) -> Result<LoadedDocument> {
    let envelope = parse_envelope(raw)?;
    let data = match envelope.data {
        Some(data) if !data.is_null() => data,
        _ => return Err(PersistenceError::protocol(raw.status, "reply has no data")),
    };
    let document: AppStateDocument = serde_json::from_value(data)
        .map_err(|e| PersistenceError::protocol(raw.status, format!("malformed document: {e}")))?;
    Ok(LoadedDocument {
        document,
        from_defaults: envelope.message.as_deref() == Some("defaults"),
    })
}

/// Interpret the reply to a replace.
pub fn parse_save(raw: &RawResponse) -> Result<SaveReceipt> {
    let envelope = parse_envelope(raw)?;
    Ok(SaveReceipt {
        timestamp: envelope.timestamp,
        file_size: envelope.file_size,
        message: envelope.message,
    })
}
