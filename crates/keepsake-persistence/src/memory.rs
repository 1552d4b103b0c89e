//! An in-process endpoint that behaves like the PHP file store.

use async_trait::async_trait;
use keepsake_model::AppStateDocument;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::endpoint::{RawResponse, RemoteEndpoint};
use crate::error::Result;

#[derive(Debug, Default)]
struct MemoryState {
    document: Option<Value>,
    fetches: usize,
    replaces: usize,
}

/// Keeps the document in memory.
///
/// Used for offline sessions and tests. Replies use the same envelope as
/// the HTTP endpoint: defaults with `message: "defaults"` until the first
/// save, `lastSaved`/`savedBy` stamped on every save.
#[derive(Debug, Default)]
pub struct MemoryEndpoint {
    state: Mutex<MemoryState>,
}

impl MemoryEndpoint {
    pub const SAVED_BY: &'static str = "keepsake (memory)";

    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `document` already stored.
    pub fn with_document(document: Value) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                document: Some(document),
                ..MemoryState::default()
            }),
        }
    }

    /// The stored document, as last written.
    pub fn document(&self) -> Option<Value> {
        self.state.lock().document.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().fetches
    }

    pub fn replace_count(&self) -> usize {
        self.state.lock().replaces
    }
}

#[async_trait]
impl RemoteEndpoint for MemoryEndpoint {
    async fn fetch(&self) -> Result<RawResponse> {
        let mut state = self.state.lock();
        state.fetches += 1;
        let reply = match &state.document {
            Some(document) => json!({ "success": true, "data": document }),
            None => json!({
                "success": true,
                "data": AppStateDocument::defaults(),
                "message": "defaults",
            }),
        };
        Ok(RawResponse::ok_json(reply.to_string()))
    }

    async fn replace(&self, body: String) -> Result<RawResponse> {
        let mut state = self.state.lock();
        state.replaces += 1;

        let mut document = match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(map)) => map,
            _ => {
                let reply = json!({ "success": false, "error": "Invalid JSON data received" });
                return Ok(RawResponse::ok_json(reply.to_string()));
            }
        };
        let now = chrono::Local::now().to_rfc3339();
        document.insert("lastSaved".into(), Value::String(now.clone()));
        document.insert("savedBy".into(), Value::String(Self::SAVED_BY.into()));
        let document = Value::Object(document);
        let file_size = serde_json::to_string_pretty(&document)?.len();
        state.document = Some(document);

        let reply = json!({
            "success": true,
            "message": "Data saved successfully",
            "timestamp": now,
            "fileSize": file_size,
        });
        Ok(RawResponse::ok_json(reply.to_string()))
    }

    fn describe(&self) -> String {
        "in-memory store".to_string()
    }
}
