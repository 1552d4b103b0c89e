//! Remote persistence for the Keepsake store.
//!
//! The whole persisted state lives in one JSON document behind a single
//! endpoint that supports download (GET) and whole-document replace (POST).
//! [`PersistenceGateway`] moves the document in and out of a
//! [`keepsake_store::Store`].
//!
//! # Features
//!
//! - **Degrade, never crash**: failed loads leave the store usable locally
//! - **No early writes**: a save never runs before data has been loaded
//! - **One request at a time**: load and save never overlap
//! - **Auto-save** with a restartable debounce timer
//! - **Content inspection**: HTML and PHP-source replies are protocol errors
//!   even with a 200 status
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use keepsake_persistence::{AutoSaveConfig, MemoryEndpoint, PersistenceGateway};
//! use keepsake_store::{Store, TracingNotifier};
//!
//! # async fn run() {
//! let store = Store::new();
//! let gateway = PersistenceGateway::new(
//!     store.clone(),
//!     Arc::new(MemoryEndpoint::new()),
//!     Arc::new(TracingNotifier),
//!     AutoSaveConfig::default(),
//! );
//! let _autosave = gateway.attach_auto_save();
//! gateway.load().await;
//! store.concepts().add("tide pools");
//! gateway.flush().await;
//! # }
//! ```
//!
//! # Architecture
//!
//! - `endpoint.rs` - the `RemoteEndpoint` seam and raw responses
//! - `http.rs` / `memory.rs` - HTTP and in-memory endpoints
//! - `protocol.rs` - envelope parsing and markup detection
//! - `gateway.rs` - load, save, autosave
//! - `diagnostics.rs` - connection self-test
//! - `autosave/` - Auto-save infrastructure (config, DirtyTracker, Debouncer)
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod diagnostics;
mod endpoint;
mod error;
mod gateway;
mod http;
mod memory;
mod protocol;

pub use autosave::{AutoSaveConfig, Debouncer, DirtyTracker};
pub use diagnostics::ConnectionReport;
pub use endpoint::{RawResponse, RemoteEndpoint};
pub use error::{ErrorKind, PersistenceError, Result};
pub use gateway::{LoadOutcome, PersistenceGateway, SaveOutcome};
pub use http::{DEFAULT_TIMEOUT, HttpEndpoint};
pub use memory::MemoryEndpoint;
pub use protocol::{
    Envelope, LoadedDocument, Markup, SaveReceipt, detect_markup, parse_load, parse_save,
};
