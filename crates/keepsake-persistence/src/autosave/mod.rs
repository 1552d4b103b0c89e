//! Auto-save infrastructure.
//!
//! Provides:
//! - `AutoSaveConfig` - User settings for auto-save behavior
//! - `DirtyTracker` - Tracks unsaved changes across in-flight saves
//! - `Debouncer` - The single owned timer behind `auto_save`

mod config;
mod debounce;
mod tracker;

pub use config::AutoSaveConfig;
pub use debounce::Debouncer;
pub use tracker::DirtyTracker;
