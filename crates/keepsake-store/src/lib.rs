//! Observable state store for Keepsake.
//!
//! The [`Store`] is the single source of truth for application state. Feature
//! modules read through it, write through it, and subscribe to it; nothing
//! caches entities across a mutation.
//!
//! # Notifications
//!
//! Every write notifies synchronously before returning. Subscribers on the
//! written key run first, then wildcard ([`Topic::All`]) subscribers, each
//! group in subscription order. No lock is held while callbacks run, so a
//! callback may read from or write to the store.
//!
//! # Example
//!
//! ```
//! use keepsake_store::{StateKey, StateValue, Store, Topic};
//!
//! let store = Store::new();
//! let handle = store.subscribe(Topic::Key(StateKey::PointsAccumulated), |change| {
//!     println!("points now {:?}", change.value);
//! });
//! store.confessions().add_points(3.0);
//! handle.unsubscribe();
//! assert_eq!(store.get(StateKey::PointsAccumulated), StateValue::PointsAccumulated(3.0));
//! ```
//!
//! # Architecture
//!
//! - `state.rs` - `AppState`, keys, values and change events
//! - `store.rs` - the store handle and subscription registry
//! - `collections/` - per-entity helpers layered over the same keys
//! - `confirm.rs` - the confirm-then-act helper
//! - `notify.rs` - the user notification side-channel

mod collections;
mod confirm;
mod notify;
mod state;
mod store;

pub use collections::{
    ArticlesView, ConceptsView, ConfessionsView, GrievancesView, SuggestionsView,
};
pub use confirm::{ConfirmStep, ConfirmThenAct, Confirmable};
pub use notify::{Notice, NoticeKind, NoticeLog, Notifier, TracingNotifier};
pub use state::{AppState, StateChange, StateKey, StateValue, Topic};
pub use store::{Store, Unsubscribe};
