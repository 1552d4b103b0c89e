//! Per-entity helpers over the store.
//!
//! These are views, not storage: each helper reads and writes the same keys
//! a direct [`Store::set`](crate::Store::set) would, and notifies the same
//! subscribers.

mod articles;
mod concepts;
mod confessions;
mod grievances;
mod suggestions;

pub use articles::ArticlesView;
pub use concepts::ConceptsView;
pub use confessions::ConfessionsView;
pub use grievances::GrievancesView;
pub use suggestions::SuggestionsView;
