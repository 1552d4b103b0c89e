//! Data model for Keepsake.
//!
//! All entities here are plain values. They are owned by the store
//! (`keepsake-store`) and exchanged with the remote endpoint through
//! [`AppStateDocument`].

pub mod article;
pub mod confession;
pub mod dates;
pub mod document;
pub mod error;
pub mod grievance;
pub mod ids;
pub mod suggestion;
pub mod user;

pub use article::{Article, ArticleUpdate};
pub use confession::{Confession, Probability};
pub use document::{AppStateDocument, default_concepts};
pub use error::{ModelError, Result};
pub use grievance::{Grievance, Severity};
pub use ids::next_id;
pub use suggestion::{Suggestion, SuggestionBucket, SuggestionType, Suggestions, is_valid_url};
pub use user::User;
