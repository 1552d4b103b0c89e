//! Persistence error types.
//!
//! Every failure of a load or save is reported to the user as a notice and
//! returned as a [`PersistenceError`]; none of them abort the application.

use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The endpoint could not be reached.
    #[error("could not reach the data endpoint: {reason}")]
    Connectivity { reason: String },

    /// The endpoint answered with something that is not the JSON envelope,
    /// such as an HTML error page or raw PHP source.
    #[error("unexpected response from the data endpoint (status {status}): {reason}")]
    Protocol { status: u16, reason: String },

    /// The endpoint answered with `success: false`.
    #[error("the data endpoint reported an error: {message}")]
    Server { message: String },

    /// The local state could not be encoded.
    #[error("failed to encode application data")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// A save would replace a document that had articles with one that has
    /// none.
    #[error("refusing to replace {previous_articles} saved articles with an empty list")]
    SuspiciousWipe { previous_articles: usize },

    /// A save was attempted before any data was loaded.
    #[error("data has not been loaded yet")]
    NotLoaded,

    /// The last load reached the endpoint but could not read its document,
    /// so a save could overwrite data that was never seen.
    #[error("the saved document could not be read: {reason}")]
    RemoteUnreadable { reason: String },
}

/// Coarse category of a [`PersistenceError`], matching the notice shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    Protocol,
    Server,
    Local,
}

impl PersistenceError {
    pub(crate) fn protocol(status: u16, reason: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connectivity { .. } => ErrorKind::Connectivity,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Server { .. } => ErrorKind::Server,
            Self::Serialization { .. }
            | Self::SuspiciousWipe { .. }
            | Self::NotLoaded
            | Self::RemoteUnreadable { .. } => ErrorKind::Local,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connectivity { .. } => {
                "Cannot connect to the server. Changes are kept on this device for now.".to_string()
            }
            Self::Protocol { reason, .. } => format!("The server sent an unexpected reply: {reason}"),
            Self::Server { message } => message.clone(),
            Self::Serialization { .. } => {
                "An error occurred while preparing the data to save.".to_string()
            }
            Self::SuspiciousWipe { previous_articles } => format!(
                "Not saved: the server has {previous_articles} articles and there are none here."
            ),
            Self::NotLoaded => "Data is still loading. Try again in a moment.".to_string(),
            Self::RemoteUnreadable { .. } => {
                "Not saved: the data on the server could not be read, and saving could overwrite it."
                    .to_string()
            }
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Connectivity { .. } => {
                Some("Check the network connection, then save again.".into())
            }
            Self::Protocol { .. } => Some(
                "Check that the endpoint URL is right and that PHP is enabled on the server."
                    .into(),
            ),
            Self::Server { .. } => {
                Some("Check that the server can write to its data file.".into())
            }
            Self::SuspiciousWipe { .. } => {
                Some("Use `save!` if you really want to clear the saved articles.".into())
            }
            Self::RemoteUnreadable { .. } => Some(
                "Fix the data file on the server and restart, or use `save!` to overwrite it."
                    .into(),
            ),
            Self::Serialization { .. } | Self::NotLoaded => None,
        }
    }

    /// Returns whether a later retry may succeed without user action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connectivity { .. } | Self::NotLoaded)
    }
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if err.is_decode() => Self::protocol(status.as_u16(), err.to_string()),
            _ => Self::Connectivity {
                reason: err.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialization { source }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
