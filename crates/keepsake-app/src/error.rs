//! Front-end error types.
//!
//! [`AppError`] covers failures of the application shell. [`UserInputError`]
//! covers bad input to a feature; it is shown as a warning notice and never
//! propagated.

use std::path::PathBuf;

use keepsake_store::{Notice, NoticeKind};
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// Failed to read or write the settings file.
    #[error("Failed to {operation} settings file: {path}")]
    SettingsIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded.
    #[error("Failed to serialize settings")]
    SettingsFormat {
        #[source]
        source: toml::ser::Error,
    },

    /// A command nobody handles in the current view.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A feature was requested that is not registered.
    #[error("Feature not available: {0}")]
    FeatureUnavailable(String),

    /// The data endpoint could not be set up.
    #[error(transparent)]
    Persistence(#[from] keepsake_persistence::PersistenceError),
}

impl AppError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::SettingsIo { path, .. } => {
                format!("Could not access the settings at {}", path.display())
            }
            Self::SettingsFormat { .. } => "Could not write the settings.".to_string(),
            Self::UnknownCommand(command) => {
                format!("Unknown command '{command}'. Type 'help' for a list.")
            }
            Self::FeatureUnavailable(name) => format!("'{name}' is not available."),
            Self::Persistence(err) => err.user_message(),
        }
    }
}

/// Invalid input to a feature command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserInputError {
    #[error("{0}")]
    Missing(&'static str),

    #[error("'{value}' is not a valid {what}")]
    Invalid { what: &'static str, value: String },

    #[error("No {what} number {index}")]
    NotFound { what: &'static str, index: usize },
}

impl UserInputError {
    pub fn invalid(what: &'static str, value: impl Into<String>) -> Self {
        Self::Invalid {
            what,
            value: value.into(),
        }
    }

    /// The warning shown for this error.
    pub fn notice(&self) -> Notice {
        Notice::new(self.to_string(), NoticeKind::Warning)
    }
}

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_warnings() {
        let err = UserInputError::Missing("Please fill in at least the title and content!");
        assert_eq!(err.notice().kind, NoticeKind::Warning);
        assert_eq!(
            err.notice().message,
            "Please fill in at least the title and content!"
        );

        let err = UserInputError::NotFound {
            what: "article",
            index: 4,
        };
        assert_eq!(err.to_string(), "No article number 4");
    }

    #[test]
    fn test_unknown_command_message() {
        let err = AppError::UnknownCommand("dance".into());
        assert!(err.user_message().contains("help"));
    }
}
