use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// One of the two people sharing the app.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum User {
    #[default]
    Saleen,
    Emran,
}

impl User {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saleen => "Saleen",
            Self::Emran => "Emran",
        }
    }

    /// The other user.
    pub fn other(self) -> Self {
        match self {
            Self::Saleen => Self::Emran,
            Self::Emran => Self::Saleen,
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for User {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "saleen" => Ok(Self::Saleen),
            "emran" => Ok(Self::Emran),
            _ => Err(ModelError::UnknownUser(s.to_string())),
        }
    }
}
