//! Suggestions box entities.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates::date_stamp;
use crate::error::ModelError;
use crate::ids::next_id;
use crate::user::User;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\da-z.-]+)\.([a-z.]{2,6})([/\w .-]*)/?$")
        .expect("URL pattern is valid")
});

/// Loose check for "this looks like a link" on user input.
pub fn is_valid_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

/// Kind of thing being suggested.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Movie,
    Music,
    Youtube,
    Book,
    #[default]
    Link,
}

impl SuggestionType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Music => "Music",
            Self::Youtube => "YouTube",
            Self::Book => "Book",
            Self::Link => "Link",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Movie => "🎬",
            Self::Music => "🎵",
            Self::Youtube => "📺",
            Self::Book => "📚",
            Self::Link => "🔗",
        }
    }

    pub const fn all() -> &'static [SuggestionType] {
        &[Self::Movie, Self::Music, Self::Youtube, Self::Book, Self::Link]
    }
}

impl FromStr for SuggestionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "music" => Ok(Self::Music),
            "youtube" => Ok(Self::Youtube),
            "book" => Ok(Self::Book),
            "link" => Ok(Self::Link),
            _ => Err(ModelError::UnknownSuggestionType(s.to_string())),
        }
    }
}

/// One of the three suggestion lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SuggestionBucket {
    ForSaleen,
    ForEmran,
    ForUs,
}

impl SuggestionBucket {
    /// Wire key of the bucket inside the `suggestions` object.
    pub fn key(self) -> &'static str {
        match self {
            Self::ForSaleen => "forSaleen",
            Self::ForEmran => "forEmran",
            Self::ForUs => "forUs",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ForSaleen => "For Saleen",
            Self::ForEmran => "For Emran",
            Self::ForUs => "For Us 💕",
        }
    }

    pub const fn all() -> &'static [SuggestionBucket] {
        &[Self::ForSaleen, Self::ForEmran, Self::ForUs]
    }

    pub fn index(self) -> usize {
        match self {
            Self::ForSaleen => 0,
            Self::ForEmran => 1,
            Self::ForUs => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// Where a suggestion written by `author` lands: the shared list when
    /// `for_us` is set, otherwise the other person's list.
    pub fn target(author: User, for_us: bool) -> Self {
        if for_us {
            return Self::ForUs;
        }
        match author.other() {
            User::Saleen => Self::ForSaleen,
            User::Emran => Self::ForEmran,
        }
    }
}

impl fmt::Display for SuggestionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SuggestionBucket {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forsaleen" | "saleen" | "0" => Ok(Self::ForSaleen),
            "foremran" | "emran" | "1" => Ok(Self::ForEmran),
            "forus" | "us" | "2" => Ok(Self::ForUs),
            _ => Err(ModelError::UnknownBucket(s.to_string())),
        }
    }
}

/// A single suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: SuggestionType,
    pub content: String,
    /// Derived from `content` at creation time.
    #[serde(default)]
    pub is_link: bool,
    #[serde(default)]
    pub completed: bool,
    pub date: String,
    /// Author user id.
    pub from: String,
}

impl Suggestion {
    pub fn new(kind: SuggestionType, content: impl Into<String>, author: User) -> Self {
        let content = content.into();
        Self {
            id: next_id(),
            kind,
            is_link: is_valid_url(&content),
            content,
            completed: false,
            date: date_stamp(),
            from: author.as_str().to_string(),
        }
    }
}

/// The three suggestion lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Suggestions {
    pub for_saleen: Vec<Suggestion>,
    pub for_emran: Vec<Suggestion>,
    pub for_us: Vec<Suggestion>,
}

impl Suggestions {
    pub fn bucket(&self, bucket: SuggestionBucket) -> &[Suggestion] {
        match bucket {
            SuggestionBucket::ForSaleen => &self.for_saleen,
            SuggestionBucket::ForEmran => &self.for_emran,
            SuggestionBucket::ForUs => &self.for_us,
        }
    }

    pub fn bucket_mut(&mut self, bucket: SuggestionBucket) -> &mut Vec<Suggestion> {
        match bucket {
            SuggestionBucket::ForSaleen => &mut self.for_saleen,
            SuggestionBucket::ForEmran => &mut self.for_emran,
            SuggestionBucket::ForUs => &mut self.for_us,
        }
    }

    pub fn total(&self) -> usize {
        self.for_saleen.len() + self.for_emran.len() + self.for_us.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_detection() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("example.com/watch"));
        assert!(is_valid_url("www.youtube.com/watch"));
        assert!(!is_valid_url("The Godfather"));
        assert!(!is_valid_url("no dots here"));
    }

    #[test]
    fn new_suggestion_derives_link_flag() {
        let link = Suggestion::new(SuggestionType::Link, "https://example.com", User::Saleen);
        assert!(link.is_link);
        assert_eq!(link.from, "Saleen");

        let movie = Suggestion::new(SuggestionType::Movie, "Heat", User::Emran);
        assert!(!movie.is_link);
        assert!(!movie.completed);
    }

    #[test]
    fn target_routes_to_the_other_user() {
        assert_eq!(SuggestionBucket::target(User::Saleen, false), SuggestionBucket::ForEmran);
        assert_eq!(SuggestionBucket::target(User::Emran, false), SuggestionBucket::ForSaleen);
        assert_eq!(SuggestionBucket::target(User::Emran, true), SuggestionBucket::ForUs);
    }
}
