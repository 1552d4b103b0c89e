use serde::{Deserialize, Serialize};

use crate::dates::date_stamp;
use crate::ids::next_id;

/// A written article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Creation timestamp in milliseconds, unique per article.
    pub id: i64,
    pub title: String,
    /// Free-text tag list, usually a `", "`-joined selection of concepts.
    #[serde(default)]
    pub concept: String,
    pub content: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited: Option<String>,
}

impl Article {
    /// Create a new article stamped with a fresh id and today's date.
    pub fn new(
        title: impl Into<String>,
        concept: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: next_id(),
            title: title.into(),
            concept: concept.into(),
            content: content.into(),
            date: date_stamp(),
            last_edited: None,
        }
    }

    /// Individual concept tags, trimmed, empty entries dropped.
    pub fn concept_tags(&self) -> impl Iterator<Item = &str> {
        self.concept
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    /// Overwrite the fields present in `update` and stamp `last_edited`.
    pub fn apply(&mut self, update: ArticleUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(concept) = update.concept {
            self.concept = concept;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        self.last_edited = Some(date_stamp());
    }
}

/// Partial article edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub concept: Option<String>,
    pub content: Option<String>,
}

impl ArticleUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn concept(concept: impl Into<String>) -> Self {
        Self {
            concept: Some(concept.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.concept.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_overwrites_and_stamps() {
        let mut article = Article::new("T", "C", "X");
        assert!(article.last_edited.is_none());

        article.apply(ArticleUpdate::title("T2"));
        assert_eq!(article.title, "T2");
        assert_eq!(article.content, "X");
        assert!(article.last_edited.is_some());
    }

    #[test]
    fn concept_tags_split_on_commas() {
        let article = Article::new("T", "symbols, metaphors,, narratives ", "X");
        let tags: Vec<_> = article.concept_tags().collect();
        assert_eq!(tags, vec!["symbols", "metaphors", "narratives"]);
    }
}
