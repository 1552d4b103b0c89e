//! The persisted document exchanged with the remote endpoint.
//!
//! The document is replaced wholesale on every save. Fields missing from a
//! downloaded document are filled from defaults (or, for concepts,
//! suggestions and grievances, left to whatever the store already holds).

use serde::{Deserialize, Deserializer, Serialize};

use crate::article::Article;
use crate::confession::Confession;
use crate::grievance::Grievance;
use crate::suggestion::Suggestions;

/// Concept list used before anything has been loaded.
pub fn default_concepts() -> Vec<String> {
    [
        "symbols",
        "metaphors",
        "narratives",
        "marriage as codependency",
        "emotional disregulation",
        "Life as simulation",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Serializable subset of the application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStateDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub articles: Vec<Article>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub confession_history: Vec<Confession>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points_accumulated: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Suggestions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grievances: Option<Vec<Grievance>>,
    /// Server-side save stamp (RFC 3339). Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<String>,
}

impl AppStateDocument {
    /// The document a brand-new endpoint serves.
    pub fn defaults() -> Self {
        Self {
            concepts: Some(default_concepts()),
            ..Self::default()
        }
    }

    /// Repair values that would break store invariants: negative or
    /// non-finite points become zero and duplicate concepts are dropped
    /// (first occurrence wins).
    pub fn normalized(mut self) -> Self {
        if !self.points_accumulated.is_finite() || self.points_accumulated < 0.0 {
            self.points_accumulated = 0.0;
        }
        if let Some(concepts) = self.concepts.as_mut() {
            let mut seen = Vec::with_capacity(concepts.len());
            concepts.retain(|concept| {
                if seen.contains(concept) {
                    false
                } else {
                    seen.push(concept.clone());
                    true
                }
            });
        }
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
