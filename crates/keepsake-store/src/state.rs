//! State record, keys and change events.

use std::fmt;

use keepsake_model::{
    AppStateDocument, Article, Confession, Grievance, Probability, Suggestions, default_concepts,
};

// =============================================================================
// APP STATE
// =============================================================================

/// Every piece of state the store holds.
///
/// Persisted fields are mirrored by [`AppStateDocument`]; `selected_concepts`
/// and `probability` are UI state and the two flags gate persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// Insertion order is creation order.
    pub articles: Vec<Article>,
    /// Newest first.
    pub confession_history: Vec<Confession>,
    /// No duplicates, compared case-sensitively.
    pub concepts: Vec<String>,
    /// References into `concepts` by value. Not enforced.
    pub selected_concepts: Vec<String>,
    /// Never negative.
    pub points_accumulated: f64,
    pub suggestions: Suggestions,
    pub grievances: Vec<Grievance>,
    pub data_loaded: bool,
    pub is_loading: bool,
    pub probability: Probability,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            confession_history: Vec::new(),
            concepts: default_concepts(),
            selected_concepts: Vec::new(),
            points_accumulated: 0.0,
            suggestions: Suggestions::default(),
            grievances: Vec::new(),
            data_loaded: false,
            is_loading: false,
            probability: Probability::default(),
        }
    }
}

impl AppState {
    /// Current value at `key`, cloned.
    pub fn value(&self, key: StateKey) -> StateValue {
        match key {
            StateKey::Articles => StateValue::Articles(self.articles.clone()),
            StateKey::ConfessionHistory => {
                StateValue::ConfessionHistory(self.confession_history.clone())
            }
            StateKey::Concepts => StateValue::Concepts(self.concepts.clone()),
            StateKey::SelectedConcepts => {
                StateValue::SelectedConcepts(self.selected_concepts.clone())
            }
            StateKey::PointsAccumulated => StateValue::PointsAccumulated(self.points_accumulated),
            StateKey::Suggestions => StateValue::Suggestions(self.suggestions.clone()),
            StateKey::Grievances => StateValue::Grievances(self.grievances.clone()),
            StateKey::DataLoaded => StateValue::DataLoaded(self.data_loaded),
            StateKey::IsLoading => StateValue::IsLoading(self.is_loading),
            StateKey::Probability => StateValue::Probability(self.probability),
        }
    }

    /// Replace the field addressed by `value`.
    pub fn apply(&mut self, value: StateValue) {
        match value {
            StateValue::Articles(v) => self.articles = v,
            StateValue::ConfessionHistory(v) => self.confession_history = v,
            StateValue::Concepts(v) => self.concepts = v,
            StateValue::SelectedConcepts(v) => self.selected_concepts = v,
            StateValue::PointsAccumulated(v) => {
                debug_assert!(v >= 0.0, "points must not go negative");
                self.points_accumulated = v.max(0.0);
            }
            StateValue::Suggestions(v) => self.suggestions = v,
            StateValue::Grievances(v) => self.grievances = v,
            StateValue::DataLoaded(v) => self.data_loaded = v,
            StateValue::IsLoading(v) => self.is_loading = v,
            StateValue::Probability(v) => self.probability = v,
        }
    }

    /// The persisted subset, ready to serialize.
    pub fn to_document(&self) -> AppStateDocument {
        AppStateDocument {
            articles: self.articles.clone(),
            confession_history: self.confession_history.clone(),
            points_accumulated: self.points_accumulated,
            concepts: Some(self.concepts.clone()),
            suggestions: Some(self.suggestions.clone()),
            grievances: Some(self.grievances.clone()),
            last_saved: None,
        }
    }
}

// =============================================================================
// KEYS AND VALUES
// =============================================================================

/// Addressable fields of [`AppState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Articles,
    ConfessionHistory,
    Concepts,
    SelectedConcepts,
    PointsAccumulated,
    Suggestions,
    Grievances,
    DataLoaded,
    IsLoading,
    Probability,
}

impl StateKey {
    /// Wire name of the key, as used in the persisted document.
    pub fn name(self) -> &'static str {
        match self {
            Self::Articles => "articles",
            Self::ConfessionHistory => "confessionHistory",
            Self::Concepts => "concepts",
            Self::SelectedConcepts => "selectedConcepts",
            Self::PointsAccumulated => "pointsAccumulated",
            Self::Suggestions => "suggestions",
            Self::Grievances => "grievances",
            Self::DataLoaded => "dataLoaded",
            Self::IsLoading => "isLoading",
            Self::Probability => "probability",
        }
    }

    /// Look a key up by wire name. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|key| key.name() == name)
    }

    /// Whether the field is part of the persisted document.
    pub fn is_persisted(self) -> bool {
        matches!(
            self,
            Self::Articles
                | Self::ConfessionHistory
                | Self::Concepts
                | Self::PointsAccumulated
                | Self::Suggestions
                | Self::Grievances
        )
    }

    pub const fn all() -> &'static [StateKey] {
        &[
            Self::Articles,
            Self::ConfessionHistory,
            Self::Concepts,
            Self::SelectedConcepts,
            Self::PointsAccumulated,
            Self::Suggestions,
            Self::Grievances,
            Self::DataLoaded,
            Self::IsLoading,
            Self::Probability,
        ]
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed value for one [`StateKey`].
#[derive(Debug, Clone, PartialEq)]
pub enum StateValue {
    Articles(Vec<Article>),
    ConfessionHistory(Vec<Confession>),
    Concepts(Vec<String>),
    SelectedConcepts(Vec<String>),
    PointsAccumulated(f64),
    Suggestions(Suggestions),
    Grievances(Vec<Grievance>),
    DataLoaded(bool),
    IsLoading(bool),
    Probability(Probability),
}

impl StateValue {
    pub fn key(&self) -> StateKey {
        match self {
            Self::Articles(_) => StateKey::Articles,
            Self::ConfessionHistory(_) => StateKey::ConfessionHistory,
            Self::Concepts(_) => StateKey::Concepts,
            Self::SelectedConcepts(_) => StateKey::SelectedConcepts,
            Self::PointsAccumulated(_) => StateKey::PointsAccumulated,
            Self::Suggestions(_) => StateKey::Suggestions,
            Self::Grievances(_) => StateKey::Grievances,
            Self::DataLoaded(_) => StateKey::DataLoaded,
            Self::IsLoading(_) => StateKey::IsLoading,
            Self::Probability(_) => StateKey::Probability,
        }
    }

    /// Values to merge into the store for a downloaded document.
    ///
    /// Collections missing from the document keep their current value.
    pub fn from_document(document: AppStateDocument) -> Vec<StateValue> {
        let document = document.normalized();
        let mut values = vec![
            Self::Articles(document.articles),
            Self::ConfessionHistory(document.confession_history),
            Self::PointsAccumulated(document.points_accumulated),
        ];
        if let Some(concepts) = document.concepts {
            values.push(Self::Concepts(concepts));
        }
        if let Some(suggestions) = document.suggestions {
            values.push(Self::Suggestions(suggestions));
        }
        if let Some(grievances) = document.grievances {
            values.push(Self::Grievances(grievances));
        }
        values
    }
}

// =============================================================================
// SUBSCRIPTIONS
// =============================================================================

/// What a subscriber listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// A single key.
    Key(StateKey),
    /// Every mutation of every key.
    All,
}

impl From<StateKey> for Topic {
    fn from(key: StateKey) -> Self {
        Self::Key(key)
    }
}

/// Delivered to subscribers after a write.
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    pub key: StateKey,
    /// The value now stored at `key`.
    pub value: StateValue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names_round_trip() {
        for key in StateKey::all() {
            assert_eq!(StateKey::from_name(key.name()), Some(*key));
        }
        assert_eq!(StateKey::from_name("nope"), None);
    }

    #[test]
    fn defaults_are_never_absent() {
        let state = AppState::default();
        assert_eq!(state.value(StateKey::Articles), StateValue::Articles(vec![]));
        assert_eq!(state.value(StateKey::DataLoaded), StateValue::DataLoaded(false));
        assert_eq!(state.concepts.len(), 6);
    }

    #[test]
    fn ui_fields_are_not_persisted() {
        assert!(!StateKey::Probability.is_persisted());
        assert!(!StateKey::SelectedConcepts.is_persisted());
        assert!(!StateKey::DataLoaded.is_persisted());
        assert!(StateKey::Grievances.is_persisted());
    }

    #[test]
    fn document_without_concepts_keeps_current() {
        let values = StateValue::from_document(AppStateDocument::default());
        assert!(values.iter().all(|v| v.key() != StateKey::Concepts));
        assert!(values.iter().any(|v| v.key() == StateKey::Articles));
    }
}
