use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::StateKey;
use crate::store::Store;

/// Concept list and the current selection.
#[derive(Debug, Clone, Copy)]
pub struct ConceptsView<'a> {
    store: &'a Store,
}

impl<'a> ConceptsView<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> Vec<String> {
        self.store.read(|s| s.concepts.clone())
    }

    pub fn get_selected(&self) -> Vec<String> {
        self.store.read(|s| s.selected_concepts.clone())
    }

    pub fn is_selected(&self, concept: &str) -> bool {
        self.store
            .read(|s| s.selected_concepts.iter().any(|c| c == concept))
    }

    /// Add a concept unless an identical one exists (case-sensitive).
    ///
    /// Returns whether it was added; duplicates notify nobody.
    pub fn add(&self, concept: impl Into<String>) -> bool {
        let concept = concept.into();
        self.store.mutate_if(StateKey::Concepts, |s| {
            if s.concepts.contains(&concept) {
                false
            } else {
                s.concepts.push(concept);
                true
            }
        })
    }

    /// Select `concept` if unselected, unselect it otherwise. Returns whether
    /// it is selected afterwards.
    pub fn toggle_selection(&self, concept: &str) -> bool {
        self.store.mutate(StateKey::SelectedConcepts, |s| {
            match s.selected_concepts.iter().position(|c| c == concept) {
                Some(index) => {
                    s.selected_concepts.remove(index);
                    false
                }
                None => {
                    s.selected_concepts.push(concept.to_string());
                    true
                }
            }
        })
    }

    /// Pick a random concept and toggle its selection.
    ///
    /// Returns the concept picked, or `None` when the list is empty.
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let picked = self.store.read(|s| s.concepts.choose(rng).cloned())?;
        self.toggle_selection(&picked);
        Some(picked)
    }

    pub fn clear_selection(&self) {
        self.store
            .mutate(StateKey::SelectedConcepts, |s| s.selected_concepts.clear());
    }
}
