use keepsake_model::{Suggestion, SuggestionBucket, Suggestions};

use crate::state::StateKey;
use crate::store::Store;

/// The three suggestion lists.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionsView<'a> {
    store: &'a Store,
}

impl<'a> SuggestionsView<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> Suggestions {
        self.store.read(|s| s.suggestions.clone())
    }

    pub fn bucket(&self, bucket: SuggestionBucket) -> Vec<Suggestion> {
        self.store.read(|s| s.suggestions.bucket(bucket).to_vec())
    }

    pub fn total(&self) -> usize {
        self.store.read(|s| s.suggestions.total())
    }

    /// Append to `bucket` and notify `suggestions`.
    pub fn add(&self, bucket: SuggestionBucket, suggestion: Suggestion) {
        self.store.mutate(StateKey::Suggestions, |s| {
            s.suggestions.bucket_mut(bucket).push(suggestion);
        });
    }

    /// Flip `completed` on the suggestion with `id` in `bucket`.
    ///
    /// Returns the new completed state, or `None` if there is no such item.
    pub fn toggle_completed(&self, bucket: SuggestionBucket, id: i64) -> Option<bool> {
        let mut completed = None;
        self.store.mutate_if(StateKey::Suggestions, |s| {
            let found = s
                .suggestions
                .bucket_mut(bucket)
                .iter_mut()
                .find(|item| item.id == id);
            match found {
                Some(item) => {
                    item.completed = !item.completed;
                    completed = Some(item.completed);
                    true
                }
                None => false,
            }
        });
        completed
    }
}
