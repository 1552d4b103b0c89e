//! The store handle and its subscription registry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use keepsake_model::Probability;
use parking_lot::{Mutex, RwLock};

use crate::collections::{
    ArticlesView, ConceptsView, ConfessionsView, GrievancesView, SuggestionsView,
};
use crate::state::{AppState, StateChange, StateKey, StateValue, Topic};

type Callback = Arc<dyn Fn(&StateChange) + Send + Sync>;

struct Registration {
    id: u64,
    topic: Topic,
    callback: Callback,
}

struct StoreInner {
    state: RwLock<AppState>,
    registrations: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
}

/// Shared handle to the application state.
///
/// Cloning is cheap; all clones see the same state and subscribers.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("subscribers", &self.inner.registrations.lock().len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// A store holding [`AppState::default`].
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                registrations: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Current value at `key`.
    pub fn get(&self, key: StateKey) -> StateValue {
        self.inner.state.read().value(key)
    }

    /// Current value for a wire name; `None` for names that are not keys.
    pub fn get_by_name(&self, name: &str) -> Option<StateValue> {
        StateKey::from_name(name).map(|key| self.get(key))
    }

    /// Borrow the live state for the duration of `f`.
    ///
    /// `f` must not write to the store.
    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.inner.state.read())
    }

    /// Independent deep copy of the whole state.
    pub fn get_snapshot(&self) -> AppState {
        self.inner.state.read().clone()
    }

    pub fn data_loaded(&self) -> bool {
        self.read(|s| s.data_loaded)
    }

    pub fn is_loading(&self) -> bool {
        self.read(|s| s.is_loading)
    }

    pub fn points(&self) -> f64 {
        self.read(|s| s.points_accumulated)
    }

    pub fn probability(&self) -> Probability {
        self.read(|s| s.probability)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Replace one field, then notify its subscribers.
    pub fn set(&self, value: StateValue) {
        let key = value.key();
        let stored = {
            let mut state = self.inner.state.write();
            state.apply(value);
            state.value(key)
        };
        self.notify(&StateChange { key, value: stored });
    }

    /// Replace several fields at once, then notify once per field in input
    /// order. Collections are replaced wholesale, never merged.
    pub fn update(&self, values: impl IntoIterator<Item = StateValue>) {
        let changes: Vec<StateChange> = {
            let mut state = self.inner.state.write();
            let keys: Vec<StateKey> = values
                .into_iter()
                .map(|value| {
                    let key = value.key();
                    state.apply(value);
                    key
                })
                .collect();
            keys.into_iter()
                .map(|key| StateChange {
                    key,
                    value: state.value(key),
                })
                .collect()
        };
        for change in &changes {
            self.notify(change);
        }
    }

    /// Run `f` against the live state and notify `key` if it returns true.
    ///
    /// Used by the collection helpers so they stay consistent with `set`.
    pub(crate) fn mutate_if(&self, key: StateKey, f: impl FnOnce(&mut AppState) -> bool) -> bool {
        let stored = {
            let mut state = self.inner.state.write();
            if !f(&mut state) {
                return false;
            }
            state.value(key)
        };
        self.notify(&StateChange { key, value: stored });
        true
    }

    pub(crate) fn mutate<R>(&self, key: StateKey, f: impl FnOnce(&mut AppState) -> R) -> R {
        let (result, stored) = {
            let mut state = self.inner.state.write();
            let result = f(&mut state);
            (result, state.value(key))
        };
        self.notify(&StateChange { key, value: stored });
        result
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Register `callback` for `topic`.
    ///
    /// The returned handle removes exactly this registration. Dropping the
    /// handle without calling [`Unsubscribe::unsubscribe`] keeps the callback
    /// registered for the lifetime of the store.
    pub fn subscribe<F>(&self, topic: impl Into<Topic>, callback: F) -> Unsubscribe
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let topic = topic.into();
        self.inner.registrations.lock().push(Registration {
            id,
            topic,
            callback: Arc::new(callback),
        });
        tracing::trace!(id, ?topic, "subscribed");
        Unsubscribe {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.registrations.lock().len()
    }

    fn notify(&self, change: &StateChange) {
        let callbacks: Vec<Callback> = {
            let registrations = self.inner.registrations.lock();
            let exact = registrations
                .iter()
                .filter(|r| r.topic == Topic::Key(change.key));
            let wildcard = registrations.iter().filter(|r| r.topic == Topic::All);
            exact
                .chain(wildcard)
                .map(|r| Arc::clone(&r.callback))
                .collect()
        };
        tracing::trace!(key = %change.key, subscribers = callbacks.len(), "notify");
        for callback in callbacks {
            callback(change);
        }
    }

    // ========================================================================
    // Collection helpers
    // ========================================================================

    pub fn articles(&self) -> ArticlesView<'_> {
        ArticlesView::new(self)
    }

    pub fn confessions(&self) -> ConfessionsView<'_> {
        ConfessionsView::new(self)
    }

    pub fn concepts(&self) -> ConceptsView<'_> {
        ConceptsView::new(self)
    }

    pub fn suggestions(&self) -> SuggestionsView<'_> {
        SuggestionsView::new(self)
    }

    pub fn grievances(&self) -> GrievancesView<'_> {
        GrievancesView::new(self)
    }
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug)]
pub struct Unsubscribe {
    store: Weak<StoreInner>,
    id: u64,
}

impl Unsubscribe {
    /// Remove the registration. Returns false if it was already gone (or the
    /// store has been dropped).
    pub fn unsubscribe(self) -> bool {
        let Some(inner) = self.store.upgrade() else {
            return false;
        };
        let mut registrations = inner.registrations.lock();
        let before = registrations.len();
        registrations.retain(|r| r.id != self.id);
        before != registrations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn set_notifies_key_then_wildcard() {
        let store = Store::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let o = Arc::clone(&order);
        let _all = store.subscribe(Topic::All, move |c| o.lock().push(format!("all:{}", c.key)));
        let o = Arc::clone(&order);
        let _key = store.subscribe(StateKey::PointsAccumulated, move |_| {
            o.lock().push("points".to_string())
        });

        store.set(StateValue::PointsAccumulated(1.0));
        assert_eq!(
            *order.lock(),
            vec!["points".to_string(), "all:pointsAccumulated".to_string()]
        );
    }

    #[test]
    fn unsubscribe_removes_only_that_registration() {
        let store = Store::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let h = Arc::clone(&hits);
        let first = store.subscribe(StateKey::Concepts, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        let h = Arc::clone(&hits);
        let _second = store.subscribe(StateKey::Concepts, move |_| {
            h.fetch_add(10, Ordering::SeqCst);
        });

        assert!(first.unsubscribe());
        store.set(StateValue::Concepts(vec!["x".into()]));
        assert_eq!(hits.load(Ordering::SeqCst), 10);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn callbacks_may_reenter_the_store() {
        let store = Store::new();
        let inner = store.clone();
        let _sub = store.subscribe(StateKey::Articles, move |_| {
            if !inner.data_loaded() {
                inner.set(StateValue::DataLoaded(true));
            }
        });
        store.set(StateValue::Articles(vec![]));
        assert!(store.data_loaded());
    }

    #[test]
    fn update_notifies_once_per_key() {
        let store = Store::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let _sub = store.subscribe(Topic::All, move |c| s.lock().push(c.key));

        store.update([
            StateValue::PointsAccumulated(2.0),
            StateValue::DataLoaded(true),
        ]);
        assert_eq!(
            *seen.lock(),
            vec![StateKey::PointsAccumulated, StateKey::DataLoaded]
        );
    }
}
