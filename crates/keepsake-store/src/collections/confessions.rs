use keepsake_model::Confession;

use crate::state::StateKey;
use crate::store::Store;

/// Confession history and points.
#[derive(Debug, Clone, Copy)]
pub struct ConfessionsView<'a> {
    store: &'a Store,
}

impl<'a> ConfessionsView<'a> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Full history, newest first.
    pub fn get_all(&self) -> Vec<Confession> {
        self.store.read(|s| s.confession_history.clone())
    }

    /// Sent confessions, newest first.
    pub fn get_sent(&self) -> Vec<Confession> {
        self.store.read(|s| {
            s.confession_history
                .iter()
                .filter(|c| c.sent)
                .cloned()
                .collect()
        })
    }

    /// Prepend to the history and notify `confessionHistory`.
    pub fn add(&self, confession: Confession) {
        self.store.mutate(StateKey::ConfessionHistory, |s| {
            s.confession_history.insert(0, confession);
        });
    }

    /// Add to the running total and notify `pointsAccumulated`.
    ///
    /// Negative amounts are ignored.
    pub fn add_points(&self, points: f64) {
        if !points.is_finite() || points < 0.0 {
            tracing::warn!(points, "ignoring invalid points amount");
            return;
        }
        self.store.mutate(StateKey::PointsAccumulated, |s| {
            s.points_accumulated += points;
        });
    }

    pub fn points(&self) -> f64 {
        self.store.points()
    }
}
