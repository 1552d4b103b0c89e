//! Dirty state tracking for auto-save.

/// Tracks unsaved changes to the persisted part of the store.
///
/// Changes are counted as revisions so that an edit made while a save is in
/// flight keeps the tracker dirty after that save completes.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Bumped on every change.
    revision: u64,

    /// Revision covered by the last successful save or load.
    saved_revision: u64,

    /// Revision being written by the save in progress.
    in_flight: Option<u64>,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    /// Record a change.
    pub fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    /// Everything is in sync, e.g. right after a load.
    pub fn mark_clean(&mut self) {
        self.saved_revision = self.revision;
        self.in_flight = None;
    }

    /// Mark that a save of the current revision has started.
    pub fn start_save(&mut self) {
        self.in_flight = Some(self.revision);
    }

    /// Mark that the save in progress has completed successfully.
    pub fn save_complete(&mut self) {
        if let Some(revision) = self.in_flight.take() {
            self.saved_revision = revision;
        }
    }

    /// Mark that the save in progress has failed. Changes stay dirty.
    pub fn save_failed(&mut self) {
        self.in_flight = None;
    }
}
