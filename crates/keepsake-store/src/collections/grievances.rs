use keepsake_model::Grievance;

use crate::confirm::{ConfirmStep, ConfirmThenAct};
use crate::state::StateKey;
use crate::store::Store;

/// Grievance list with two-click resolution.
#[derive(Debug, Clone, Copy)]
pub struct GrievancesView<'a> {
    store: &'a Store,
}

impl<'a> GrievancesView<'a> {
    /// Clicks needed to resolve (and remove) a grievance.
    pub const RESOLVE: ConfirmThenAct = ConfirmThenAct::new(2);

    pub(crate) fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn get_all(&self) -> Vec<Grievance> {
        self.store.read(|s| s.grievances.clone())
    }

    pub fn add(&self, grievance: Grievance) {
        self.store
            .mutate(StateKey::Grievances, |s| s.grievances.push(grievance));
    }

    /// Register a resolve click on the grievance at `index`.
    ///
    /// The grievance is removed once the click threshold is reached. Returns
    /// `None` for an out-of-range index.
    pub fn resolve_click(&self, index: usize) -> Option<ConfirmStep> {
        let mut step = None;
        self.store.mutate_if(StateKey::Grievances, |s| {
            step = Self::RESOLVE
                .click_at(&mut s.grievances, index)
                .map(|(step, _removed)| step);
            step.is_some()
        });
        step
    }
}
