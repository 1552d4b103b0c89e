//! Feature modules mounted by the [`ViewManager`](crate::ViewManager).
//!
//! A feature renders from the store every time it is shown and keeps only
//! UI state of its own (current mode, filters, an RNG). Anything it writes
//! goes through the store so subscribers and autosave see it.

mod articles;
mod confessions;
mod grievances;
mod suggestions;

use std::sync::Arc;

pub use articles::ArticlesFeature;
pub use confessions::{ConfessionsFeature, STARTERS};
pub use grievances::GrievancesFeature;
pub use suggestions::SuggestionsFeature;

use keepsake_store::{Notifier, Store};

use crate::command::Command;
use crate::error::UserInputError;
use crate::screen::Screen;
use crate::session::Session;
use crate::view::FeatureKind;

/// A help entry: usage and what it does.
pub type HelpEntry = (&'static str, &'static str);

/// Capabilities shared by every feature module.
pub trait Feature: Send {
    fn kind(&self) -> FeatureKind;

    /// Render from current store state.
    fn show(&mut self, ctx: &FeatureContext) -> Screen;

    /// Release anything tied to the feature being visible. Called before
    /// another feature is mounted.
    fn cleanup(&mut self) {}

    /// Handle a feature command. `None` means the command is not one of
    /// this feature's.
    fn handle(&mut self, ctx: &FeatureContext, command: &Command) -> Option<Screen>;

    fn help(&self) -> &'static [HelpEntry];
}

/// What a feature may touch while it runs.
#[derive(Clone)]
pub struct FeatureContext {
    pub store: Store,
    pub notifier: Arc<dyn Notifier>,
    pub session: Session,
}

impl std::fmt::Debug for FeatureContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureContext")
            .field("store", &self.store)
            .field("user", &self.session.user())
            .finish_non_exhaustive()
    }
}

impl FeatureContext {
    pub fn new(store: Store, notifier: Arc<dyn Notifier>, session: Session) -> Self {
        Self {
            store,
            notifier,
            session,
        }
    }

    /// Report bad input as a warning.
    pub fn reject(&self, err: &UserInputError) {
        tracing::debug!(error = %err, "input rejected");
        self.notifier.notify(err.notice());
    }
}

/// One of each feature, ready to register.
pub fn default_features() -> Vec<Box<dyn Feature>> {
    vec![
        Box::new(ArticlesFeature::new()),
        Box::new(ConfessionsFeature::new()),
        Box::new(SuggestionsFeature::new()),
        Box::new(GrievancesFeature::new()),
    ]
}

pub(crate) fn help_lines(entries: &[HelpEntry]) -> impl Iterator<Item = String> + '_ {
    entries
        .iter()
        .map(|(usage, about)| format!("  {usage:<32} {about}"))
}
