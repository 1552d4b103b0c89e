//! The view lifecycle manager.
//!
//! Exactly one [`View`] is active. Feature modules are mounted on demand:
//! switching to a different feature first runs the outgoing feature's
//! cleanup, and every mount re-renders from the store.

use std::collections::HashMap;

use crate::command::Command;
use crate::error::{AppError, Result};
use crate::feature::{Feature, FeatureContext};
use crate::screen::Screen;
use crate::view::{FeatureKind, View};

pub struct ViewManager {
    ctx: FeatureContext,
    features: HashMap<FeatureKind, Box<dyn Feature>>,
    current: View,
    active: Option<FeatureKind>,
}

impl std::fmt::Debug for ViewManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut registered: Vec<_> = self.features.keys().copied().collect();
        registered.sort();
        f.debug_struct("ViewManager")
            .field("current", &self.current)
            .field("active", &self.active)
            .field("registered", &registered)
            .finish_non_exhaustive()
    }
}

impl ViewManager {
    /// A manager showing the login view with nothing mounted.
    pub fn new(ctx: FeatureContext) -> Self {
        Self {
            ctx,
            features: HashMap::new(),
            current: View::Login,
            active: None,
        }
    }

    /// Register a feature, replacing any previous one of the same kind.
    pub fn register(&mut self, feature: Box<dyn Feature>) {
        let kind = feature.kind();
        if self.active == Some(kind) {
            self.teardown();
        }
        self.features.insert(kind, feature);
    }

    #[must_use]
    pub fn with_features(mut self, features: impl IntoIterator<Item = Box<dyn Feature>>) -> Self {
        for feature in features {
            self.register(feature);
        }
        self
    }

    pub fn context(&self) -> &FeatureContext {
        &self.ctx
    }

    pub fn current_view(&self) -> View {
        self.current
    }

    /// The mounted feature, if any.
    pub fn active_feature(&self) -> Option<FeatureKind> {
        self.active
    }

    pub fn is_registered(&self, kind: FeatureKind) -> bool {
        self.features.contains_key(&kind)
    }

    /// Make `view` the only active view.
    ///
    /// Feature views go through [`load_feature`](Self::load_feature) and
    /// return its screen. Any other view unmounts the active feature.
    /// Showing the current view again only re-activates it.
    pub fn show_view(&mut self, view: View) -> Result<Option<Screen>> {
        if let Some(kind) = view.feature() {
            return self.load_feature(kind).map(Some);
        }
        self.teardown();
        if self.current != view {
            tracing::info!(from = %self.current, to = %view, "view changed");
        }
        self.current = view;
        Ok(None)
    }

    /// Mount `kind` and render it.
    ///
    /// A different active feature is cleaned up first. Loading the active
    /// feature again re-runs `show` without cleaning it up.
    pub fn load_feature(&mut self, kind: FeatureKind) -> Result<Screen> {
        if !self.features.contains_key(&kind) {
            return Err(AppError::FeatureUnavailable(kind.name().to_string()));
        }
        if self.active != Some(kind) {
            self.teardown();
            tracing::info!(feature = %kind, "feature mounted");
        }
        self.active = Some(kind);
        self.current = View::Feature(kind);

        let feature = self
            .features
            .get_mut(&kind)
            .ok_or_else(|| AppError::FeatureUnavailable(kind.name().to_string()))?;
        Ok(feature.show(&self.ctx))
    }

    /// Route a command to the active feature. `None` if no feature is
    /// mounted or it does not know the command.
    pub fn dispatch(&mut self, command: &Command) -> Option<Screen> {
        let kind = self.active?;
        let feature = self.features.get_mut(&kind)?;
        feature.handle(&self.ctx, command)
    }

    /// Re-render the active feature.
    pub fn refresh(&mut self) -> Option<Screen> {
        let kind = self.active?;
        let feature = self.features.get_mut(&kind)?;
        Some(feature.show(&self.ctx))
    }

    /// Help entries of the active feature.
    pub fn feature_help(&self) -> &'static [crate::feature::HelpEntry] {
        self.active
            .and_then(|kind| self.features.get(&kind))
            .map(|feature| feature.help())
            .unwrap_or_default()
    }

    fn teardown(&mut self) {
        let Some(kind) = self.active.take() else {
            return;
        };
        if let Some(feature) = self.features.get_mut(&kind) {
            feature.cleanup();
            tracing::debug!(feature = %kind, "feature cleaned up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use keepsake_store::{NoticeLog, Store};

    use crate::session::Session;

    #[derive(Default)]
    struct Counts {
        shows: AtomicUsize,
        cleanups: AtomicUsize,
    }

    struct Recorder {
        kind: FeatureKind,
        counts: Arc<Counts>,
        with_cleanup: bool,
    }

    impl Feature for Recorder {
        fn kind(&self) -> FeatureKind {
            self.kind
        }

        fn show(&mut self, _ctx: &FeatureContext) -> Screen {
            self.counts.shows.fetch_add(1, Ordering::SeqCst);
            Screen::new(self.kind.name())
        }

        fn cleanup(&mut self) {
            if self.with_cleanup {
                self.counts.cleanups.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn handle(&mut self, _ctx: &FeatureContext, command: &Command) -> Option<Screen> {
            (command.verb() == "ping").then(|| Screen::new("pong"))
        }

        fn help(&self) -> &'static [crate::feature::HelpEntry] {
            &[("ping", "Answer pong")]
        }
    }

    fn manager() -> (ViewManager, Arc<Counts>, Arc<Counts>) {
        let ctx = FeatureContext::new(Store::new(), Arc::new(NoticeLog::new()), Session::default());
        let articles = Arc::new(Counts::default());
        let grievances = Arc::new(Counts::default());
        let manager = ViewManager::new(ctx).with_features([
            Box::new(Recorder {
                kind: FeatureKind::Articles,
                counts: Arc::clone(&articles),
                with_cleanup: true,
            }) as Box<dyn Feature>,
            Box::new(Recorder {
                kind: FeatureKind::Grievances,
                counts: Arc::clone(&grievances),
                with_cleanup: false,
            }),
        ]);
        (manager, articles, grievances)
    }

    #[test]
    fn test_starts_on_login() {
        let (manager, _, _) = manager();
        assert_eq!(manager.current_view(), View::Login);
        assert_eq!(manager.active_feature(), None);
    }

    #[test]
    fn test_switching_features_cleans_up_previous() {
        let (mut manager, articles, grievances) = manager();

        manager.load_feature(FeatureKind::Articles).unwrap();
        assert_eq!(articles.cleanups.load(Ordering::SeqCst), 0);

        manager.load_feature(FeatureKind::Grievances).unwrap();
        assert_eq!(articles.cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(grievances.shows.load(Ordering::SeqCst), 1);
        assert_eq!(
            manager.current_view(),
            View::Feature(FeatureKind::Grievances)
        );
    }

    #[test]
    fn test_same_feature_reshows_without_cleanup() {
        let (mut manager, articles, _) = manager();

        manager.load_feature(FeatureKind::Articles).unwrap();
        manager.load_feature(FeatureKind::Articles).unwrap();
        assert_eq!(articles.shows.load(Ordering::SeqCst), 2);
        assert_eq!(articles.cleanups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_feature_without_cleanup_is_torn_down_quietly() {
        let (mut manager, _, grievances) = manager();

        manager.load_feature(FeatureKind::Grievances).unwrap();
        assert!(manager.show_view(View::Menu).unwrap().is_none());
        assert_eq!(manager.active_feature(), None);
        assert_eq!(grievances.cleanups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_menu_tears_down_active_feature() {
        let (mut manager, articles, _) = manager();

        manager.show_view(View::Feature(FeatureKind::Articles)).unwrap();
        manager.show_view(View::Menu).unwrap();
        manager.show_view(View::Menu).unwrap();
        assert_eq!(articles.cleanups.load(Ordering::SeqCst), 1);
        assert_eq!(manager.current_view(), View::Menu);
    }

    #[test]
    fn test_unregistered_feature_is_an_error() {
        let (mut manager, _, _) = manager();
        let err = manager.load_feature(FeatureKind::Confessions).unwrap_err();
        assert!(matches!(err, AppError::FeatureUnavailable(name) if name == "confessions"));
        assert_eq!(manager.current_view(), View::Login);
    }

    #[test]
    fn test_dispatch_goes_to_active_feature() {
        let (mut manager, _, _) = manager();
        let ping = Command::parse("ping").unwrap();
        assert!(manager.dispatch(&ping).is_none());

        manager.load_feature(FeatureKind::Articles).unwrap();
        assert_eq!(manager.dispatch(&ping).unwrap().title, "pong");
        assert!(manager.dispatch(&Command::parse("pong").unwrap()).is_none());
        assert_eq!(manager.feature_help().len(), 1);
    }
}
