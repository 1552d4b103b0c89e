//! The bridge between the store and the remote document.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use keepsake_store::{AppState, Notifier, StateValue, Store, Topic, Unsubscribe};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::autosave::{AutoSaveConfig, Debouncer, DirtyTracker};
use crate::endpoint::RemoteEndpoint;
use crate::error::{ErrorKind, PersistenceError};
use crate::protocol::{self, SaveReceipt};

/// Result of [`PersistenceGateway::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// The remote document was merged into the store.
    Loaded,
    /// The load failed; the store kept its state and is now usable locally.
    Degraded(PersistenceError),
    /// Another load was in flight; nothing was done.
    AlreadyLoading,
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }
}

/// Result of [`PersistenceGateway::save`].
#[derive(Debug)]
pub enum SaveOutcome {
    Saved(SaveReceipt),
    /// A save was already in flight; it will run once more when it ends.
    Coalesced,
    /// The endpoint could not be written.
    Failed(PersistenceError),
    /// The save was refused before any request was made.
    Blocked(PersistenceError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved(_))
    }

    pub fn error(&self) -> Option<&PersistenceError> {
        match self {
            Self::Failed(err) | Self::Blocked(err) => Some(err),
            Self::Saved(_) | Self::Coalesced => None,
        }
    }
}

/// Clears an in-flight flag when the operation ends, however it ends, and
/// wakes anyone waiting for it.
struct FlagGuard<'a> {
    flag: &'a AtomicBool,
    released: Option<&'a Notify>,
}

impl<'a> FlagGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self {
                flag,
                released: None,
            })
    }

    fn notify_on_release(mut self, released: &'a Notify) -> Self {
        self.released = Some(released);
        self
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
        if let Some(released) = self.released {
            released.notify_waiters();
        }
    }
}

pub(crate) struct GatewayInner {
    pub(crate) store: Store,
    pub(crate) endpoint: Arc<dyn RemoteEndpoint>,
    pub(crate) notifier: Arc<dyn Notifier>,
    config: AutoSaveConfig,
    /// Held for the duration of every network exchange.
    pub(crate) io: tokio::sync::Mutex<()>,
    loading: AtomicBool,
    saving: AtomicBool,
    /// Signalled each time `saving` goes back to false.
    save_finished: Notify,
    resave_requested: AtomicBool,
    /// Set while a downloaded document is being merged.
    applying_remote: AtomicBool,
    /// Article count of the last document loaded or saved.
    baseline_articles: AtomicUsize,
    /// Set when the last load got an answer whose document could not be
    /// read. Unforced saves are refused until a load or forced save succeeds.
    remote_unreadable: AtomicBool,
    tracker: Mutex<DirtyTracker>,
    debouncer: Debouncer,
}

/// Loads the store from a [`RemoteEndpoint`] and saves it back.
///
/// Cloning is cheap; clones share the in-flight flags and the autosave
/// timer. At most one request is in flight at a time: a save requested
/// during a load waits for it, and saves requested during a save are folded
/// into one follow-up save.
#[derive(Clone)]
pub struct PersistenceGateway {
    pub(crate) inner: Arc<GatewayInner>,
}

impl std::fmt::Debug for PersistenceGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceGateway")
            .field("endpoint", &self.inner.endpoint.describe())
            .field("config", &self.inner.config)
            .field("saving", &self.is_saving())
            .finish_non_exhaustive()
    }
}

impl PersistenceGateway {
    pub fn new(
        store: Store,
        endpoint: Arc<dyn RemoteEndpoint>,
        notifier: Arc<dyn Notifier>,
        config: AutoSaveConfig,
    ) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            inner: Arc::new(GatewayInner {
                store,
                endpoint,
                notifier,
                config,
                io: tokio::sync::Mutex::new(()),
                loading: AtomicBool::new(false),
                saving: AtomicBool::new(false),
                save_finished: Notify::new(),
                resave_requested: AtomicBool::new(false),
                applying_remote: AtomicBool::new(false),
                baseline_articles: AtomicUsize::new(0),
                remote_unreadable: AtomicBool::new(false),
                tracker: Mutex::new(DirtyTracker::new()),
                debouncer,
            }),
        }
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn config(&self) -> &AutoSaveConfig {
        &self.inner.config
    }

    pub fn endpoint_description(&self) -> String {
        self.inner.endpoint.describe()
    }

    // ========================================================================
    // Load
    // ========================================================================

    /// Download the document and merge it into the store.
    ///
    /// Whatever happens, `dataLoaded` is true afterwards (unless another load
    /// was already running). Failures leave every persisted key untouched.
    /// When the endpoint answered but its document could not be read
    /// (a protocol or server error), saves stay blocked until a later load
    /// succeeds or a save is forced.
    pub async fn load(&self) -> LoadOutcome {
        let inner = &self.inner;
        let Some(_loading) = FlagGuard::acquire(&inner.loading) else {
            tracing::warn!("load already in progress");
            return LoadOutcome::AlreadyLoading;
        };
        inner.store.set(StateValue::IsLoading(true));

        let result = {
            let _io = inner.io.lock().await;
            match inner.endpoint.fetch().await {
                Ok(raw) => protocol::parse_load(&raw),
                Err(err) => Err(err),
            }
        };

        let outcome = match result {
            Ok(loaded) => {
                tracing::info!(
                    articles = loaded.document.articles.len(),
                    from_defaults = loaded.from_defaults,
                    "loaded remote data"
                );
                inner
                    .baseline_articles
                    .store(loaded.document.articles.len(), Ordering::Release);
                inner.remote_unreadable.store(false, Ordering::Release);

                let mut values = StateValue::from_document(loaded.document);
                values.push(StateValue::DataLoaded(true));
                inner.applying_remote.store(true, Ordering::Release);
                inner.store.update(values);
                inner.applying_remote.store(false, Ordering::Release);
                inner.tracker.lock().mark_clean();
                LoadOutcome::Loaded
            }
            Err(err) => {
                tracing::error!(error = %err, "load failed; continuing with local data");
                if matches!(err.kind(), ErrorKind::Protocol | ErrorKind::Server) {
                    inner.remote_unreadable.store(true, Ordering::Release);
                }
                inner
                    .notifier
                    .error(&format!("Load failed: {}", err.user_message()));
                inner.store.set(StateValue::DataLoaded(true));
                LoadOutcome::Degraded(err)
            }
        };

        inner.store.set(StateValue::IsLoading(false));
        outcome
    }

    // ========================================================================
    // Save
    // ========================================================================

    /// Write the current store snapshot to the endpoint.
    ///
    /// Never writes before data has been loaded: a save requested early
    /// waits for the running load, or starts one.
    pub async fn save(&self) -> SaveOutcome {
        self.save_with(false).await
    }

    /// Like [`save`](Self::save), but skips the empty-articles guard.
    pub async fn save_forced(&self) -> SaveOutcome {
        self.save_with(true).await
    }

    async fn save_with(&self, force: bool) -> SaveOutcome {
        let inner = &self.inner;
        if !inner.store.data_loaded() {
            if inner.loading.load(Ordering::Acquire) {
                tracing::debug!("save waiting for load to finish");
                drop(inner.io.lock().await);
            } else {
                tracing::info!("save requested before load; loading first");
                self.load().await;
            }
            if !inner.store.data_loaded() {
                return SaveOutcome::Blocked(PersistenceError::NotLoaded);
            }
        }

        let Some(saving) = FlagGuard::acquire(&inner.saving) else {
            tracing::debug!("save already in flight; coalescing");
            inner.resave_requested.store(true, Ordering::Release);
            return SaveOutcome::Coalesced;
        };
        let _saving = saving.notify_on_release(&inner.save_finished);

        loop {
            inner.resave_requested.store(false, Ordering::Release);
            let outcome = self.save_once(force).await;
            if !(outcome.is_saved() && inner.resave_requested.load(Ordering::Acquire)) {
                break outcome;
            }
            tracing::debug!("running coalesced save");
        }
    }

    async fn save_once(&self, force: bool) -> SaveOutcome {
        let inner = &self.inner;
        let _io = inner.io.lock().await;

        if !force && inner.remote_unreadable.load(Ordering::Acquire) {
            let err = PersistenceError::RemoteUnreadable {
                reason: "the last load could not read the saved document".into(),
            };
            tracing::warn!("refusing to save over a document that could not be read");
            inner.notifier.warning(&err.user_message());
            return SaveOutcome::Blocked(err);
        }

        let mut document = inner.store.read(AppState::to_document);
        let previous_articles = inner.baseline_articles.load(Ordering::Acquire);
        if !force && previous_articles > 0 && document.articles.is_empty() {
            let err = PersistenceError::SuspiciousWipe { previous_articles };
            tracing::warn!(previous_articles, "refusing to save an empty article list");
            inner.notifier.warning(&err.user_message());
            return SaveOutcome::Blocked(err);
        }

        document.last_saved = Some(
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        );
        let body = match serde_json::to_string(&document) {
            Ok(body) => body,
            Err(source) => {
                let err = PersistenceError::Serialization { source };
                tracing::error!(error = %err, "could not encode state");
                inner.notifier.error(&err.user_message());
                return SaveOutcome::Failed(err);
            }
        };

        inner.tracker.lock().start_save();
        let result = match inner.endpoint.replace(body).await {
            Ok(raw) => protocol::parse_save(&raw),
            Err(err) => Err(err),
        };

        match result {
            Ok(receipt) => {
                inner.tracker.lock().save_complete();
                inner
                    .baseline_articles
                    .store(document.articles.len(), Ordering::Release);
                inner.remote_unreadable.store(false, Ordering::Release);
                tracing::info!(
                    articles = document.articles.len(),
                    file_size = receipt.file_size,
                    "saved"
                );
                SaveOutcome::Saved(receipt)
            }
            Err(err) => {
                inner.tracker.lock().save_failed();
                tracing::error!(error = %err, "save failed");
                inner
                    .notifier
                    .error(&format!("Save failed: {}", err.user_message()));
                SaveOutcome::Failed(err)
            }
        }
    }

    // ========================================================================
    // Autosave
    // ========================================================================

    /// Restart the autosave timer. The save runs once the store has been
    /// quiet for the configured debounce delay.
    pub fn auto_save(&self) {
        if !self.inner.config.enabled {
            return;
        }
        let weak: Weak<GatewayInner> = Arc::downgrade(&self.inner);
        self.inner.debouncer.schedule(move || async move {
            if let Some(inner) = weak.upgrade() {
                PersistenceGateway { inner }.save().await;
            }
        });
    }

    /// Schedule an autosave whenever a persisted key changes after data has
    /// been loaded. Merges done by [`load`](Self::load) do not count.
    pub fn attach_auto_save(&self) -> Unsubscribe {
        let weak = Arc::downgrade(&self.inner);
        self.inner.store.subscribe(Topic::All, move |change| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !change.key.is_persisted()
                || inner.applying_remote.load(Ordering::Acquire)
                || !inner.store.data_loaded()
            {
                return;
            }
            inner.tracker.lock().mark_dirty();
            PersistenceGateway { inner }.auto_save();
        })
    }

    /// Cancel a waiting autosave and save now if anything is unsaved.
    ///
    /// A save already in flight (and its follow-up) is waited for first, so
    /// on return nothing is left running.
    pub async fn flush(&self) -> Option<SaveOutcome> {
        let cancelled = self.inner.debouncer.cancel();
        loop {
            self.wait_for_save().await;
            if !self.has_unsaved_changes() {
                return None;
            }
            tracing::debug!(cancelled, "flushing unsaved changes");
            match self.save().await {
                SaveOutcome::Coalesced => continue,
                outcome => return Some(outcome),
            }
        }
    }

    /// Resolve once no save is in flight.
    async fn wait_for_save(&self) {
        loop {
            let finished = self.inner.save_finished.notified();
            if !self.is_saving() {
                return;
            }
            tracing::debug!("waiting for the running save");
            finished.await;
        }
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.inner.tracker.lock().is_dirty()
    }

    pub fn is_saving(&self) -> bool {
        self.inner.saving.load(Ordering::Acquire)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.load(Ordering::Acquire)
    }

    pub fn autosave_pending(&self) -> bool {
        self.inner.debouncer.is_pending()
    }
}
