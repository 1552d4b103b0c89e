//! The application shell: login gate, menu and global commands around the
//! [`ViewManager`].

use std::sync::Arc;

use keepsake_persistence::{
    HttpEndpoint, MemoryEndpoint, PersistenceGateway, RemoteEndpoint, SaveOutcome,
};
use keepsake_store::{Notice, NoticeLog, Notifier, Store, Unsubscribe};

use crate::auth::Auth;
use crate::command::Command;
use crate::error::{AppError, Result};
use crate::feature::{FeatureContext, default_features, help_lines};
use crate::lifecycle::ViewManager;
use crate::screen::Screen;
use crate::session::Session;
use crate::settings::Settings;
use crate::stats::DataStats;
use crate::view::{FeatureKind, View};

const GLOBAL_HELP: &[(&str, &str)] = &[
    ("<feature name or number>", "Open a feature from the menu"),
    ("back", "Return to the menu"),
    ("save", "Save now"),
    ("save!", "Save even if it clears every article"),
    ("stats", "Show data statistics"),
    ("test", "Check the connection to the data endpoint"),
    ("user", "Switch between Saleen and Emran"),
    ("logout", "Return to the login screen"),
    ("quit", "Save pending changes and exit"),
];

/// What the front-end should do after a line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Draw this screen.
    Show(Screen),
    /// Nothing new to draw; print any pending notices.
    Nothing,
    /// Exit.
    Quit,
}

pub struct App {
    store: Store,
    gateway: PersistenceGateway,
    notices: Arc<NoticeLog>,
    session: Session,
    auth: Auth,
    views: ViewManager,
    autosave: Option<Unsubscribe>,
    confirming_logout: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("gateway", &self.gateway)
            .field("views", &self.views)
            .field("user", &self.session.user())
            .finish_non_exhaustive()
    }
}

impl App {
    /// Build the app around `endpoint`. Must be called inside a tokio runtime.
    pub fn new(settings: &Settings, endpoint: Arc<dyn RemoteEndpoint>) -> Self {
        let store = Store::new();
        let notices = Arc::new(NoticeLog::new());
        let notifier: Arc<dyn Notifier> = notices.clone();
        let session = Session::new(settings.session.default_user);
        let gateway = PersistenceGateway::new(
            store.clone(),
            endpoint,
            Arc::clone(&notifier),
            settings.autosave.clone(),
        );
        let ctx = FeatureContext::new(store.clone(), notifier, session.clone());
        Self {
            store,
            gateway,
            notices,
            session,
            auth: Auth::new(settings.auth.password.clone()),
            views: ViewManager::new(ctx).with_features(default_features()),
            autosave: None,
            confirming_logout: false,
        }
    }

    /// Build the endpoint the settings ask for: HTTP when a URL is set,
    /// in-memory otherwise.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let endpoint: Arc<dyn RemoteEndpoint> = match &settings.endpoint.url {
            Some(url) => Arc::new(HttpEndpoint::new(url.clone(), settings.endpoint.timeout())?),
            None => {
                tracing::info!("no endpoint configured; keeping data in memory");
                Arc::new(MemoryEndpoint::new())
            }
        };
        Ok(Self::new(settings, endpoint))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn gateway(&self) -> &PersistenceGateway {
        &self.gateway
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_view(&self) -> View {
        self.views.current_view()
    }

    /// Notices raised since the last call, oldest first.
    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.drain()
    }

    /// Load data, start autosaving and show the login screen.
    pub async fn start(&mut self) -> Screen {
        tracing::info!(endpoint = %self.gateway.endpoint_description(), "starting");
        let outcome = self.gateway.load().await;
        if !outcome.is_loaded() {
            tracing::warn!(?outcome, "starting with local data");
        }
        if self.autosave.is_none() {
            self.autosave = Some(self.gateway.attach_auto_save());
        }
        self.go_to_login()
    }

    /// Save anything pending and stop autosaving.
    pub async fn shutdown(&mut self) -> Option<SaveOutcome> {
        if let Some(handle) = self.autosave.take() {
            handle.unsubscribe();
        }
        let outcome = self.gateway.flush().await;
        if let Some(outcome) = &outcome {
            tracing::info!(saved = outcome.is_saved(), "final save");
        }
        outcome
    }

    /// Handle one line of input.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let Some(command) = Command::parse(line) else {
            return Reply::Nothing;
        };
        let confirming_logout = std::mem::take(&mut self.confirming_logout);

        if command.verb() == "quit" {
            return Reply::Quit;
        }
        if self.current_view().is_login() {
            return Reply::Show(self.login(line));
        }

        let reply = match command.verb() {
            "help" => Ok(Reply::Show(self.help())),
            "back" | "menu" => Ok(Reply::Show(self.go_to_menu())),
            "save" => Ok(self.save(false).await),
            "save!" => Ok(self.save(true).await),
            "stats" => {
                let stats = DataStats::collect(&self.store, self.session.user());
                self.notices.notify(stats.notice());
                Ok(Reply::Nothing)
            }
            "test" => {
                self.gateway.test_connection().await;
                Ok(Reply::Nothing)
            }
            "user" => {
                let user = self.session.toggle_user();
                self.notices.info(&format!("Switched to {user}! 👤"));
                Ok(self.views.refresh().map_or(Reply::Nothing, Reply::Show))
            }
            "logout" => Ok(self.logout(confirming_logout)),
            "open" => self.open(command.rest()),
            _ => self.route(&command),
        };
        reply.unwrap_or_else(|err| {
            tracing::debug!(error = %err, "command failed");
            self.notices.warning(&err.user_message());
            Reply::Nothing
        })
    }

    fn route(&mut self, command: &Command) -> Result<Reply> {
        if let Some(screen) = self.views.dispatch(command) {
            return Ok(Reply::Show(screen));
        }
        if self.current_view().is_menu() && command.rest().is_empty() {
            return self.open(command.verb());
        }
        Err(AppError::UnknownCommand(command.verb().to_string()))
    }

    fn open(&mut self, name: &str) -> Result<Reply> {
        let kind = FeatureKind::from_name(name)
            .ok_or_else(|| AppError::UnknownCommand(name.to_string()))?;
        self.views.load_feature(kind).map(Reply::Show)
    }

    fn login(&mut self, attempt: &str) -> Screen {
        if self.auth.check(attempt) {
            self.session.log_in();
            self.notices.success("Welcome! 💕");
            self.go_to_menu()
        } else {
            self.notices.error("bad giiirrlll >:< ");
            self.login_screen()
        }
    }

    fn logout(&mut self, confirmed: bool) -> Reply {
        if !confirmed {
            self.confirming_logout = true;
            self.notices
                .info("Are you sure you want to logout? Type 'logout' again to confirm.");
            return Reply::Nothing;
        }
        self.session.log_out();
        Reply::Show(self.go_to_login())
    }

    async fn save(&mut self, force: bool) -> Reply {
        let outcome = if force {
            self.gateway.save_forced().await
        } else {
            self.gateway.save().await
        };
        match &outcome {
            SaveOutcome::Saved(receipt) => {
                let message = receipt.message.as_deref().unwrap_or("Data saved! 💾");
                self.notices.success(message);
            }
            SaveOutcome::Coalesced => {
                self.notices
                    .info("A save is already running; your latest changes will follow it.");
            }
            SaveOutcome::Blocked(err) => {
                if let Some(suggestion) = err.suggestion() {
                    self.notices.info(&suggestion);
                } else {
                    self.notices.warning(&err.user_message());
                }
            }
            SaveOutcome::Failed(err) => {
                if let Some(suggestion) = err.suggestion() {
                    self.notices.info(&suggestion);
                }
            }
        }
        Reply::Nothing
    }

    fn go_to_login(&mut self) -> Screen {
        // Non-feature views cannot fail.
        let _ = self.views.show_view(View::Login);
        self.login_screen()
    }

    fn go_to_menu(&mut self) -> Screen {
        let _ = self.views.show_view(View::Menu);
        self.menu_screen()
    }

    fn login_screen(&self) -> Screen {
        Screen::new("Enjoy !")
            .line("Enter our secret password...")
            .line("I really hope you like it ! and more \"games\" to come! ✨")
    }

    fn menu_screen(&self) -> Screen {
        Screen::new(format!("Menu ({})", self.session.user()))
            .lines(
                FeatureKind::all()
                    .iter()
                    .enumerate()
                    .filter(|(_, kind)| self.views.is_registered(**kind))
                    .map(|(i, kind)| format!("  {}. {}", i + 1, kind.label())),
            )
            .blank()
            .line("Type a number or name, or 'help'.")
    }

    fn help(&self) -> Screen {
        let mut screen = Screen::new("Help").lines(help_lines(GLOBAL_HELP));
        let feature_help = self.views.feature_help();
        if !feature_help.is_empty() {
            screen = screen
                .blank()
                .line(format!("{}:", self.current_view()))
                .lines(help_lines(feature_help));
        }
        screen
    }
}
