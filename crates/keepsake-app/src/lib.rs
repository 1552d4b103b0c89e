//! Keepsake front-end.
//!
//! Wires the store and persistence gateway to a password gate, a menu and
//! four feature modules, and drives them from lines of text.
//!
//! # Views
//!
//! Exactly one [`View`] is active: the login gate, the menu, or one
//! feature. [`ViewManager`] mounts features on demand and cleans up the
//! outgoing feature before another one is shown.
//!
//! # Architecture
//!
//! - `app.rs` - the shell: login, menu, global commands, save/flush
//! - `lifecycle.rs` - the view lifecycle manager
//! - `feature/` - articles, confessions, suggestions, grievances
//! - `settings.rs` - TOML settings file
//! - `logging.rs` / `cli.rs` - binary plumbing

pub mod app;
pub mod auth;
pub mod cli;
pub mod command;
pub mod error;
pub mod feature;
pub mod lifecycle;
pub mod logging;
pub mod screen;
pub mod session;
pub mod settings;
pub mod stats;
pub mod view;

pub use app::{App, Reply};
pub use auth::Auth;
pub use command::Command;
pub use error::{AppError, Result, UserInputError};
pub use feature::{Feature, FeatureContext};
pub use lifecycle::ViewManager;
pub use screen::Screen;
pub use session::Session;
pub use settings::Settings;
pub use stats::DataStats;
pub use view::{FeatureKind, View};
