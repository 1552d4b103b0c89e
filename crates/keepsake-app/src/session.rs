//! Who is using the app right now.

use std::sync::Arc;

use keepsake_model::User;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct SessionState {
    user: User,
    authenticated: bool,
}

/// Shared session handle. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new(user: User) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                user,
                authenticated: false,
            })),
        }
    }

    pub fn user(&self) -> User {
        self.state.read().user
    }

    pub fn set_user(&self, user: User) {
        self.state.write().user = user;
    }

    /// Switch to the other user and return the new one.
    pub fn toggle_user(&self) -> User {
        let mut state = self.state.write();
        state.user = state.user.other();
        tracing::info!(user = %state.user, "switched user");
        state.user
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().authenticated
    }

    pub fn log_in(&self) {
        self.state.write().authenticated = true;
    }

    pub fn log_out(&self) {
        self.state.write().authenticated = false;
    }
}
