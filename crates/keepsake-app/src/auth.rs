//! The password gate.
//!
//! This is a shared static password that keeps casual visitors out. It is
//! not access control.

#[derive(Debug, Clone)]
pub struct Auth {
    password: String,
}

impl Auth {
    pub const DEFAULT_PASSWORD: &'static str = "saleen";

    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// Surrounding whitespace is ignored.
    pub fn check(&self, attempt: &str) -> bool {
        attempt.trim() == self.password
    }
}

impl Default for Auth {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PASSWORD)
    }
}
