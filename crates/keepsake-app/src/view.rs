//! Navigation state types.

use std::fmt;

// =============================================================================
// VIEW ENUM
// =============================================================================

/// The one view that is active at any time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Password gate.
    #[default]
    Login,

    /// Main menu.
    Menu,

    /// A feature module.
    Feature(FeatureKind),
}

impl View {
    /// Get the feature if this is a feature view.
    pub fn feature(self) -> Option<FeatureKind> {
        match self {
            Self::Feature(kind) => Some(kind),
            Self::Login | Self::Menu => None,
        }
    }

    pub fn is_login(self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn is_menu(self) -> bool {
        matches!(self, Self::Menu)
    }

    /// Parse a view name such as `menu` or `articles`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "login" => Some(Self::Login),
            "menu" => Some(Self::Menu),
            other => FeatureKind::from_name(other).map(Self::Feature),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Login => f.write_str("login"),
            Self::Menu => f.write_str("menu"),
            Self::Feature(kind) => f.write_str(kind.name()),
        }
    }
}

// =============================================================================
// FEATURES
// =============================================================================

/// The feature modules reachable from the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    Articles,
    Confessions,
    Suggestions,
    Grievances,
}

impl FeatureKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Articles => "articles",
            Self::Confessions => "confessions",
            Self::Suggestions => "suggestions",
            Self::Grievances => "grievances",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Articles => "📝 Our Article Collection",
            Self::Confessions => "🎲 Confession Roulette",
            Self::Suggestions => "📬 Suggestions Box",
            Self::Grievances => "📋 Grievances",
        }
    }

    pub const fn all() -> &'static [FeatureKind] {
        &[
            Self::Articles,
            Self::Confessions,
            Self::Suggestions,
            Self::Grievances,
        ]
    }

    /// Look up by name or by 1-based menu position.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if let Ok(position) = name.parse::<usize>() {
            return position
                .checked_sub(1)
                .and_then(|i| Self::all().get(i))
                .copied();
        }
        Self::all().iter().copied().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
