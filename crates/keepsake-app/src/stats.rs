//! Data statistics shown from the menu.

use std::fmt;
use std::time::Duration;

use keepsake_model::User;
use keepsake_store::{Notice, NoticeKind, Store};

#[derive(Debug, Clone, PartialEq)]
pub struct DataStats {
    pub articles: usize,
    pub confessions_sent: usize,
    pub points: f64,
    pub concepts: usize,
    pub suggestions: usize,
    pub grievances: usize,
    pub user: User,
}

impl DataStats {
    pub fn collect(store: &Store, user: User) -> Self {
        store.read(|s| Self {
            articles: s.articles.len(),
            confessions_sent: s.confession_history.iter().filter(|c| c.sent).count(),
            points: s.points_accumulated,
            concepts: s.concepts.len(),
            suggestions: s.suggestions.total(),
            grievances: s.grievances.len(),
            user,
        })
    }

    pub fn notice(&self) -> Notice {
        Notice::new(self.to_string(), NoticeKind::Info).with_duration(Duration::from_secs(8))
    }
}

impl fmt::Display for DataStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Data Statistics:")?;
        writeln!(f, "• Articles: {}", self.articles)?;
        writeln!(f, "• Confessions sent: {}", self.confessions_sent)?;
        writeln!(f, "• Points: {}", self.points)?;
        writeln!(f, "• Concepts: {}", self.concepts)?;
        writeln!(f, "• Suggestions: {}", self.suggestions)?;
        writeln!(f, "• Grievances: {}", self.grievances)?;
        write!(f, "• Current User: {}", self.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_model::{Confession, Probability};

    #[test]
    fn test_collect() {
        let store = Store::new();
        store
            .confessions()
            .add(Confession::sent("x", Probability::default(), "1/1/2025"));
        store.confessions().add_points(2.0);

        let stats = DataStats::collect(&store, User::Emran);
        assert_eq!(stats.confessions_sent, 1);
        assert_eq!(stats.concepts, 6);
        let text = stats.to_string();
        assert!(text.contains("• Points: 2"));
        assert!(text.ends_with("Current User: Emran"));
        assert_eq!(stats.notice().duration, Duration::from_secs(8));
    }
}
