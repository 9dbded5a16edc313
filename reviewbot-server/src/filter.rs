use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Authors whose pull requests are never reviewed.
///
/// Membership is case-insensitive. Built once at startup from
/// configuration; immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    authors: HashSet<String>,
}

impl IgnoreList {
    pub fn new(authors: &[String]) -> Self {
        Self {
            authors: authors
                .iter()
                .map(|author| author.to_lowercase())
                .collect(),
        }
    }

    pub fn is_ignored(&self, author: &str) -> bool {
        self.authors.contains(&author.to_lowercase())
    }
}

/// Whether a pull request was created within the last 24 hours.
///
/// The polling trigger only reviews recent pull requests, so a restart does
/// not re-review the whole backlog.
pub fn is_recent(creation_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(creation_date) <= Duration::hours(24)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignore_list(authors: &[&str]) -> IgnoreList {
        let authors: Vec<String> = authors.iter().map(|a| a.to_string()).collect();
        IgnoreList::new(&authors)
    }

    #[test]
    fn empty_list_ignores_nobody() {
        let list = IgnoreList::default();
        assert!(!list.is_ignored("anyone"));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let list = ignore_list(&["Bot-CI", "build service"]);
        assert!(list.is_ignored("bot-ci"));
        assert!(list.is_ignored("BOT-CI"));
        assert!(list.is_ignored("Build Service"));
        assert!(!list.is_ignored("human"));
    }

    #[test]
    fn recent_within_a_day() {
        let now = Utc::now();
        assert!(is_recent(now - Duration::hours(3), now));
        assert!(is_recent(now - Duration::hours(24), now));
    }

    #[test]
    fn stale_after_a_day() {
        let now = Utc::now();
        assert!(!is_recent(now - Duration::hours(25), now));
        assert!(!is_recent(now - Duration::days(7), now));
    }
}
