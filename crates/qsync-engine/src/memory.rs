//! In-memory navigator for tests, tools, and headless use.
//!
//! [`MemoryNavigator`] keeps a history stack of query strings with a cursor,
//! records every commit a synchronizer makes, and can optionally hold
//! commits back until [`flush`](MemoryNavigator::flush) to model an
//! environment that only reflects a replace on its next update.

use crate::error::NavigationError;
use crate::navigator::Navigator;

/// An in-memory implementation of [`Navigator`].
#[derive(Clone, Debug)]
pub struct MemoryNavigator {
    entries: Vec<String>,
    cursor: usize,
    commits: Vec<String>,
    deferred: bool,
    pending: Option<String>,
    reject: Option<String>,
}

impl MemoryNavigator {
    /// Start with a single history entry holding `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            entries: vec![normalize(query.into())],
            cursor: 0,
            commits: Vec::new(),
            deferred: false,
            pending: None,
            reject: None,
        }
    }

    /// Like [`new`](Self::new), but commits stay invisible until
    /// [`flush`](Self::flush).
    pub fn deferred(query: impl Into<String>) -> Self {
        Self {
            deferred: true,
            ..Self::new(query)
        }
    }

    /// External navigation: push a new entry and drop any forward history.
    pub fn push(&mut self, query: impl Into<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(normalize(query.into()));
        self.cursor = self.entries.len() - 1;
    }

    /// External edit of the current entry (e.g. the user retyping the URL).
    pub fn edit(&mut self, query: impl Into<String>) {
        self.entries[self.cursor] = normalize(query.into());
    }

    /// Step back in history. Returns `false` at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward in history. Returns `false` at the newest entry.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.entries.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Make the latest held-back commit visible. Returns `true` if there was one.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(query) => {
                self.entries[self.cursor] = query;
                true
            }
            None => false,
        }
    }

    /// Refuse every following commit with `reason`.
    pub fn reject_commits(&mut self, reason: impl Into<String>) {
        self.reject = Some(reason.into());
    }

    pub fn accept_commits(&mut self) {
        self.reject = None;
    }

    /// Every query string committed through [`Navigator::replace`], in order.
    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// All history entries, oldest first.
    pub fn history(&self) -> &[String] {
        &self.entries
    }
}

impl Default for MemoryNavigator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for MemoryNavigator {
    fn query(&self) -> String {
        self.entries[self.cursor].clone()
    }

    fn replace(&mut self, query: &str) -> Result<(), NavigationError> {
        if let Some(reason) = &self.reject {
            return Err(NavigationError::Rejected {
                query: query.to_string(),
                reason: reason.clone(),
            });
        }
        let query = normalize(query.to_string());
        self.commits.push(query.clone());
        if self.deferred {
            self.pending = Some(query);
        } else {
            self.entries[self.cursor] = query;
        }
        Ok(())
    }
}

fn normalize(query: String) -> String {
    match query.strip_prefix('?') {
        Some(rest) => rest.to_string(),
        None => query,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_overwrites_current_entry() {
        let mut nav = MemoryNavigator::new("?a=1");
        nav.replace("a=2").unwrap();
        assert_eq!(nav.query(), "a=2");
        assert_eq!(nav.history(), &["a=2".to_string()]);
        assert_eq!(nav.commits(), &["a=2".to_string()]);
    }

    #[test]
    fn push_back_forward() {
        let mut nav = MemoryNavigator::new("a=1");
        nav.push("a=2");
        nav.push("a=3");
        assert!(nav.back());
        assert_eq!(nav.query(), "a=2");
        assert!(nav.back());
        assert!(!nav.back());
        assert!(nav.forward());
        assert!(nav.forward());
        assert!(!nav.forward());
        assert_eq!(nav.query(), "a=3");
    }

    #[test]
    fn push_drops_forward_history() {
        let mut nav = MemoryNavigator::new("a=1");
        nav.push("a=2");
        nav.back();
        nav.push("b=1");
        assert_eq!(nav.history(), &["a=1".to_string(), "b=1".to_string()]);
    }

    #[test]
    fn external_edits_are_not_commits() {
        let mut nav = MemoryNavigator::new("");
        nav.edit("x=1");
        nav.push("x=2");
        assert_eq!(nav.commit_count(), 0);
    }

    #[test]
    fn deferred_commits_wait_for_flush() {
        let mut nav = MemoryNavigator::deferred("a=1");
        nav.replace("a=2").unwrap();
        assert_eq!(nav.query(), "a=1");
        assert!(nav.flush());
        assert_eq!(nav.query(), "a=2");
        assert!(!nav.flush());
    }

    #[test]
    fn rejected_commits_are_not_recorded() {
        let mut nav = MemoryNavigator::new("a=1");
        nav.reject_commits("read-only");
        let err = nav.replace("a=2").unwrap_err();
        assert_eq!(
            err,
            NavigationError::Rejected {
                query: "a=2".into(),
                reason: "read-only".into()
            }
        );
        assert_eq!(nav.commit_count(), 0);
        nav.accept_commits();
        assert!(nav.replace("a=2").is_ok());
    }
}
