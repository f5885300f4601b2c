//! Query-string snapshots.
//!
//! A [`Snapshot`] is the full key/value content of the external parameter
//! store at one point in time. It keeps pairs in their original order and
//! keeps repeated keys exactly as parsed; only the keys a caller explicitly
//! writes are normalized.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Ordered key/value view of a query string.
///
/// Lookups follow the usual query-string conventions: [`get`](Self::get)
/// returns the first occurrence, [`set`](Self::set) overwrites the first
/// occurrence in place and drops any later ones, [`remove`](Self::remove)
/// drops every occurrence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pairs: Vec<(String, String)>,
}

impl Snapshot {
    /// An empty snapshot (no parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. A single leading `?` is ignored.
    ///
    /// ```
    /// use qsync_types::Snapshot;
    ///
    /// let snap = Snapshot::parse("?page=2&q=hello+world");
    /// assert_eq!(snap.get("page"), Some("2"));
    /// assert_eq!(snap.get("q"), Some("hello world"));
    /// ```
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        Self { pairs }
    }

    /// Serialize to `application/x-www-form-urlencoded` without a leading `?`.
    pub fn serialize(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// First value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value stored under `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Write `value` at `key`.
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(first) => {
                self.pairs[first].1 = value;
                let mut index = 0;
                self.pairs.retain(|(k, _)| {
                    let keep = index <= first || k != key;
                    index += 1;
                    keep
                });
            }
            None => self.pairs.push((key.to_string(), value)),
        }
    }

    /// Remove every occurrence of `key`. Returns `true` if anything was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        self.pairs.len() != before
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs, counting repeated keys.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

impl<K, V> FromIterator<(K, V)> for Snapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_empty_and_bare_question_mark() {
        assert!(Snapshot::parse("").is_empty());
        assert!(Snapshot::parse("?").is_empty());
    }

    #[test]
    fn parse_keeps_order_and_duplicates() {
        let snap = Snapshot::parse("b=2&a=1&b=3");
        let pairs: Vec<_> = snap.iter().collect();
        assert_eq!(pairs, vec![("b", "2"), ("a", "1"), ("b", "3")]);
        assert_eq!(snap.get("b"), Some("2"));
        assert_eq!(snap.get_all("b").collect::<Vec<_>>(), vec!["2", "3"]);
    }

    #[test]
    fn parse_distinguishes_empty_from_absent() {
        let snap = Snapshot::parse("page=&flag");
        assert_eq!(snap.get("page"), Some(""));
        assert_eq!(snap.get("flag"), Some(""));
        assert_eq!(snap.get("sort"), None);
        assert!(snap.contains("page"));
        assert!(!snap.contains("sort"));
    }

    #[test]
    fn parse_decodes_percent_and_plus() {
        let snap = Snapshot::parse("q=a%26b+c&name=%C3%A9t%C3%A9");
        assert_eq!(snap.get("q"), Some("a&b c"));
        assert_eq!(snap.get("name"), Some("été"));
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    #[test]
    fn serialize_encodes_reserved_characters() {
        let snap: Snapshot = [("q", "a&b c"), ("eq", "x=y")].into_iter().collect();
        assert_eq!(snap.serialize(), "q=a%26b+c&eq=x%3Dy");
        assert_eq!(snap.to_string(), snap.serialize());
    }

    #[test]
    fn serialize_empty_snapshot_is_empty_string() {
        assert_eq!(Snapshot::new().serialize(), "");
    }

    #[test]
    fn reserved_values_survive_round_trip() {
        let snap: Snapshot = [("q", "50% off & more"), ("path", "/a/b?c")]
            .into_iter()
            .collect();
        assert_eq!(Snapshot::parse(&snap.serialize()), snap);
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    #[test]
    fn set_overwrites_in_place() {
        let mut snap = Snapshot::parse("a=1&b=2&c=3");
        snap.set("b", "9");
        assert_eq!(snap.serialize(), "a=1&b=9&c=3");
    }

    #[test]
    fn set_appends_new_key() {
        let mut snap = Snapshot::parse("a=1");
        snap.set("z", "26");
        assert_eq!(snap.serialize(), "a=1&z=26");
    }

    #[test]
    fn set_collapses_later_duplicates() {
        let mut snap = Snapshot::parse("b=1&a=x&b=2&b=3");
        snap.set("b", "new");
        assert_eq!(snap.serialize(), "b=new&a=x");
    }

    #[test]
    fn remove_drops_every_occurrence() {
        let mut snap = Snapshot::parse("b=1&a=x&b=2");
        assert!(snap.remove("b"));
        assert_eq!(snap.serialize(), "a=x");
        assert!(!snap.remove("b"));
    }

    #[test]
    fn json_form_is_list_of_pairs() {
        let snap = Snapshot::parse("a=1&b=2");
        assert_eq!(serde_json::to_string(&snap).unwrap(), r#"[["a","1"],["b","2"]]"#);
    }

    proptest! {
        #[test]
        fn alphanumeric_round_trip(
            pairs in proptest::collection::vec(("[A-Za-z0-9]{1,8}", "[A-Za-z0-9]{0,8}"), 0..8)
        ) {
            let snap: Snapshot = pairs.into_iter().collect();
            prop_assert_eq!(Snapshot::parse(&snap.serialize()), snap);
        }

        #[test]
        fn reserved_characters_round_trip(
            pairs in proptest::collection::vec(("[a-z &=%+?/#]{1,6}", "[a-zé &=%+?/#]{0,6}"), 0..5)
        ) {
            let snap: Snapshot = pairs.into_iter().collect();
            prop_assert_eq!(Snapshot::parse(&snap.serialize()), snap);
        }
    }
}
