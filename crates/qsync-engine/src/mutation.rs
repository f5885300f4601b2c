//! Mutation engine: the only place a snapshot is changed.

use qsync_policy::{resolve, Resolution};
use qsync_types::Snapshot;

use crate::table::ParamTable;

/// Apply `updates` (key, raw value) to a copy of `snapshot`.
///
/// Each update is resolved against the key's options in `table` and then
/// written or removed. Updates run in order on one working copy, so a later
/// update sees the effect of earlier ones. Keys not in `table` resolve as
/// parameters without options. Every other key is carried over untouched.
pub fn apply(snapshot: &Snapshot, updates: &[(&str, &str)], table: &ParamTable) -> Snapshot {
    let mut working = snapshot.clone();
    for &(key, raw) in updates {
        match resolve(raw, table.options(key), working.get(key)) {
            Resolution::Set(value) => working.set(key, value),
            Resolution::Delete => {
                working.remove(key);
            }
        }
    }
    working
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsync_policy::{IntRange, OnInvalid, OneOf, ParamOptions};
    use qsync_types::ParamKey;

    use crate::table::TrackedParam;

    fn table() -> ParamTable {
        ParamTable::new(vec![
            TrackedParam::new(
                ParamKey::new("page").unwrap(),
                Some(
                    ParamOptions::new()
                        .with_default("1")
                        .with_validator(IntRange::new(1, 50)),
                ),
            ),
            TrackedParam::new(
                ParamKey::new("status").unwrap(),
                Some(
                    ParamOptions::new()
                        .with_validator(OneOf::new(["open", "closed"]))
                        .with_on_invalid(OnInvalid::Remove),
                ),
            ),
            TrackedParam::new(ParamKey::new("q").unwrap(), None),
        ])
        .unwrap()
    }

    #[test]
    fn input_snapshot_is_not_mutated() {
        let snap = Snapshot::parse("page=0");
        let out = apply(&snap, &[("page", "0")], &table());
        assert_eq!(snap.serialize(), "page=0");
        assert_eq!(out.serialize(), "page=1");
    }

    #[test]
    fn validator_normalizes_written_value() {
        let out = apply(&Snapshot::parse("page=007"), &[("page", "007")], &table());
        assert_eq!(out.get("page"), Some("7"));
    }

    #[test]
    fn remove_policy_deletes_invalid_key() {
        let out = apply(&Snapshot::parse("status=weird&x=1"), &[("status", "weird")], &table());
        assert_eq!(out.serialize(), "x=1");
    }

    #[test]
    fn unrelated_keys_pass_through_verbatim() {
        let snap = Snapshot::parse("z=last&page=9&a=first&a=again");
        let out = apply(&snap, &[("page", "3")], &table());
        assert_eq!(out.serialize(), "z=last&page=3&a=first&a=again");
    }

    #[test]
    fn later_updates_see_earlier_ones() {
        let out = apply(&Snapshot::new(), &[("q", "first"), ("q", "second")], &table());
        assert_eq!(out.serialize(), "q=second");

        let out = apply(&Snapshot::new(), &[("q", "first"), ("q", "")], &table());
        assert!(out.is_empty());
    }

    #[test]
    fn batch_applies_every_key() {
        let snap = Snapshot::parse("status=bogus&q=");
        let out = apply(&snap, &[("page", ""), ("status", "bogus"), ("q", "")], &table());
        assert_eq!(out.serialize(), "page=1");
    }

    #[test]
    fn untracked_keys_resolve_without_options() {
        let out = apply(&Snapshot::parse("x=1"), &[("x", "")], &table());
        assert!(out.is_empty());
    }
}
