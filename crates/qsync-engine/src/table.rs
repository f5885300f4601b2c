use std::collections::HashSet;

use qsync_policy::ParamOptions;
use qsync_types::ParamKey;

use crate::error::{Result, SyncError};

/// One parameter owned by a synchronizer, with its fixed options.
#[derive(Clone, Debug)]
pub struct TrackedParam {
    key: ParamKey,
    options: Option<ParamOptions>,
}

impl TrackedParam {
    pub fn new(key: ParamKey, options: Option<ParamOptions>) -> Self {
        Self { key, options }
    }

    pub fn key(&self) -> &ParamKey {
        &self.key
    }

    pub fn options(&self) -> Option<&ParamOptions> {
        self.options.as_ref()
    }
}

/// The ordered, duplicate-free set of parameters a synchronizer owns.
///
/// Built once at construction; options are never re-read afterwards.
#[derive(Clone, Debug)]
pub struct ParamTable {
    params: Vec<TrackedParam>,
}

impl ParamTable {
    /// Build a table, rejecting the first repeated key.
    pub fn new(params: Vec<TrackedParam>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(params.len());
        for param in &params {
            if !seen.insert(param.key.as_str()) {
                return Err(SyncError::DuplicateKey(param.key.to_string()));
            }
        }
        Ok(Self { params })
    }

    /// A table with exactly one parameter.
    pub fn single(key: ParamKey, options: Option<ParamOptions>) -> Self {
        Self {
            params: vec![TrackedParam::new(key, options)],
        }
    }

    pub fn get(&self, key: &str) -> Option<&TrackedParam> {
        self.params.iter().find(|p| p.key.as_str() == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Options for `key`; `None` both for untracked keys and for tracked keys
    /// configured without options.
    pub fn options(&self, key: &str) -> Option<&ParamOptions> {
        self.get(key).and_then(TrackedParam::options)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedParam> {
        self.params.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ParamKey> {
        self.params.iter().map(|p| &p.key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
