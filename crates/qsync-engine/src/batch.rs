use std::collections::{BTreeMap, HashMap};

use qsync_policy::ParamOptions;
use qsync_types::{ParamKey, Snapshot};

use crate::error::{Result, SyncError};
use crate::navigator::Navigator;
use crate::session::{PassOutcome, PassReport, Session, SessionState};
use crate::table::{ParamTable, TrackedParam};

/// Keeps several query parameters in sync with one commit per pass.
///
/// Every pass evaluates all tracked keys against the same snapshot and folds
/// their corrections into a single navigation commit, so two keys that need
/// fixing at mount (a missing page and an invalid sort, say) produce one
/// history replacement, never two.
#[derive(Clone, Debug)]
pub struct BatchSync {
    session: Session,
}

impl BatchSync {
    /// Create an unmounted synchronizer for `keys`, in order.
    ///
    /// Fails on an empty key, on a repeated key, and on options given for a
    /// key that is not in `keys`. Keys without an entry in `options_by_key`
    /// are tracked without options.
    pub fn new<I, K>(keys: I, mut options_by_key: HashMap<String, ParamOptions>) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut params = Vec::new();
        for key in keys {
            let key = ParamKey::new(key)?;
            let options = options_by_key.remove(key.as_str());
            params.push(TrackedParam::new(key, options));
        }
        let table = ParamTable::new(params)?;
        if let Some(stray) = options_by_key.into_keys().min() {
            return Err(SyncError::UntrackedKey(stray));
        }
        Ok(Self {
            session: Session::new(table),
        })
    }

    /// Create from already-built keys and options, in order.
    pub fn from_params(params: Vec<(ParamKey, Option<ParamOptions>)>) -> Result<Self> {
        let params = params
            .into_iter()
            .map(|(key, options)| TrackedParam::new(key, options))
            .collect();
        Ok(Self {
            session: Session::new(ParamTable::new(params)?),
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &ParamKey> {
        self.session.table().keys()
    }

    pub fn options(&self, key: &str) -> Option<&ParamOptions> {
        self.session.table().options(key)
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_mounted()
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.session.state()
    }

    /// Run a pass over every tracked key; the first call mounts.
    pub fn observe<N: Navigator + ?Sized>(&mut self, nav: &mut N) -> Result<PassReport> {
        self.session.observe(nav)
    }

    /// Current value of every tracked key in the live store.
    pub fn values<N: Navigator + ?Sized>(&self, nav: &N) -> BTreeMap<String, Option<String>> {
        let snapshot = Snapshot::parse(&nav.query());
        self.keys()
            .map(|key| {
                let value = snapshot.get(key.as_str()).map(str::to_string);
                (key.to_string(), value)
            })
            .collect()
    }

    /// Current value of one tracked key in the live store.
    pub fn value<N: Navigator + ?Sized>(&self, key: &str, nav: &N) -> Result<Option<String>> {
        self.ensure_tracked(key)?;
        Ok(Snapshot::parse(&nav.query()).get(key).map(str::to_string))
    }

    /// Write `value` at a tracked `key` through the same commit path as a pass.
    pub fn set<N: Navigator + ?Sized>(
        &mut self,
        key: &str,
        value: &str,
        nav: &mut N,
    ) -> Result<PassOutcome> {
        self.ensure_tracked(key)?;
        self.session.set(key, value, nav)
    }

    fn ensure_tracked(&self, key: &str) -> Result<()> {
        if self.session.table().contains(key) {
            Ok(())
        } else {
            Err(SyncError::UntrackedKey(key.to_string()))
        }
    }
}
