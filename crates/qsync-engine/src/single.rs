use qsync_policy::ParamOptions;
use qsync_types::{ParamKey, Snapshot};

use crate::error::Result;
use crate::navigator::Navigator;
use crate::session::{PassOutcome, PassReport, Session, SessionState};
use crate::table::ParamTable;

/// Keeps one query parameter valid and defaulted.
///
/// Lifecycle: construct when the owning view activates, call
/// [`observe`](Self::observe) once to mount and again after every change of
/// the store, drop on deactivation. [`value`](Self::value) always reads the
/// live store; [`set`](Self::set) is the only way a caller writes.
#[derive(Clone, Debug)]
pub struct ParamSync {
    key: ParamKey,
    session: Session,
}

impl ParamSync {
    /// Create an unmounted synchronizer for `key`.
    ///
    /// `options` are captured here and never re-read.
    pub fn new(key: impl Into<String>, options: Option<ParamOptions>) -> Result<Self> {
        let key = ParamKey::new(key)?;
        let table = ParamTable::single(key.clone(), options);
        Ok(Self {
            key,
            session: Session::new(table),
        })
    }

    pub fn key(&self) -> &ParamKey {
        &self.key
    }

    pub fn options(&self) -> Option<&ParamOptions> {
        self.session.table().options(self.key.as_str())
    }

    /// `true` once the first pass has completed.
    pub fn is_mounted(&self) -> bool {
        self.session.is_mounted()
    }

    /// The session record, once mounted.
    pub fn state(&self) -> Option<&SessionState> {
        self.session.state()
    }

    /// Run a pass against the navigator's current query string.
    ///
    /// The first call mounts the synchronizer.
    pub fn observe<N: Navigator + ?Sized>(&mut self, nav: &mut N) -> Result<PassReport> {
        self.session.observe(nav)
    }

    /// The parameter's current value in the live store.
    pub fn value<N: Navigator + ?Sized>(&self, nav: &N) -> Option<String> {
        Snapshot::parse(&nav.query())
            .get(self.key.as_str())
            .map(str::to_string)
    }

    /// Write `value` through the policy and commit if anything changes.
    pub fn set<N: Navigator + ?Sized>(&mut self, value: &str, nav: &mut N) -> Result<PassOutcome> {
        self.session.set(self.key.as_str(), value, nav)
    }
}
