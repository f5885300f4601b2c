//! Session state and the reconciliation pass.
//!
//! The pass itself is pure: [`reconcile`] and [`reconcile_set`] take the
//! session record by reference and return the next one together with the
//! outcome. [`Session`] wires those functions to a [`Navigator`] and only
//! stores the next record once a required commit has succeeded.
//!
//! The remembered snapshot is updated optimistically at commit time. While
//! the store still shows the query string of the previous pass, the pass
//! works on the remembered snapshot instead of the stale store content, so a
//! commit that has not been reflected yet is neither repeated nor undone.
//! "Still shows" is judged against the store as read right after the last
//! pass, which for an immediate navigator already includes the commit.
//!
//! A commit stays pending until the store shows it. A candidate equal to the
//! pending commit is suppressed even when the store has moved in between, so
//! one session never issues the same query string twice in a row before it
//! is confirmed. After confirmation, an external edit away from the
//! committed value is corrected again like any other edit.

use tracing::debug;

use qsync_types::Snapshot;

use crate::error::Result;
use crate::mutation::apply;
use crate::navigator::Navigator;
use crate::predicate::{correction, Correction};
use crate::table::ParamTable;

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// What a synchronizer remembers between passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    /// The last snapshot this session committed or observed.
    remembered: Snapshot,
    /// The store's serialization at the last pass.
    seen: String,
    /// A commit the store has not shown yet.
    pending: Option<String>,
}

impl SessionState {
    /// Baseline captured on mount: the observed store, nothing written.
    pub fn mounted(observed: &Snapshot) -> Self {
        Self {
            remembered: observed.clone(),
            seen: observed.serialize(),
            pending: None,
        }
    }

    pub fn remembered(&self) -> &Snapshot {
        &self.remembered
    }

    pub fn seen(&self) -> &str {
        &self.seen
    }

    /// The last committed query string while the store does not show it.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// The pending commit, unless `observed_ser` shows it.
    fn unconfirmed(&self, observed_ser: &str) -> Option<String> {
        self.pending.clone().filter(|pending| pending != observed_ser)
    }

    /// The best current view of the store: the remembered snapshot while the
    /// store has not moved since the last pass, the observed one otherwise.
    fn view<'a>(&'a self, observed: &'a Snapshot, observed_ser: &str) -> &'a Snapshot {
        if observed_ser == self.seen {
            &self.remembered
        } else {
            observed
        }
    }
}

// ---------------------------------------------------------------------------
// Pass results
// ---------------------------------------------------------------------------

/// Result of one pass or one explicit write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassOutcome {
    /// No key needed a correction.
    Clean,
    /// A correction was computed but serialized identically to the current
    /// state, so no commit was issued.
    Suppressed,
    /// The navigator was asked to replace the query string with this one.
    Committed(String),
}

impl PassOutcome {
    pub fn is_commit(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// The committed query string, if any.
    pub fn committed(&self) -> Option<&str> {
        match self {
            Self::Committed(query) => Some(query),
            _ => None,
        }
    }
}

/// Outcome of a pass plus the keys that triggered a correction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PassReport {
    pub outcome: PassOutcome,
    pub corrections: Vec<(String, Correction)>,
}

impl PassReport {
    pub fn is_commit(&self) -> bool {
        self.outcome.is_commit()
    }

    pub fn committed(&self) -> Option<&str> {
        self.outcome.committed()
    }
}

/// A computed pass: the next session record and what to report.
#[derive(Clone, Debug)]
pub struct Reconciled {
    pub state: SessionState,
    pub report: PassReport,
}

// ---------------------------------------------------------------------------
// Pure passes
// ---------------------------------------------------------------------------

/// One reconciliation pass over every key in `table`.
///
/// `state` is `None` on mount. Every key is checked against the same view
/// and the same previous snapshot; all corrections go into a single
/// candidate, which is committed only if it serializes differently from the
/// view and from a commit the store has not shown yet.
pub fn reconcile(table: &ParamTable, state: Option<&SessionState>, observed: &Snapshot) -> Reconciled {
    let initial = state.is_none();
    let baseline = match state {
        Some(state) => state.clone(),
        None => SessionState::mounted(observed),
    };
    let observed_ser = observed.serialize();
    let view = baseline.view(observed, &observed_ser);

    let mut updates = Vec::new();
    let mut corrections = Vec::new();
    for param in table.iter() {
        let key = param.key().as_str();
        let raw = view.get(key);
        if let Some(reason) = correction(key, raw, initial, param.options(), &baseline.remembered) {
            updates.push((key, raw.unwrap_or("")));
            corrections.push((key.to_string(), reason));
        }
    }

    if updates.is_empty() {
        return Reconciled {
            state: SessionState {
                remembered: view.clone(),
                pending: baseline.unconfirmed(&observed_ser),
                seen: observed_ser,
            },
            report: PassReport {
                outcome: PassOutcome::Clean,
                corrections,
            },
        };
    }

    let candidate = apply(view, &updates, table);
    settle(&baseline, view, candidate, observed_ser, corrections)
}

/// An explicit write of `value` at `key`, as if the store had changed to it.
///
/// Commits only when the result differs from the last known state.
pub fn reconcile_set(
    table: &ParamTable,
    state: Option<&SessionState>,
    observed: &Snapshot,
    key: &str,
    value: &str,
) -> Reconciled {
    let baseline = match state {
        Some(state) => state.clone(),
        None => SessionState::mounted(observed),
    };
    let observed_ser = observed.serialize();
    let view = baseline.view(observed, &observed_ser);

    let candidate = apply(view, &[(key, value)], table);
    settle(&baseline, view, candidate, observed_ser, Vec::new())
}

/// No-op guard shared by both passes.
fn settle(
    baseline: &SessionState,
    view: &Snapshot,
    candidate: Snapshot,
    observed_ser: String,
    corrections: Vec<(String, Correction)>,
) -> Reconciled {
    let pending = baseline.unconfirmed(&observed_ser);
    let candidate_ser = candidate.serialize();

    if candidate_ser == view.serialize() {
        return Reconciled {
            state: SessionState {
                remembered: view.clone(),
                seen: observed_ser,
                pending,
            },
            report: PassReport {
                outcome: PassOutcome::Suppressed,
                corrections,
            },
        };
    }

    // The store moved away before showing our last commit; issuing the same
    // query again would be a duplicate navigation.
    if pending.as_deref() == Some(candidate_ser.as_str()) {
        return Reconciled {
            state: SessionState {
                remembered: candidate,
                seen: observed_ser,
                pending,
            },
            report: PassReport {
                outcome: PassOutcome::Suppressed,
                corrections,
            },
        };
    }

    Reconciled {
        state: SessionState {
            remembered: candidate,
            seen: observed_ser,
            pending: Some(candidate_ser.clone()),
        },
        report: PassReport {
            outcome: PassOutcome::Committed(candidate_ser),
            corrections,
        },
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Owned per-instance state shared by both synchronizers.
#[derive(Clone, Debug)]
pub(crate) struct Session {
    table: ParamTable,
    state: Option<SessionState>,
}

impl Session {
    pub(crate) fn new(table: ParamTable) -> Self {
        Self { table, state: None }
    }

    pub(crate) fn table(&self) -> &ParamTable {
        &self.table
    }

    pub(crate) fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub(crate) fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    /// Run one pass against the navigator's current query string.
    pub(crate) fn observe<N: Navigator + ?Sized>(&mut self, nav: &mut N) -> Result<PassReport> {
        let observed = Snapshot::parse(&nav.query());
        let reconciled = reconcile(&self.table, self.state.as_ref(), &observed);
        self.finish(reconciled, nav)
    }

    /// Write `value` at an owned `key`, mounting first if needed.
    pub(crate) fn set<N: Navigator + ?Sized>(
        &mut self,
        key: &str,
        value: &str,
        nav: &mut N,
    ) -> Result<PassOutcome> {
        if self.state.is_none() {
            self.observe(nav)?;
        }
        let observed = Snapshot::parse(&nav.query());
        let reconciled = reconcile_set(&self.table, self.state.as_ref(), &observed, key, value);
        Ok(self.finish(reconciled, nav)?.outcome)
    }

    fn finish<N: Navigator + ?Sized>(&mut self, reconciled: Reconciled, nav: &mut N) -> Result<PassReport> {
        let Reconciled { mut state, report } = reconciled;
        match &report.outcome {
            PassOutcome::Committed(query) => {
                nav.replace(query)?;
                // An immediate navigator already shows the commit here.
                state.seen = Snapshot::parse(&nav.query()).serialize();
                if state.seen == *query {
                    state.pending = None;
                }
                debug!(
                    query = %query,
                    corrected = report.corrections.len(),
                    "committed query string"
                );
            }
            PassOutcome::Suppressed => {
                debug!(corrected = report.corrections.len(), "suppressed no-op commit");
            }
            PassOutcome::Clean => {}
        }
        self.state = Some(state);
        Ok(report)
    }
}
