//! Reconciliation predicate.
//!
//! Decides, for one key of one observed snapshot, whether the synchronizer
//! has to write a correction. This is the single authority for "should I
//! write"; the engine never commits for a key the predicate did not flag,
//! apart from explicit `set` calls.

use std::fmt;

use tracing::trace;

use qsync_policy::ParamOptions;
use qsync_types::Snapshot;

/// Why a key needs a corrective write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Correction {
    /// First observation and the value is not the configured default.
    DefaultOnMount,
    /// First observation, no default, but a validator: validate once.
    ValidateOnMount,
    /// The key is present with an empty value.
    EmptyValue,
    /// The key is absent and a default exists.
    MissingDefault,
    /// The value changed since the synchronizer's last commit and has to be
    /// revalidated.
    ExternalEdit,
}

impl Correction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultOnMount => "default_on_mount",
            Self::ValidateOnMount => "validate_on_mount",
            Self::EmptyValue => "empty_value",
            Self::MissingDefault => "missing_default",
            Self::ExternalEdit => "external_edit",
        }
    }
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first rule that demands a correction for `key`, if any.
///
/// `raw` is the observed value (`None` when the key is absent), `initial`
/// marks the mount pass, and `previous` is the snapshot the synchronizer
/// last committed or observed.
pub fn correction(
    key: &str,
    raw: Option<&str>,
    initial: bool,
    options: Option<&ParamOptions>,
    previous: &Snapshot,
) -> Option<Correction> {
    // Nothing to enforce for a plain, non-empty parameter.
    if options.is_none() && raw.is_some_and(|v| !v.is_empty()) {
        return None;
    }

    let default = options.and_then(ParamOptions::default_value);
    let has_validator = options.is_some_and(ParamOptions::has_validator);

    let found = if initial && default.is_some_and(|d| raw != Some(d)) {
        Some(Correction::DefaultOnMount)
    } else if initial && default.is_none() && has_validator {
        Some(Correction::ValidateOnMount)
    } else if raw == Some("") {
        Some(Correction::EmptyValue)
    } else if raw.is_none() && default.is_some() {
        Some(Correction::MissingDefault)
    } else if has_validator && raw != previous.get(key) {
        Some(Correction::ExternalEdit)
    } else {
        None
    };

    if let Some(rule) = found {
        trace!(key, ?raw, initial, rule = rule.as_str(), "correction needed");
    }
    found
}

/// Whether `key` needs a corrective write. See [`correction`].
pub fn needs_correction(
    key: &str,
    raw: Option<&str>,
    initial: bool,
    options: Option<&ParamOptions>,
    previous: &Snapshot,
) -> bool {
    correction(key, raw, initial, options, previous).is_some()
}
