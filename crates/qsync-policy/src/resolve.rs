//! Validation and defaulting policy.
//!
//! [`resolve`] turns a raw parameter value into a concrete decision: write a
//! value, or delete the parameter. It never fails; an invalid value is always
//! resolved to the fallback or to removal.

use tracing::trace;

use crate::options::ParamOptions;

/// The decision for one parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Write this value at the key.
    Set(String),
    /// Remove the key from the query string.
    Delete,
}

impl Resolution {
    pub fn is_delete(&self) -> bool {
        matches!(self, Self::Delete)
    }

    /// The value to write, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Set(v) => Some(v),
            Self::Delete => None,
        }
    }
}

/// Decide what to commit for `raw` under `options`.
///
/// - Without options, non-empty values are kept and empty ones deleted.
/// - With a validator, its normalized output wins; a failure falls back to
///   the default (policy `fallback`) or deletes (policy `remove`, or no
///   default).
/// - Without a validator, only emptiness is checked, with the same
///   fallback/remove rule.
///
/// `previous` is the value currently held for the key. It does not affect
/// the decision.
pub fn resolve(raw: &str, options: Option<&ParamOptions>, previous: Option<&str>) -> Resolution {
    let resolution = match options {
        None => keep_unless_empty(raw),
        Some(opts) => match opts.validator() {
            Some(validator) => match validator.validate(raw) {
                Ok(normalized) => Resolution::Set(normalized),
                Err(err) => {
                    trace!(validator = validator.name(), reason = %err.reason, "value rejected");
                    fallback_or_delete(opts)
                }
            },
            None if raw.is_empty() => fallback_or_delete(opts),
            None => Resolution::Set(raw.to_string()),
        },
    };
    trace!(raw, ?previous, ?resolution, "resolved parameter value");
    resolution
}

fn keep_unless_empty(raw: &str) -> Resolution {
    if raw.is_empty() {
        Resolution::Delete
    } else {
        Resolution::Set(raw.to_string())
    }
}

fn fallback_or_delete(opts: &ParamOptions) -> Resolution {
    match opts.fallback() {
        Some(default) => Resolution::Set(default.to_string()),
        None => Resolution::Delete,
    }
}
