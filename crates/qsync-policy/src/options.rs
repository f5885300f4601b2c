use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::validator::Validate;

/// What to do with a value that fails validation (or is empty).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnInvalid {
    /// Replace the value with the configured default.
    ///
    /// Without a default this behaves exactly like [`OnInvalid::Remove`].
    #[default]
    Fallback,
    /// Drop the parameter from the query string.
    Remove,
}

/// Per-parameter synchronization options.
///
/// Options are captured once when a synchronizer is created and never
/// re-read afterwards.
#[derive(Clone, Default)]
pub struct ParamOptions {
    /// Value written when the parameter is missing, empty, or invalid.
    pub default_value: Option<String>,
    /// Optional validator; its output is authoritative.
    pub validator: Option<Arc<dyn Validate>>,
    pub on_invalid: OnInvalid,
}

impl ParamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_validator(mut self, validator: impl Validate + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Share an existing validator between several parameters.
    pub fn with_shared_validator(mut self, validator: Arc<dyn Validate>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_on_invalid(mut self, policy: OnInvalid) -> Self {
        self.on_invalid = policy;
        self
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn validator(&self) -> Option<&dyn Validate> {
        self.validator.as_deref()
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// The value to substitute for an unusable one, if any.
    ///
    /// `None` when the policy is [`OnInvalid::Remove`] or when no default is
    /// configured; both mean "remove the parameter".
    pub fn fallback(&self) -> Option<&str> {
        match self.on_invalid {
            OnInvalid::Fallback => self.default_value(),
            OnInvalid::Remove => None,
        }
    }
}

impl fmt::Debug for ParamOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamOptions")
            .field("default_value", &self.default_value)
            .field("validator", &self.validator.as_ref().map(|v| v.name()))
            .field("on_invalid", &self.on_invalid)
            .finish()
    }
}
