//! Declarative parameter configuration.
//!
//! Parameter sets can be described in TOML and turned into
//! [`ParamOptions`]. Only the built-in validators are expressible here;
//! custom validators are attached in code.
//!
//! ```toml
//! [[param]]
//! key = "status"
//! default = "active"
//! on_invalid = "fallback"
//! validator = { kind = "one_of", values = ["active", "inactive"] }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use qsync_types::ParamKey;

use crate::error::{ConfigError, Result};
use crate::options::{OnInvalid, ParamOptions};
use crate::validator::{IntRange, OneOf, Trimmed, Validate};

/// A built-in validator, as written in configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidatorSpec {
    OneOf {
        values: Vec<String>,
        #[serde(default)]
        case_insensitive: bool,
    },
    IntRange {
        #[serde(default)]
        min: i64,
        #[serde(default = "max_int")]
        max: i64,
        #[serde(default)]
        trim: bool,
    },
}

fn max_int() -> i64 {
    i64::MAX
}

impl ValidatorSpec {
    fn check(&self, key: &str) -> Result<()> {
        match self {
            Self::OneOf { values, .. } if values.is_empty() => Err(ConfigError::EmptyChoices {
                key: key.to_string(),
            }),
            Self::IntRange { min, max, .. } if min > max => Err(ConfigError::InvertedRange {
                key: key.to_string(),
                min: *min,
                max: *max,
            }),
            _ => Ok(()),
        }
    }

    fn build(&self) -> Box<dyn Validate> {
        match self {
            Self::OneOf {
                values,
                case_insensitive,
            } => {
                let v = OneOf::new(values.iter().cloned());
                if *case_insensitive {
                    Box::new(v.case_insensitive())
                } else {
                    Box::new(v)
                }
            }
            Self::IntRange { min, max, trim } => {
                let v = IntRange::new(*min, *max);
                if *trim {
                    Box::new(Trimmed(v))
                } else {
                    Box::new(v)
                }
            }
        }
    }
}

/// Configuration of one tracked parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamConfig {
    pub key: String,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub on_invalid: OnInvalid,
    #[serde(default)]
    pub validator: Option<ValidatorSpec>,
}

impl ParamConfig {
    /// Check the entry and build its key and options.
    ///
    /// A default that its own validator rejects is reported as
    /// [`ConfigError::InvalidDefault`].
    pub fn to_options(&self) -> Result<(ParamKey, ParamOptions)> {
        let key = ParamKey::new(self.key.clone())?;
        let mut options = ParamOptions::new().with_on_invalid(self.on_invalid);
        options.default_value = self.default.clone();

        if let Some(spec) = &self.validator {
            spec.check(&self.key)?;
            let validator = spec.build();
            if let Some(default) = &self.default {
                if let Err(err) = validator.validate(default) {
                    return Err(ConfigError::InvalidDefault {
                        key: self.key.clone(),
                        default: default.clone(),
                        reason: err.reason,
                    });
                }
            }
            options.validator = Some(validator.into());
        }

        Ok((key, options))
    }
}

/// A whole parameter set, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSetConfig {
    #[serde(default, rename = "param")]
    pub params: Vec<ParamConfig>,
}

impl ParamSetConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Build every entry, stopping at the first invalid one.
    pub fn build(&self) -> Result<Vec<(ParamKey, ParamOptions)>> {
        self.params.iter().map(ParamConfig::to_options).collect()
    }
}
