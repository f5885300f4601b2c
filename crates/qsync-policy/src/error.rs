use thiserror::Error;

/// A validator rejected a raw parameter value.
///
/// The engine only cares that validation failed; the reason is carried for
/// logging and for callers that run validators directly.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid value: {reason}")]
pub struct ValidationError {
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading or checking parameter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter entry has an unusable key.
    #[error("invalid parameter key: {0}")]
    InvalidKey(#[from] qsync_types::TypeError),

    /// A `one_of` validator lists no values.
    #[error("parameter '{key}': one_of validator needs at least one value")]
    EmptyChoices { key: String },

    /// An `int_range` validator has `min > max`.
    #[error("parameter '{key}': int_range min {min} exceeds max {max}")]
    InvertedRange { key: String, min: i64, max: i64 },

    /// The configured default is rejected by the configured validator.
    #[error("parameter '{key}': default '{default}' fails its own validator: {reason}")]
    InvalidDefault {
        key: String,
        default: String,
        reason: String,
    },

    /// The configuration file is not valid TOML or has the wrong shape.
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
