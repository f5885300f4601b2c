//! Validation and defaulting policy for qsync.
//!
//! Every value a synchronizer writes to the query string first passes
//! through [`resolve`], which combines the parameter's [`ParamOptions`]
//! (default value, validator, [`OnInvalid`] policy) into a single
//! [`Resolution`]: set a concrete value, or delete the parameter.
//!
//! # Quick Start
//!
//! ```rust
//! use qsync_policy::{resolve, OneOf, ParamOptions, Resolution};
//!
//! let options = ParamOptions::new()
//!     .with_default("active")
//!     .with_validator(OneOf::new(["active", "inactive"]));
//!
//! assert_eq!(resolve("inactive", Some(&options), None), Resolution::Set("inactive".into()));
//! assert_eq!(resolve("ACTIVE", Some(&options), None), Resolution::Set("active".into()));
//! ```

pub mod config;
pub mod error;
pub mod options;
pub mod resolve;
pub mod validator;

pub use config::{ParamConfig, ParamSetConfig, ValidatorSpec};
pub use error::{ConfigError, ValidationError};
pub use options::{OnInvalid, ParamOptions};
pub use resolve::{resolve, Resolution};
pub use validator::{IntRange, OneOf, Trimmed, Validate};
