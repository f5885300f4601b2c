//! Foundation types for qsync.
//!
//! Every other qsync crate depends on `qsync-types`. It holds the two values
//! the synchronization engine moves around: the name of a tracked query
//! parameter and an immutable snapshot of the whole query string.
//!
//! # Key Types
//!
//! - [`ParamKey`]: Non-empty query parameter name
//! - [`Snapshot`]: Ordered key/value view of a query string, parsed from and
//!   serialized to `application/x-www-form-urlencoded`

pub mod error;
pub mod key;
pub mod snapshot;

pub use error::TypeError;
pub use key::ParamKey;
pub use snapshot::Snapshot;
