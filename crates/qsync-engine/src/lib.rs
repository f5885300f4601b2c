//! Query-string synchronization engine for qsync.
//!
//! A synchronizer owns one or more query parameters and keeps them valid and
//! defaulted in a navigation environment it reaches through the
//! [`Navigator`] trait. Each pass reads the current query string, asks the
//! reconciliation predicate which keys need a correction, resolves all of
//! them against one working snapshot, and commits at most one replacement.
//!
//! # Key Types
//!
//! - [`ParamSync`]: One parameter
//! - [`BatchSync`]: Several parameters, one commit per pass
//! - [`MemoryNavigator`]: History stack for tests and headless use
//! - [`SessionState`]: What a synchronizer remembers between passes
//!
//! # Quick Start
//!
//! ```rust
//! use qsync_engine::{MemoryNavigator, Navigator, ParamSync};
//! use qsync_policy::{OneOf, ParamOptions};
//!
//! let mut nav = MemoryNavigator::new("?status=bogus&page=2");
//! let options = ParamOptions::new()
//!     .with_default("active")
//!     .with_validator(OneOf::new(["active", "inactive"]));
//! let mut sync = ParamSync::new("status", Some(options)).unwrap();
//!
//! sync.observe(&mut nav).unwrap();
//! assert_eq!(nav.query(), "status=active&page=2");
//!
//! sync.set("inactive", &mut nav).unwrap();
//! assert_eq!(sync.value(&nav).as_deref(), Some("inactive"));
//! ```

pub mod batch;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod navigator;
pub mod predicate;
pub mod session;
pub mod single;
pub mod table;

// Re-exports for convenience.
pub use batch::BatchSync;
pub use error::{NavigationError, Result, SyncError};
pub use memory::MemoryNavigator;
pub use mutation::apply;
pub use navigator::Navigator;
pub use predicate::{correction, needs_correction, Correction};
pub use session::{reconcile, reconcile_set, PassOutcome, PassReport, Reconciled, SessionState};
pub use single::ParamSync;
pub use table::{ParamTable, TrackedParam};
