//! The [`Navigator`] trait: the engine's only view of the outside world.
//!
//! A navigator owns the live query string. Synchronizers read it on every
//! pass and ask it to replace the current history entry when a correction
//! or an explicit write has to be committed.

use crate::error::NavigationError;

/// Read/commit access to the navigable query string.
///
/// Implementations decide when a commit becomes visible through
/// [`query`](Self::query); synchronizers never assume it is immediate.
pub trait Navigator {
    /// The current serialized query string (a leading `?` is tolerated).
    fn query(&self) -> String;

    /// Replace the current history entry's query string.
    ///
    /// This must not push a new history entry.
    fn replace(&mut self, query: &str) -> Result<(), NavigationError>;
}
