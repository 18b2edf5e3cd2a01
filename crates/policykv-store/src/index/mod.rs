//! Secondary indices (subject -> ids, resource -> ids).
//!
//! Index entries are derived data. The primary records are the source of
//! truth and the index may lag them, but only toward over-inclusion: new
//! memberships are written before stale ones are removed.

pub mod manager;
pub mod reconcile;

pub use manager::IndexManager;
pub use reconcile::{delta_for, memberships, reconcile, IndexDelta, Membership};
