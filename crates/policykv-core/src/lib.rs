//! policykv core: policy model, record codec, keyspace naming, and errors.
//!
//! This crate defines the persisted shape of a policy and the error surface
//! shared by the store and its callers. It carries no runtime or backend
//! dependencies so evaluation engines can depend on it without pulling in a
//! storage client.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A malformed stored payload surfaces as `PolicyStoreError::Corrupt`, never
//! as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod codec;
pub mod error;
pub mod keys;
pub mod model;

/// Shared result type.
pub use error::{PolicyStoreError, Result};
pub use keys::{validate_prefix, IndexKind, Keyspace};
pub use model::{Effect, Policy};
