//! policykv store library entry.
//!
//! This crate wires the record codec, the secondary index manager, and the
//! candidate resolver into a [`store::PolicyStore`] implementation over any
//! [`backend::KvBackend`]. It is consumed by the `policykv` binary and by
//! evaluation engines that need a candidate set for a (subject, resource)
//! pair.

pub mod backend;
pub mod config;
pub mod index;
pub mod ops;
pub mod store;

pub use backend::{KvBackend, MemoryBackend};
pub use ops::RebuildReport;
pub use store::{CandidateStrategy, KvPolicyStore, PolicyStore};
