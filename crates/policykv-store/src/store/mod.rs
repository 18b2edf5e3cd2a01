//! Policy store contract and its key-value implementation.

mod kv;
mod resolver;

pub use kv::KvPolicyStore;
pub use resolver::CandidateResolver;

pub use crate::config::schema::CandidateStrategy;

use async_trait::async_trait;

use policykv_core::{Policy, Result};

/// Storage capability consumed by a policy evaluation engine.
///
/// Candidate queries return a superset of the applicable policies: the
/// evaluator re-checks subjects, resources, actions and conditions itself.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Fails with `AlreadyExists` if the id is taken.
    async fn create(&self, policy: &Policy) -> Result<()>;

    /// Fails with `NotFound` if absent, `Corrupt` if undecodable.
    async fn get(&self, id: &str) -> Result<Policy>;

    /// Replace an existing record. Fails with `NotFound` if absent.
    async fn update(&self, policy: &Policy) -> Result<()>;

    /// Fails with `NotFound` if absent.
    async fn delete(&self, id: &str) -> Result<()>;

    /// One page of all records. A window reaching past the end returns
    /// every record.
    async fn list_all(&self, limit: usize, offset: usize) -> Result<Vec<Policy>>;

    async fn find_candidates(&self, subject: &str, resource: &str) -> Result<Vec<Policy>>;

    async fn find_policies_for_subject(&self, subject: &str) -> Result<Vec<Policy>>;

    async fn find_policies_for_resource(&self, resource: &str) -> Result<Vec<Policy>>;
}
