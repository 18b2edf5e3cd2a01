use std::collections::BTreeSet;
use std::sync::Arc;

use futures_util::future::try_join_all;

use policykv_core::codec::decode_policy;
use policykv_core::{IndexKind, Keyspace, Policy, Result};

use crate::backend::KvBackend;
use crate::index::IndexManager;

/// Turns index lookups (or a full scan) into decoded policies.
///
/// A key that vanished between enumeration and fetch is skipped: it is the
/// footprint of a concurrent or half-finished delete. A payload that is
/// present but undecodable fails the whole query with `Corrupt`.
#[derive(Clone)]
pub struct CandidateResolver {
    backend: Arc<dyn KvBackend>,
    keys: Keyspace,
    index: IndexManager,
}

impl CandidateResolver {
    pub fn new(backend: Arc<dyn KvBackend>, keys: Keyspace, index: IndexManager) -> Self {
        Self { backend, keys, index }
    }

    /// Union of the members of every `(kind, literal)` lookup, deduplicated
    /// and ordered by policy id.
    pub async fn indexed(&self, lookups: &[(IndexKind, &str)]) -> Result<Vec<Policy>> {
        let sets = try_join_all(
            lookups
                .iter()
                .map(|(kind, literal)| self.index.members_of(*kind, literal)),
        )
        .await?;

        let ids: BTreeSet<String> = sets.into_iter().flatten().collect();
        let keys: Vec<String> = ids.iter().map(|id| self.keys.policy_key(id)).collect();
        self.fetch(&keys).await
    }

    /// Every record, unfiltered.
    pub async fn full_scan(&self) -> Result<Vec<Policy>> {
        let keys = self.record_keys().await?;
        self.fetch(&keys).await
    }

    /// Primary record keys in backend enumeration order.
    pub async fn record_keys(&self) -> Result<Vec<String>> {
        self.backend
            .list_keys_by_prefix(&self.keys.policy_prefix())
            .await
    }

    pub async fn fetch(&self, keys: &[String]) -> Result<Vec<Policy>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let payloads = self.backend.multi_get(keys).await?;
        let mut out = Vec::with_capacity(payloads.len());
        for (key, payload) in keys.iter().zip(payloads) {
            match payload {
                Some(bytes) => out.push(decode_policy(key, &bytes)?),
                None => tracing::warn!(%key, "policy record missing at fetch, skipping"),
            }
        }
        Ok(out)
    }
}
