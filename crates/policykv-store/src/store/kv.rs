use std::sync::Arc;

use async_trait::async_trait;

use policykv_core::codec::{decode_policy, encode_policy};
use policykv_core::error::{PolicyStoreError, Result};
use policykv_core::{IndexKind, Keyspace, Policy};

use super::{CandidateResolver, CandidateStrategy, PolicyStore};
use crate::backend::KvBackend;
use crate::config::{StoreSection, DEFAULT_KEY_PREFIX};
use crate::index::{delta_for, IndexDelta, IndexManager};

/// Policy store over a [`KvBackend`].
///
/// Write ordering:
/// - create: primary (set-if-absent), then index adds
/// - update: read old, primary, then index adds, then index removals
/// - delete: read old, primary, then index removals
///
/// A failure after the primary step is returned to the caller and leaves the
/// record in place with a stale index. The index never loses a membership
/// that a live record still needs, except when an update's add step fails.
pub struct KvPolicyStore {
    backend: Arc<dyn KvBackend>,
    keys: Keyspace,
    strategy: CandidateStrategy,
    index: IndexManager,
    resolver: CandidateResolver,
}

impl KvPolicyStore {
    /// An empty `key_prefix` falls back to [`DEFAULT_KEY_PREFIX`]. Any other
    /// prefix must pass [`policykv_core::validate_prefix`], otherwise the
    /// store is refused with `BadRequest`.
    pub fn new(
        backend: Arc<dyn KvBackend>,
        key_prefix: &str,
        strategy: CandidateStrategy,
    ) -> Result<Self> {
        let prefix = if key_prefix.is_empty() { DEFAULT_KEY_PREFIX } else { key_prefix };
        let keys = Keyspace::new(prefix)?;
        let index = IndexManager::new(Arc::clone(&backend), keys.clone());
        let resolver = CandidateResolver::new(Arc::clone(&backend), keys.clone(), index.clone());
        Ok(Self {
            backend,
            keys,
            strategy,
            index,
            resolver,
        })
    }

    pub fn from_config(backend: Arc<dyn KvBackend>, cfg: &StoreSection) -> Result<Self> {
        Self::new(backend, &cfg.key_prefix, cfg.candidates)
    }

    pub fn strategy(&self) -> CandidateStrategy {
        self.strategy
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keys
    }

    pub(crate) fn backend(&self) -> &Arc<dyn KvBackend> {
        &self.backend
    }

    pub(crate) fn index(&self) -> &IndexManager {
        &self.index
    }

    pub(crate) fn resolver(&self) -> &CandidateResolver {
        &self.resolver
    }

    fn maintains_index(&self) -> bool {
        self.strategy == CandidateStrategy::Indexed
    }

    pub(crate) async fn read(&self, id: &str) -> Result<Policy> {
        let key = self.keys.policy_key(id);
        let payload = self
            .backend
            .get(&key)
            .await?
            .ok_or_else(|| PolicyStoreError::NotFound(id.to_string()))?;
        decode_policy(&key, &payload)
    }

    async fn apply_index(&self, policy_id: &str, delta: &IndexDelta) -> Result<()> {
        if delta.is_empty() {
            return Ok(());
        }
        self.index.apply(policy_id, delta).await.map_err(|e| {
            tracing::warn!(
                policy = %policy_id,
                error = %e,
                "primary record committed but index update failed"
            );
            e
        })
    }
}

#[async_trait]
impl PolicyStore for KvPolicyStore {
    async fn create(&self, policy: &Policy) -> Result<()> {
        policy.validate()?;
        let payload = encode_policy(policy)?;
        let key = self.keys.policy_key(&policy.id);

        if !self.backend.set_if_absent(&key, payload).await? {
            return Err(PolicyStoreError::AlreadyExists(policy.id.clone()));
        }

        if self.maintains_index() {
            self.apply_index(&policy.id, &delta_for(None, Some(policy))).await?;
        }

        tracing::debug!(policy = %policy.id, "policy created");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Policy> {
        self.read(id).await
    }

    async fn update(&self, policy: &Policy) -> Result<()> {
        policy.validate()?;
        let payload = encode_policy(policy)?;
        let key = self.keys.policy_key(&policy.id);

        // The old snapshot drives index reconciliation. Without indices only
        // existence matters, so an undecodable record can still be replaced.
        let old = if self.maintains_index() {
            Some(self.read(&policy.id).await?)
        } else {
            if self.backend.get(&key).await?.is_none() {
                return Err(PolicyStoreError::NotFound(policy.id.clone()));
            }
            None
        };

        self.backend.set(&key, payload).await?;

        if let Some(old) = old {
            self.apply_index(&policy.id, &delta_for(Some(&old), Some(policy))).await?;
        }

        tracing::debug!(policy = %policy.id, "policy updated");
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let key = self.keys.policy_key(id);

        // The id alone does not reveal index membership; read the record first.
        let old = if self.maintains_index() {
            Some(self.read(id).await?)
        } else {
            None
        };

        if !self.backend.delete(&key).await? {
            // Lost a race with another delete; that caller owns the cleanup.
            return Err(PolicyStoreError::NotFound(id.to_string()));
        }

        if let Some(old) = old {
            self.apply_index(id, &delta_for(Some(&old), None)).await?;
        }

        tracing::debug!(policy = %id, "policy deleted");
        Ok(())
    }

    async fn list_all(&self, limit: usize, offset: usize) -> Result<Vec<Policy>> {
        let keys = self.resolver.record_keys().await?;
        let page = if offset.saturating_add(limit) > keys.len() {
            &keys[..]
        } else {
            &keys[offset..offset + limit]
        };
        self.resolver.fetch(page).await
    }

    async fn find_candidates(&self, subject: &str, resource: &str) -> Result<Vec<Policy>> {
        match self.strategy {
            CandidateStrategy::Indexed => {
                self.resolver
                    .indexed(&[(IndexKind::Subject, subject), (IndexKind::Resource, resource)])
                    .await
            }
            CandidateStrategy::FullScan => self.resolver.full_scan().await,
        }
    }

    async fn find_policies_for_subject(&self, subject: &str) -> Result<Vec<Policy>> {
        match self.strategy {
            CandidateStrategy::Indexed => {
                self.resolver.indexed(&[(IndexKind::Subject, subject)]).await
            }
            CandidateStrategy::FullScan => self.resolver.full_scan().await,
        }
    }

    async fn find_policies_for_resource(&self, resource: &str) -> Result<Vec<Policy>> {
        match self.strategy {
            CandidateStrategy::Indexed => {
                self.resolver.indexed(&[(IndexKind::Resource, resource)]).await
            }
            CandidateStrategy::FullScan => self.resolver.full_scan().await,
        }
    }
}
