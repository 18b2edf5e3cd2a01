use std::collections::BTreeSet;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::future::try_join_all;

use policykv_core::{IndexKind, Keyspace, Result};

use super::reconcile::IndexDelta;
use crate::backend::KvBackend;

/// Secondary index over the backend.
///
/// Layout: one hash per literal (`<prefix>_<kind>_<literal>`), one field per
/// policy id. Every method is a single hash-field operation, so each
/// membership change is atomic on its own but a multi-literal change is not.
#[derive(Clone)]
pub struct IndexManager {
    backend: Arc<dyn KvBackend>,
    keys: Keyspace,
}

impl IndexManager {
    pub fn new(backend: Arc<dyn KvBackend>, keys: Keyspace) -> Self {
        Self { backend, keys }
    }

    pub async fn add_membership(
        &self,
        kind: IndexKind,
        literal: &str,
        policy_id: &str,
    ) -> Result<()> {
        let key = self.keys.index_key(kind, literal);
        self.backend.hash_field_set(&key, policy_id, Bytes::new()).await
    }

    pub async fn remove_membership(
        &self,
        kind: IndexKind,
        literal: &str,
        policy_id: &str,
    ) -> Result<()> {
        let key = self.keys.index_key(kind, literal);
        self.backend.hash_field_delete(&key, policy_id).await?;
        Ok(())
    }

    pub async fn members_of(&self, kind: IndexKind, literal: &str) -> Result<BTreeSet<String>> {
        let key = self.keys.index_key(kind, literal);
        let fields = self.backend.hash_get_all(&key).await?;
        Ok(fields.into_keys().collect())
    }

    /// Apply a delta for one policy. All adds land before any removal, so an
    /// interrupted delta leaves the index a superset of the truth.
    pub async fn apply(&self, policy_id: &str, delta: &IndexDelta) -> Result<()> {
        try_join_all(
            delta
                .to_add
                .iter()
                .map(|m| self.add_membership(m.kind, &m.literal, policy_id)),
        )
        .await?;

        try_join_all(
            delta
                .to_remove
                .iter()
                .map(|m| self.remove_membership(m.kind, &m.literal, policy_id)),
        )
        .await?;

        Ok(())
    }

    /// Every literal that currently has an index entry of `kind`.
    pub async fn literals(&self, kind: IndexKind) -> Result<Vec<String>> {
        let prefix = self.keys.index_prefix(kind);
        let keys = self.backend.list_keys_by_prefix(&prefix).await?;
        Ok(keys
            .iter()
            .filter_map(|k| k.strip_prefix(prefix.as_str()))
            .map(str::to_string)
            .collect())
    }
}
