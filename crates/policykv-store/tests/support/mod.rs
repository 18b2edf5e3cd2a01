//! Shared fixtures: store builders and a fault-injecting backend.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashSet;

use policykv_core::error::{PolicyStoreError, Result};
use policykv_core::{Effect, Policy};
use policykv_store::{CandidateStrategy, KvBackend, KvPolicyStore, MemoryBackend};

/// Backend operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    SetIfAbsent,
    Get,
    Set,
    Delete,
    HashFieldSet,
    HashFieldGet,
    HashFieldDelete,
    HashGetAll,
    ListKeys,
    MultiGet,
}

/// Wraps `MemoryBackend`; any op in `failing` returns `Unavailable`
/// without touching the inner store.
#[derive(Default)]
pub struct FlakyBackend {
    pub inner: MemoryBackend,
    failing: DashSet<Op>,
}

impl FlakyBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: Op) {
        self.failing.insert(op);
    }

    pub fn heal(&self, op: Op) {
        self.failing.remove(&op);
    }

    fn check(&self, op: Op) -> Result<()> {
        if self.failing.contains(&op) {
            return Err(PolicyStoreError::Unavailable(format!("injected failure: {op:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl KvBackend for FlakyBackend {
    async fn set_if_absent(&self, key: &str, value: Bytes) -> Result<bool> {
        self.check(Op::SetIfAbsent)?;
        self.inner.set_if_absent(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        self.check(Op::Get)?;
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.check(Op::Set)?;
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        self.check(Op::Delete)?;
        self.inner.delete(key).await
    }

    async fn hash_field_set(&self, key: &str, field: &str, value: Bytes) -> Result<()> {
        self.check(Op::HashFieldSet)?;
        self.inner.hash_field_set(key, field, value).await
    }

    async fn hash_field_get(&self, key: &str, field: &str) -> Result<Option<Bytes>> {
        self.check(Op::HashFieldGet)?;
        self.inner.hash_field_get(key, field).await
    }

    async fn hash_field_delete(&self, key: &str, field: &str) -> Result<bool> {
        self.check(Op::HashFieldDelete)?;
        self.inner.hash_field_delete(key, field).await
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Bytes>> {
        self.check(Op::HashGetAll)?;
        self.inner.hash_get_all(key).await
    }

    async fn list_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        self.check(Op::ListKeys)?;
        self.inner.list_keys_by_prefix(prefix).await
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<Bytes>>> {
        self.check(Op::MultiGet)?;
        self.inner.multi_get(keys).await
    }
}

pub fn memory_store(strategy: CandidateStrategy) -> (Arc<MemoryBackend>, KvPolicyStore) {
    let backend = Arc::new(MemoryBackend::new());
    let store = KvPolicyStore::new(backend.clone(), "test", strategy).unwrap();
    (backend, store)
}

pub fn flaky_store(strategy: CandidateStrategy) -> (Arc<FlakyBackend>, KvPolicyStore) {
    let backend = Arc::new(FlakyBackend::new());
    let store = KvPolicyStore::new(backend.clone(), "test", strategy).unwrap();
    (backend, store)
}

pub fn policy(id: &str, subjects: &[&str], resources: &[&str]) -> Policy {
    Policy::new(id, Effect::Allow)
        .with_subjects(subjects.iter().copied())
        .with_resources(resources.iter().copied())
        .with_actions(["read"])
}

pub fn ids(policies: &[Policy]) -> Vec<String> {
    let mut out: Vec<String> = policies.iter().map(|p| p.id.clone()).collect();
    out.sort();
    out
}
