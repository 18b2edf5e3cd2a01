//! Backing key-value store capability.
//!
//! The store talks to its backend only through [`KvBackend`]. Every method is
//! a single-key atomic operation except `multi_get`, which is a batched read
//! with no cross-key snapshot guarantee. There are no multi-key transactions.
//!
//! Transport failures map to `PolicyStoreError::Unavailable` and are returned
//! as-is; neither the backend contract nor the store retries.

mod memory;

pub use memory::MemoryBackend;

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;

use policykv_core::Result;

#[async_trait]
pub trait KvBackend: Send + Sync {
    /// Write `value` only if `key` does not exist. Returns whether it was written.
    async fn set_if_absent(&self, key: &str, value: Bytes) -> Result<bool>;

    async fn get(&self, key: &str) -> Result<Option<Bytes>>;

    /// Unconditional write.
    async fn set(&self, key: &str, value: Bytes) -> Result<()>;

    /// Remove `key`. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool>;

    async fn hash_field_set(&self, key: &str, field: &str, value: Bytes) -> Result<()>;

    async fn hash_field_get(&self, key: &str, field: &str) -> Result<Option<Bytes>>;

    /// Remove one field. Returns whether it existed. A hash left empty disappears.
    async fn hash_field_delete(&self, key: &str, field: &str) -> Result<bool>;

    /// All fields of a hash; empty when the hash does not exist.
    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Bytes>>;

    async fn list_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>>;

    /// Batched `get`, positionally aligned with `keys`.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<Bytes>>>;
}
