use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use policykv_core::error::{PolicyStoreError, Result};

use super::KvBackend;

/// A key holds either a plain value or a hash, never both.
#[derive(Debug, Clone)]
enum Slot {
    Value(Bytes),
    Hash(HashMap<String, Bytes>),
}

/// In-process backend for tests and local runs.
///
/// Per-key atomicity comes from `DashMap` shard locks; no operation holds more
/// than one key. Keys are enumerated in sorted order so paging is stable.
#[derive(Default)]
pub struct MemoryBackend {
    slots: DashMap<String, Slot>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Number of live keys (values and hashes).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn wrong_type(key: &str) -> PolicyStoreError {
    PolicyStoreError::Unavailable(format!("wrong kind of value held at {key}"))
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn set_if_absent(&self, key: &str, value: Bytes) -> Result<bool> {
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(v) => {
                v.insert(Slot::Value(value));
                Ok(true)
            }
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let Some(slot) = self.slots.get(key) else {
            return Ok(None);
        };
        match slot.value() {
            Slot::Value(v) => Ok(Some(v.clone())),
            Slot::Hash(_) => Err(wrong_type(key)),
        }
    }

    async fn set(&self, key: &str, value: Bytes) -> Result<()> {
        self.slots.insert(key.to_string(), Slot::Value(value));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.slots.remove(key).is_some())
    }

    async fn hash_field_set(&self, key: &str, field: &str, value: Bytes) -> Result<()> {
        let mut slot = self
            .slots
            .entry(key.to_string())
            .or_insert_with(|| Slot::Hash(HashMap::new()));
        match slot.value_mut() {
            Slot::Hash(fields) => {
                fields.insert(field.to_string(), value);
                Ok(())
            }
            Slot::Value(_) => Err(wrong_type(key)),
        }
    }

    async fn hash_field_get(&self, key: &str, field: &str) -> Result<Option<Bytes>> {
        let Some(slot) = self.slots.get(key) else {
            return Ok(None);
        };
        match slot.value() {
            Slot::Hash(fields) => Ok(fields.get(field).cloned()),
            Slot::Value(_) => Err(wrong_type(key)),
        }
    }

    async fn hash_field_delete(&self, key: &str, field: &str) -> Result<bool> {
        let (removed, now_empty) = {
            let Some(mut slot) = self.slots.get_mut(key) else {
                return Ok(false);
            };
            match slot.value_mut() {
                Slot::Hash(fields) => (fields.remove(field).is_some(), fields.is_empty()),
                Slot::Value(_) => return Err(wrong_type(key)),
            }
        };

        if now_empty {
            // Re-check under the shard lock: a concurrent set may have refilled it.
            self.slots
                .remove_if(key, |_, slot| matches!(slot, Slot::Hash(f) if f.is_empty()));
        }
        Ok(removed)
    }

    async fn hash_get_all(&self, key: &str) -> Result<HashMap<String, Bytes>> {
        let Some(slot) = self.slots.get(key) else {
            return Ok(HashMap::new());
        };
        match slot.value() {
            Slot::Hash(fields) => Ok(fields.clone()),
            Slot::Value(_) => Err(wrong_type(key)),
        }
    }

    async fn list_keys_by_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .slots
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<Bytes>>> {
        // Hash keys read as absent, like MGET on a non-string key.
        Ok(keys
            .iter()
            .map(|k| {
                self.slots.get(k).and_then(|slot| match slot.value() {
                    Slot::Value(v) => Some(v.clone()),
                    Slot::Hash(_) => None,
                })
            })
            .collect())
    }
}
