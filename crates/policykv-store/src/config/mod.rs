//! Store config loader.
//!
//! Parsing is strict (`deny_unknown_fields` throughout) and every loaded
//! config is validated before it reaches [`KvPolicyStore::from_config`].
//!
//! [`KvPolicyStore::from_config`]: crate::store::KvPolicyStore::from_config

pub mod schema;

use std::fs;
use std::path::Path;

use policykv_core::error::{PolicyStoreError, Result};

pub use schema::{CandidateStrategy, StoreConfig, StoreSection, DEFAULT_KEY_PREFIX};

/// Read and validate a store config file. Errors name the file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<StoreConfig> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|e| {
        PolicyStoreError::Internal(format!("read store config {}: {e}", path.display()))
    })?;
    load_from_str(&s).map_err(|e| match e {
        PolicyStoreError::BadRequest(msg) => {
            PolicyStoreError::BadRequest(format!("store config {}: {msg}", path.display()))
        }
        other => other,
    })
}

pub fn load_from_str(s: &str) -> Result<StoreConfig> {
    let cfg: StoreConfig = serde_yaml::from_str(s)
        .map_err(|e| PolicyStoreError::BadRequest(format!("invalid store config yaml: {e}")))?;
    cfg.validate()?;
    tracing::debug!(
        prefix = %cfg.store.key_prefix,
        strategy = ?cfg.store.candidates,
        "store config loaded"
    );
    Ok(cfg)
}
