use serde::Deserialize;

use policykv_core::error::{PolicyStoreError, Result};
use policykv_core::keys;

pub const DEFAULT_KEY_PREFIX: &str = "acl";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    pub version: u32,

    #[serde(default)]
    pub store: StoreSection,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(PolicyStoreError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.store.validate()?;

        Ok(())
    }
}

/// How candidate sets are produced.
///
/// Switching a populated store from `full_scan` to `indexed` requires an
/// index rebuild first; full-scan stores write no index entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// Per-literal hash indices, maintained on every mutation.
    #[default]
    Indexed,
    /// No indices; every query returns every record.
    FullScan,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    #[serde(default)]
    pub candidates: CandidateStrategy,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            candidates: CandidateStrategy::default(),
        }
    }
}

impl StoreSection {
    pub fn validate(&self) -> Result<()> {
        keys::validate_prefix(&self.key_prefix).map_err(|e| match e {
            PolicyStoreError::BadRequest(msg) => {
                PolicyStoreError::BadRequest(format!("store.key_prefix: {msg}"))
            }
            other => other,
        })
    }
}

fn default_key_prefix() -> String {
    DEFAULT_KEY_PREFIX.into()
}
