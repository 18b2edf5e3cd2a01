//! policykv
//!
//! Loads a store config, seeds an in-memory store from a JSON array of
//! policies, and prints the candidate set for one (subject, resource) pair.
//!
//! Usage: `policykv <config.yaml> <policies.json> <subject> <resource>`

use std::fs;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use policykv_core::error::{PolicyStoreError, Result};
use policykv_core::Policy;
use policykv_store::{config, KvBackend, KvPolicyStore, MemoryBackend, PolicyStore};

const USAGE: &str = "usage: policykv <config.yaml> <policies.json> <subject> <resource>";

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "policykv failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let [config_path, policies_path, subject, resource] = args.as_slice() else {
        return Err(PolicyStoreError::BadRequest(USAGE.into()));
    };

    let cfg = config::load_from_file(config_path)?;

    let raw = fs::read_to_string(policies_path)
        .map_err(|e| PolicyStoreError::Internal(format!("read policies failed: {e}")))?;
    let policies: Vec<Policy> = serde_json::from_str(&raw)
        .map_err(|e| PolicyStoreError::BadRequest(format!("invalid policies json: {e}")))?;

    let backend: Arc<dyn KvBackend> = Arc::new(MemoryBackend::new());
    let store = KvPolicyStore::from_config(backend, &cfg.store)?;

    for policy in &policies {
        store.create(policy).await?;
    }
    tracing::info!(
        prefix = %cfg.store.key_prefix,
        strategy = ?cfg.store.candidates,
        policies = policies.len(),
        "store seeded"
    );

    let candidates = store.find_candidates(subject, resource).await?;
    tracing::info!(%subject, %resource, count = candidates.len(), "candidates resolved");

    let out = serde_json::to_string_pretty(&candidates)
        .map_err(|e| PolicyStoreError::Internal(format!("encode output failed: {e}")))?;
    println!("{out}");
    Ok(())
}
