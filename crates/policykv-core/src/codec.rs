//! Record codec (JSON).
//!
//! Records are self-describing JSON documents. Decoding never coerces: an
//! undecodable payload is `Corrupt`, distinct from an absent key.

use bytes::Bytes;

use crate::error::{PolicyStoreError, Result};
use crate::model::Policy;

/// Encode a policy into its stored payload.
pub fn encode_policy(policy: &Policy) -> Result<Bytes> {
    serde_json::to_vec(policy)
        .map(Bytes::from)
        .map_err(|e| PolicyStoreError::Internal(format!("encode policy {} failed: {e}", policy.id)))
}

/// Decode the payload stored under `key`.
pub fn decode_policy(key: &str, payload: &[u8]) -> Result<Policy> {
    serde_json::from_slice(payload).map_err(|e| {
        tracing::debug!(%key, error = %e, "policy record failed to decode");
        PolicyStoreError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}
