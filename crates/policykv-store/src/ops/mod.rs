//! Operational utilities (off the hot path).
//!
//! - `rebuild_indices`: re-derive every index entry from the primary records
//! - `purge_record`: drop a primary record without reading it

use std::collections::{BTreeMap, BTreeSet};

use futures_util::future::try_join_all;

use policykv_core::error::{PolicyStoreError, Result};
use policykv_core::IndexKind;

use crate::index::{memberships, Membership};
use crate::store::{CandidateStrategy, KvPolicyStore};

/// Outcome of [`KvPolicyStore::rebuild_indices`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    /// Primary records scanned.
    pub policies: usize,
    /// Memberships written.
    pub memberships: usize,
    /// Stale memberships removed.
    pub pruned: usize,
}

impl KvPolicyStore {
    /// Re-derive all index entries from the primary records.
    ///
    /// Every record is read and decoded before anything is written, so a
    /// `Corrupt` record aborts with the index untouched. Memberships are then
    /// written before stale ones are pruned, and a membership is only pruned
    /// after re-reading its record, so policies created while the rebuild runs
    /// keep their entries. In full-scan mode nothing is written and every
    /// index entry is pruned.
    pub async fn rebuild_indices(&self) -> Result<RebuildReport> {
        let records = self.resolver().full_scan().await?;

        let mut wanted: BTreeMap<Membership, BTreeSet<String>> = BTreeMap::new();
        if self.strategy() == CandidateStrategy::Indexed {
            for policy in &records {
                for m in memberships(policy) {
                    wanted.entry(m).or_default().insert(policy.id.clone());
                }
            }
        }

        let index = self.index();
        let writes = wanted.iter().flat_map(|(m, ids)| {
            ids.iter()
                .map(move |id| index.add_membership(m.kind, &m.literal, id))
        });
        let written = try_join_all(writes).await?.len();

        let mut pruned = 0;
        for kind in IndexKind::ALL {
            for literal in index.literals(kind).await? {
                let key = Membership::new(kind, literal.as_str());
                let live = wanted.get(&key);
                for id in index.members_of(kind, &literal).await? {
                    if live.is_some_and(|ids| ids.contains(&id)) {
                        continue;
                    }
                    if self.still_declares(&key, &id).await? {
                        continue;
                    }
                    index.remove_membership(kind, &literal, &id).await?;
                    pruned += 1;
                }
            }
        }

        let report = RebuildReport {
            policies: records.len(),
            memberships: written,
            pruned,
        };
        tracing::info!(
            prefix = %self.keyspace().prefix(),
            policies = report.policies,
            memberships = report.memberships,
            pruned = report.pruned,
            "index rebuild finished"
        );
        Ok(report)
    }

    async fn still_declares(&self, membership: &Membership, id: &str) -> Result<bool> {
        if self.strategy() != CandidateStrategy::Indexed {
            return Ok(false);
        }
        match self.read(id).await {
            Ok(policy) => Ok(memberships(&policy).contains(membership)),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Remove a primary record without decoding it. Index entries are left
    /// behind; candidate queries skip them and the next rebuild prunes them.
    pub async fn purge_record(&self, id: &str) -> Result<()> {
        let key = self.keyspace().policy_key(id);
        if !self.backend().delete(&key).await? {
            return Err(PolicyStoreError::NotFound(id.to_string()));
        }
        tracing::warn!(policy = %id, "policy record purged without index cleanup");
        Ok(())
    }
}
