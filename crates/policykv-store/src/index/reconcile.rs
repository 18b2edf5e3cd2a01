//! Membership diffing.
//!
//! All index mutations are computed here from (old record, new record) and
//! nowhere else. Create is `(None, new)`, delete is `(old, None)`.

use std::collections::BTreeSet;

use policykv_core::{IndexKind, Policy};

/// One (index, literal) pair a policy is filed under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Membership {
    pub kind: IndexKind,
    pub literal: String,
}

impl Membership {
    pub fn new(kind: IndexKind, literal: impl Into<String>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }
}

/// Index writes needed to move from one record version to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDelta {
    pub to_add: Vec<Membership>,
    pub to_remove: Vec<Membership>,
}

impl IndexDelta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Every membership a policy declares. Duplicate literals collapse.
pub fn memberships(policy: &Policy) -> BTreeSet<Membership> {
    let subjects = policy
        .subjects
        .iter()
        .map(|s| Membership::new(IndexKind::Subject, s.as_str()));
    let resources = policy
        .resources
        .iter()
        .map(|r| Membership::new(IndexKind::Resource, r.as_str()));
    subjects.chain(resources).collect()
}

/// `(old, new) -> (to_add, to_remove)`. Unchanged memberships appear in neither.
pub fn reconcile(old: &BTreeSet<Membership>, new: &BTreeSet<Membership>) -> IndexDelta {
    IndexDelta {
        to_add: new.difference(old).cloned().collect(),
        to_remove: old.difference(new).cloned().collect(),
    }
}

/// Delta between two optional record versions.
pub fn delta_for(old: Option<&Policy>, new: Option<&Policy>) -> IndexDelta {
    let old = old.map(memberships).unwrap_or_default();
    let new = new.map(memberships).unwrap_or_default();
    reconcile(&old, &new)
}
