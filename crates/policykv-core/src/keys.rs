//! Keyspace naming.
//!
//! Every key is `<prefix>_<segment>_<suffix>`:
//! - `<prefix>_policy_<id>`: primary record
//! - `<prefix>_subject_<literal>`: hash of policy ids naming that subject
//! - `<prefix>_resource_<literal>`: hash of policy ids naming that resource
//!
//! Distinct prefixes give independent logical stores over one backend. A
//! prefix may not contain the `_` separator, so no store's keys can fall inside
//! another store's ranges.

use crate::error::{PolicyStoreError, Result};

const SEPARATOR: &str = "_";

const SEGMENT_POLICY: &str = "policy";
const SEGMENT_SUBJECT: &str = "subject";
const SEGMENT_RESOURCE: &str = "resource";

/// Which secondary index a literal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexKind {
    Subject,
    Resource,
}

impl IndexKind {
    pub const ALL: [IndexKind; 2] = [IndexKind::Subject, IndexKind::Resource];

    pub fn as_str(self) -> &'static str {
        match self {
            IndexKind::Subject => SEGMENT_SUBJECT,
            IndexKind::Resource => SEGMENT_RESOURCE,
        }
    }
}

/// Key builder for one namespaced store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyspace {
    prefix: String,
}

impl Keyspace {
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        validate_prefix(&prefix)?;
        Ok(Self { prefix })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn policy_key(&self, id: &str) -> String {
        join(&[&self.prefix, SEGMENT_POLICY, id])
    }

    /// Prefix shared by every primary record key.
    pub fn policy_prefix(&self) -> String {
        join(&[&self.prefix, SEGMENT_POLICY, ""])
    }

    pub fn index_key(&self, kind: IndexKind, literal: &str) -> String {
        join(&[&self.prefix, kind.as_str(), literal])
    }

    /// Prefix shared by every index key of `kind`.
    pub fn index_prefix(&self, kind: IndexKind) -> String {
        join(&[&self.prefix, kind.as_str(), ""])
    }
}

/// Reject prefixes that would let one namespace reach into another.
///
/// Besides the separator, whitespace and glob metacharacters are refused
/// because prefix enumeration on Redis-like backends is a glob match.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        return Err(PolicyStoreError::BadRequest("key prefix must not be empty".into()));
    }
    if let Some(c) = prefix.chars().find(|&c| forbidden_in_prefix(c)) {
        return Err(PolicyStoreError::BadRequest(format!(
            "key prefix {prefix:?} contains forbidden character {c:?}"
        )));
    }
    Ok(())
}

fn forbidden_in_prefix(c: char) -> bool {
    SEPARATOR.contains(c) || c.is_whitespace() || matches!(c, '*' | '?' | '[' | ']')
}

fn join(parts: &[&str]) -> String {
    parts.join(SEPARATOR)
}
