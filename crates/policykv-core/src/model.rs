//! Policy record model.
//!
//! The store only interprets `id`, `subjects` and `resources`. Everything
//! else is carried through to the evaluation engine untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PolicyStoreError, Result};

/// Policy effect. Meaning is decided by the evaluator, not the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

/// A stored access-control policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Caller-supplied, globally unique identifier.
    pub id: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Subject patterns (index keys).
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Resource patterns (index keys).
    #[serde(default)]
    pub resources: Vec<String>,
    /// Action patterns.
    #[serde(default)]
    pub actions: Vec<String>,
    pub effect: Effect,
    /// Opaque condition set, keyed by condition name.
    #[serde(default)]
    pub conditions: BTreeMap<String, Value>,
    /// Opaque caller metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Policy {
    pub fn new(id: impl Into<String>, effect: Effect) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            subjects: Vec::new(),
            resources: Vec::new(),
            actions: Vec::new(),
            effect,
            conditions: BTreeMap::new(),
            meta: None,
        }
    }

    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_condition(mut self, name: impl Into<String>, condition: Value) -> Self {
        self.conditions.insert(name.into(), condition);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Reject policies the store cannot key.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_empty() {
            return Err(PolicyStoreError::BadRequest("policy id must not be empty".into()));
        }
        Ok(())
    }
}
