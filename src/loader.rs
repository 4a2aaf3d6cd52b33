//! External collaborator capabilities: entity loading and membership lookup.
//!
//! The engine depends only on these traits, not on any storage technology.
//! `MemoryStore` is the in-crate implementation used by tests and the demo
//! server; production callers adapt their own store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::{GateError, Result};
use crate::policy::EntityMembership;

/// Load capability: given a model name and an id, fetch the raw entity.
/// The only point where an evaluation may block on I/O.
pub trait EntityLoader: Send + Sync {
    /// `Ok(None)` when no entity with that id exists.
    fn load_by_id(&self, model: &str, id: &str) -> Result<Option<Value>>;
}

/// Membership capability: which typed entities a principal belongs to.
pub trait MembershipStore: Send + Sync {
    fn find_by_subject(&self, subject_id: &str) -> Result<Vec<EntityMembership>>;
}

impl<T: EntityLoader + ?Sized> EntityLoader for Arc<T> {
    fn load_by_id(&self, model: &str, id: &str) -> Result<Option<Value>> {
        (**self).load_by_id(model, id)
    }
}

impl<T: MembershipStore + ?Sized> MembershipStore for Arc<T> {
    fn find_by_subject(&self, subject_id: &str) -> Result<Vec<EntityMembership>> {
        (**self).find_by_subject(subject_id)
    }
}

impl<'a, T: EntityLoader + ?Sized> EntityLoader for &'a T {
    fn load_by_id(&self, model: &str, id: &str) -> Result<Option<Value>> {
        (**self).load_by_id(model, id)
    }
}

impl<'a, T: MembershipStore + ?Sized> MembershipStore for &'a T {
    fn find_by_subject(&self, subject_id: &str) -> Result<Vec<EntityMembership>> {
        (**self).find_by_subject(subject_id)
    }
}

/// In-memory document store keyed by (model, id).
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<(String, String), Value>>,
    memberships: RwLock<Vec<EntityMembership>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document under its own `_id` (or `id`) field.
    /// Returns the id the document was stored under.
    pub fn insert(&self, model: &str, document: Value) -> Result<String> {
        let id = document
            .get("_id")
            .or_else(|| document.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                GateError::InvalidInput(format!("document for '{}' has no _id field", model))
            })?;
        self.documents
            .write()
            .insert((model.to_string(), id.clone()), document);
        Ok(id)
    }

    pub fn add_membership(&self, membership: EntityMembership) {
        self.memberships.write().push(membership);
    }

    pub fn clear(&self) {
        self.documents.write().clear();
        self.memberships.write().clear();
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl EntityLoader for MemoryStore {
    fn load_by_id(&self, model: &str, id: &str) -> Result<Option<Value>> {
        Ok(self
            .documents
            .read()
            .get(&(model.to_string(), id.to_string()))
            .cloned())
    }
}

impl MembershipStore for MemoryStore {
    fn find_by_subject(&self, subject_id: &str) -> Result<Vec<EntityMembership>> {
        Ok(self
            .memberships
            .read()
            .iter()
            .filter(|m| m.subject_id == subject_id)
            .cloned()
            .collect())
    }
}
