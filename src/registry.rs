//! Explicit model registry: model name to relation schema.
//!
//! Populated once at process start and read-only thereafter, so concurrent
//! evaluations share it without locking. Looking up an unregistered name is
//! a configuration fault, never a runtime Deny.

use std::collections::HashMap;

use crate::error::{GateError, Result};

/// Relation schema for one model: which fields reference which models.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    name: String,
    relations: HashMap<String, String>,
}

impl ModelSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relations: HashMap::new(),
        }
    }

    /// Declare that `field` references an entity of `target_model`.
    pub fn relation(mut self, field: impl Into<String>, target_model: impl Into<String>) -> Self {
        self.relations.insert(field.into(), target_model.into());
        self
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target model of a relation field, if the field is a relation.
    pub fn target_of(&self, field: &str) -> Option<&str> {
        self.relations.get(field).map(String::as_str)
    }
}

/// Registry of every model the loader can serve.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: HashMap<String, ModelSchema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, schema: ModelSchema) -> &mut Self {
        self.models.insert(schema.name.clone(), schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ModelSchema> {
        self.models.get(name)
    }

    /// Look up a model a policy depends on. An unregistered name means the
    /// policy was misconfigured.
    pub fn require(&self, name: &str) -> Result<&ModelSchema> {
        self.models
            .get(name)
            .ok_or_else(|| GateError::UnknownModel(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Registered model names, sorted for stable output.
    pub fn model_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.keys().cloned().collect();
        names.sort();
        names
    }
}
