//! Normalizing resolved values into comparable owner identifiers.
//!
//! Owner fields differ in shape across entity types: a raw id string, an
//! embedded sub-document, or an array of either. The extractor always reduces
//! a resolved value to a single comparable id (or `None`), so the evaluator
//! compares ids uniformly no matter how the underlying field was stored.

use serde_json::Value;

use crate::path::{RelationPath, Resolution};

/// A candidate owner identifier found at the end of a relation path.
/// `candidate_id = None` means the path did not resolve: excluded from
/// matching, never treated as a match or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipClaim {
    pub path: RelationPath,
    pub candidate_id: Option<String>,
}

impl OwnershipClaim {
    pub fn new(path: RelationPath, candidate_id: Option<String>) -> Self {
        Self { path, candidate_id }
    }

    /// Whether this claim names the given subject.
    #[inline]
    pub fn matches(&self, subject_id: &str) -> bool {
        self.candidate_id.as_deref() == Some(subject_id)
    }
}

/// Reduce one terminal value to a comparable id.
///
/// A sub-document contributes its own `_id` (or `id`) field, never a deeper
/// one: callers that need a deeper identifier must spell that field out in
/// the relation path.
fn candidate_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("_id")
            .or_else(|| map.get("id"))
            .and_then(|id| match id {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            }),
        _ => None,
    }
}

fn claims_from_value(path: &RelationPath, value: &Value) -> Vec<OwnershipClaim> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| OwnershipClaim::new(path.clone(), candidate_id(item)))
            .collect(),
        other => vec![OwnershipClaim::new(path.clone(), candidate_id(other))],
    }
}

/// Convert a resolution into ownership claims, one per terminal value.
pub fn claims_for(path: &RelationPath, resolution: &Resolution) -> Vec<OwnershipClaim> {
    match resolution {
        Resolution::Unresolved => vec![OwnershipClaim::new(path.clone(), None)],
        Resolution::One(value) => claims_from_value(path, value),
        Resolution::Many(values) => values
            .iter()
            .flat_map(|value| claims_from_value(path, value))
            .collect(),
    }
}
