//! Relation paths and pure resolution over a populated document graph.
//!
//! Resolution never performs I/O: every sub-entity a path needs must have
//! been embedded by the population phase first. This keeps the decision core
//! testable without a live store.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::GateError;

/// Ordered sequence of field names describing how to walk from a resource to
/// a related value. Parsed from a dot-separated string; stateless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationPath(Vec<String>);

impl RelationPath {
    /// Parse a dot-separated path such as `"formateur.manager.utilisateur"`.
    pub fn parse(s: &str) -> Result<Self, GateError> {
        if s.is_empty() {
            return Err(GateError::InvalidInput("empty relation path".into()));
        }
        let segments: Vec<String> = s.split('.').map(str::to_string).collect();
        if segments.iter().any(|seg| seg.is_empty()) {
            return Err(GateError::InvalidInput(format!(
                "relation path '{}' has an empty segment",
                s
            )));
        }
        Ok(Self(segments))
    }

    /// Build from segments known to be non-empty (fixed policy chains).
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            segments
                .into_iter()
                .map(Into::into)
                .filter(|seg: &String| !seg.is_empty())
                .collect(),
        )
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RelationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl Serialize for RelationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RelationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RelationPath::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Result of walking a path: the terminal value(s), or nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    One(Value),
    Many(Vec<Value>),
    /// The path did not resolve (missing field, null reference). Not an
    /// error: the branch simply contributes no candidate.
    Unresolved,
}

/// Walk `graph` along `path`, one field at a time.
///
/// Arrays fan out: the remaining path is applied to every element and the
/// results are concatenated. A null or absent field ends its branch; when
/// every branch dies the whole resolution is `Unresolved`.
pub fn resolve(graph: &Value, path: &RelationPath) -> Resolution {
    let mut current: Vec<&Value> = vec![graph];

    for segment in path.segments() {
        let mut next: Vec<&Value> = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(field) = map.get(segment) {
                        if !field.is_null() {
                            next.push(field);
                        }
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(field) = item.get(segment) {
                            if !field.is_null() {
                                next.push(field);
                            }
                        }
                    }
                }
                // Scalars cannot be stepped into; the branch ends here.
                _ => {}
            }
        }
        if next.is_empty() {
            return Resolution::Unresolved;
        }
        current = next;
    }

    if current.len() == 1 {
        Resolution::One(current[0].clone())
    } else {
        Resolution::Many(current.into_iter().cloned().collect())
    }
}
