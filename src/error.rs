//! Error taxonomy for the gate.
//!
//! A denial is not an error: a Deny is a normal `Decision`. Errors are the
//! outcomes the caller maps to a different outward signal (not-found,
//! bad-request, server-fault) plus the configuration faults that must never
//! be masked as "access denied".

use thiserror::Error;

/// The error type for gate operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Target resource id does not resolve to an existing entity.
    #[error("{model} '{id}' not found")]
    NotFound { model: String, id: String },

    /// The resource id is not a well-formed identifier.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A policy references a model that was never registered. Configuration
    /// fault: surfaced to operators, never downgraded to a Deny.
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// A required relation is structurally absent. Data-integrity problem,
    /// not an access question.
    #[error("broken relation '{relation}' on {model}")]
    BrokenRelation { model: String, relation: String },

    /// No principal was supplied. Rejected before any resource load.
    #[error("no authenticated principal")]
    Unauthenticated,

    /// The backing store failed while loading an entity or membership set.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl GateError {
    /// Configuration faults indicate a misconfigured policy or broken data,
    /// not a security decision. They are logged and reported distinctly.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GateError::UnknownModel(_) | GateError::BrokenRelation { .. }
        )
    }
}

/// Result type alias for gate operations.
pub type Result<T> = std::result::Result<T, GateError>;
