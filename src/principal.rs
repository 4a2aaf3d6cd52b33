//! The authenticated caller: identity plus role.
//!
//! Produced by the upstream session-verification step. This crate never
//! parses credentials; it only consumes the result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed role set for the training-program domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Formateur,
    Coordinateur,
    Beneficiaire,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Formateur => "formateur",
            Role::Coordinateur => "coordinateur",
            Role::Beneficiaire => "beneficiaire",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "formateur" => Ok(Role::Formateur),
            "coordinateur" => Ok(Role::Coordinateur),
            "beneficiaire" => Ok(Role::Beneficiaire),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// The authenticated identity for one request. Immutable; created by the
/// external auth step and discarded at request end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub subject_id: String,
    pub role: Role,
}

impl Principal {
    pub fn new(subject_id: impl Into<String>, role: Role) -> Self {
        Self {
            subject_id: subject_id.into(),
            role,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
