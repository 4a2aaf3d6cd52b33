//! Policy specifications and the Decision model.

use serde::{Deserialize, Serialize};

use crate::path::RelationPath;
use crate::principal::Role;

/// Self-reference field checked by the single-parent shortcut: an entity
/// whose `utilisateur` equals the caller is the caller's own profile.
pub const SELF_FIELD: &str = "utilisateur";

/// Model and relation chains used by the formation access policy.
pub const FORMATION_MODEL: &str = "Formation";
pub const FORMATION_OWNER_CHAIN: &str = "formateur.utilisateur";
pub const FORMATION_MANAGER_CHAIN: &str = "formateur.manager.utilisateur";

/// How the caller intends to act on the target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    Read,
    Update,
    Delete,
}

/// Association record: a principal belongs to a typed entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMembership {
    pub subject_id: String,
    pub entity_id: String,
    pub entity_type: String,
}

impl EntityMembership {
    pub fn new(
        subject_id: impl Into<String>,
        entity_id: impl Into<String>,
        entity_type: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            entity_id: entity_id.into(),
            entity_type: entity_type.into(),
        }
    }
}

/// Tagged union describing which policy variant to run and its parameters.
/// The admin bypass is implicit: it is checked before any variant runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PolicySpec {
    /// Allow iff the target's owner field names the caller.
    SelfOwnership { model: String, owner_field: String },
    /// Allow the caller's own profile (self shortcut, independent of role),
    /// or the parent named by `parent_field`.
    SingleParentOwnership { model: String, parent_field: String },
    /// Allow iff at least one path's claim names the caller (logical OR).
    MultiPathOwnership {
        model: String,
        paths: Vec<RelationPath>,
    },
    /// Role filter plus entity-membership check.
    RoleAndEntity {
        roles: Vec<Role>,
        entity_types: Vec<String>,
    },
    /// Formation-specific chained ownership: formateurs own through
    /// `formateur.utilisateur` (and may never delete), managers through
    /// `formateur.manager.utilisateur`.
    ChainedFormationAccess { access: AccessType },
}

impl PolicySpec {
    /// Model the target resource is loaded from, when the variant loads one.
    pub(crate) fn target_model(&self) -> Option<&str> {
        match self {
            PolicySpec::SelfOwnership { model, .. }
            | PolicySpec::SingleParentOwnership { model, .. }
            | PolicySpec::MultiPathOwnership { model, .. } => Some(model),
            PolicySpec::RoleAndEntity { .. } => None,
            PolicySpec::ChainedFormationAccess { .. } => Some(FORMATION_MODEL),
        }
    }

    /// Relation paths to populate before evaluation.
    pub(crate) fn populate_paths(&self) -> Vec<RelationPath> {
        match self {
            PolicySpec::SelfOwnership { owner_field, .. } => {
                RelationPath::parse(owner_field).into_iter().collect()
            }
            PolicySpec::SingleParentOwnership { parent_field, .. } => {
                let mut paths: Vec<RelationPath> =
                    RelationPath::parse(parent_field).into_iter().collect();
                paths.push(RelationPath::from_segments([SELF_FIELD]));
                paths
            }
            PolicySpec::MultiPathOwnership { paths, .. } => paths.clone(),
            PolicySpec::RoleAndEntity { .. } => Vec::new(),
            PolicySpec::ChainedFormationAccess { .. } => vec![
                RelationPath::from_segments(["formateur", "utilisateur"]),
                RelationPath::from_segments(["formateur", "manager", "utilisateur"]),
            ],
        }
    }

    /// Whether the variant consults the caller's entity memberships.
    pub(crate) fn needs_memberships(&self) -> bool {
        matches!(self, PolicySpec::RoleAndEntity { .. })
    }
}

/// Stable reason codes. A denied caller sees the code and nothing else, so
/// relationship structure never leaks; allow annotations record which rule
/// admitted the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    AdminBypass,
    SelfUpdate,
    NotSelf,
    NotOwner,
    NoPathMatched,
    RoleNotAllowed,
    NoEntityAssociation,
    EntityTypeMismatch,
    FormateurCannotDelete,
    RoleNotPermitted,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::AdminBypass => "admin-bypass",
            Reason::SelfUpdate => "self-update",
            Reason::NotSelf => "not-self",
            Reason::NotOwner => "not-owner",
            Reason::NoPathMatched => "no-path-matched",
            Reason::RoleNotAllowed => "role-not-allowed",
            Reason::NoEntityAssociation => "no-entity-association",
            Reason::EntityTypeMismatch => "entity-type-mismatch",
            Reason::FormateurCannotDelete => "formateur-cannot-delete",
            Reason::RoleNotPermitted => "role-not-permitted",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one authorization evaluation. Immutable, produced once
/// per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub allowed: bool,
    pub reason: Option<Reason>,
}

impl Decision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn allow_because(reason: Reason) -> Self {
        Self {
            allowed: true,
            reason: Some(reason),
        }
    }

    pub fn deny(reason: Reason) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    #[inline]
    pub fn is_allowed(&self) -> bool {
        self.allowed
    }
}
