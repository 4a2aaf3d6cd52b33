//! The decision core: pure evaluation over already-loaded data.
//!
//! `decide` never performs I/O. The gate loads and populates everything a
//! policy needs into a `LoadedContext` first; evaluation is then a pure
//! function of (principal, spec, context), so two calls with the same inputs
//! yield the same Decision.

use serde_json::Value;

use crate::claim::claims_for;
use crate::error::{GateError, Result};
use crate::path::{resolve, RelationPath, Resolution};
use crate::policy::{
    AccessType, Decision, EntityMembership, PolicySpec, Reason, FORMATION_MODEL, SELF_FIELD,
};
use crate::principal::{Principal, Role};

/// Everything one evaluation may look at, loaded up front by the gate.
#[derive(Debug, Default)]
pub struct LoadedContext {
    /// Populated target entity, for variants that load one.
    pub target: Option<Value>,
    /// The principal's entity memberships (RoleAndEntity only).
    pub memberships: Vec<EntityMembership>,
}

impl LoadedContext {
    pub fn with_target(target: Value) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_memberships(memberships: Vec<EntityMembership>) -> Self {
        Self {
            memberships,
            ..Self::default()
        }
    }

    fn target(&self) -> Result<&Value> {
        self.target.as_ref().ok_or_else(|| {
            GateError::InvalidInput("policy requires a loaded target entity".into())
        })
    }
}

/// Whether any claim at the end of `path` names the subject.
fn path_matches(target: &Value, path: &RelationPath, subject_id: &str) -> bool {
    claims_for(path, &resolve(target, path))
        .iter()
        .any(|claim| claim.matches(subject_id))
}

/// Apply the policy's combination rule. First match wins; the admin bypass
/// runs before anything else so every variant inherits it uniformly.
pub fn decide(principal: &Principal, spec: &PolicySpec, ctx: &LoadedContext) -> Result<Decision> {
    if principal.is_admin() {
        return Ok(Decision::allow_because(Reason::AdminBypass));
    }

    match spec {
        PolicySpec::SelfOwnership { owner_field, .. } => {
            let target = ctx.target()?;
            let path = RelationPath::parse(owner_field)?;
            if path_matches(target, &path, &principal.subject_id) {
                Ok(Decision::allow())
            } else {
                Ok(Decision::deny(Reason::NotSelf))
            }
        }

        PolicySpec::SingleParentOwnership { parent_field, .. } => {
            let target = ctx.target()?;
            // Self shortcut: acting on one's own profile is allowed
            // regardless of role, and without the parent check.
            let self_path = RelationPath::from_segments([SELF_FIELD]);
            if path_matches(target, &self_path, &principal.subject_id) {
                return Ok(Decision::allow_because(Reason::SelfUpdate));
            }
            let parent_path = RelationPath::parse(parent_field)?;
            if path_matches(target, &parent_path, &principal.subject_id) {
                Ok(Decision::allow())
            } else {
                Ok(Decision::deny(Reason::NotOwner))
            }
        }

        PolicySpec::MultiPathOwnership { paths, .. } => {
            let target = ctx.target()?;
            // Logical OR: one matching path admits the caller. Unresolved
            // paths contribute a null candidate and never match.
            for path in paths {
                if path_matches(target, path, &principal.subject_id) {
                    return Ok(Decision::allow());
                }
            }
            Ok(Decision::deny(Reason::NoPathMatched))
        }

        PolicySpec::RoleAndEntity {
            roles,
            entity_types,
        } => {
            if !roles.contains(&principal.role) {
                return Ok(Decision::deny(Reason::RoleNotAllowed));
            }
            if ctx.memberships.is_empty() {
                return Ok(Decision::deny(Reason::NoEntityAssociation));
            }
            if ctx
                .memberships
                .iter()
                .any(|m| entity_types.contains(&m.entity_type))
            {
                Ok(Decision::allow())
            } else {
                Ok(Decision::deny(Reason::EntityTypeMismatch))
            }
        }

        PolicySpec::ChainedFormationAccess { access } => {
            let target = ctx.target()?;
            // A formation without a formateur is a data-integrity fault,
            // not an access question.
            let chain_root = RelationPath::from_segments(["formateur"]);
            if resolve(target, &chain_root) == Resolution::Unresolved {
                return Err(GateError::BrokenRelation {
                    model: FORMATION_MODEL.to_string(),
                    relation: "formateur".to_string(),
                });
            }

            match principal.role {
                Role::Formateur => {
                    let owner_chain = RelationPath::from_segments(["formateur", SELF_FIELD]);
                    let owns = path_matches(target, &owner_chain, &principal.subject_id);
                    if owns && *access == AccessType::Delete {
                        // Distinct from an ownership failure: the formation
                        // is theirs, the operation is not.
                        Ok(Decision::deny(Reason::FormateurCannotDelete))
                    } else if owns {
                        Ok(Decision::allow())
                    } else {
                        Ok(Decision::deny(Reason::NotOwner))
                    }
                }
                Role::Manager => {
                    let manager_chain =
                        RelationPath::from_segments(["formateur", "manager", SELF_FIELD]);
                    if path_matches(target, &manager_chain, &principal.subject_id) {
                        Ok(Decision::allow())
                    } else {
                        Ok(Decision::deny(Reason::NotOwner))
                    }
                }
                _ => Ok(Decision::deny(Reason::RoleNotPermitted)),
            }
        }
    }
}
