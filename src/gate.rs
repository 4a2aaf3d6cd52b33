//! The gate: single entry point the surrounding request layer calls.
//!
//! A thin adapter with precise ordering: refuse without a principal (no
//! wasted I/O), validate the identifier, short-circuit admins, then load and
//! populate the resource graph and hand it to the pure evaluator. The
//! Decision comes back untouched; no business logic lives here.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{GateError, Result};
use crate::evaluate::{decide, LoadedContext};
use crate::loader::{EntityLoader, MembershipStore};
use crate::policy::{Decision, PolicySpec, Reason};
use crate::populate::populate;
use crate::principal::Principal;
use crate::registry::ModelRegistry;
use crate::resource_id::ResourceId;

/// Request-gating facade over loader, registry, and evaluator.
pub struct Gate<L, M> {
    registry: Arc<ModelRegistry>,
    loader: L,
    memberships: M,
}

impl<L: EntityLoader, M: MembershipStore> Gate<L, M> {
    pub fn new(registry: Arc<ModelRegistry>, loader: L, memberships: M) -> Self {
        Self {
            registry,
            loader,
            memberships,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Decide whether `principal` may act on `resource_id` under `spec`.
    ///
    /// Same principal, same resource state, same spec: same Decision.
    pub fn authorize(
        &self,
        principal: Option<&Principal>,
        resource_id: &str,
        spec: &PolicySpec,
    ) -> Result<Decision> {
        let Some(principal) = principal else {
            return Err(GateError::Unauthenticated);
        };
        let id = ResourceId::parse(resource_id)?;

        // Same verdict the evaluator would reach after loading; skipping the
        // load keeps admin requests free of I/O.
        if principal.is_admin() {
            return Ok(Decision::allow_because(Reason::AdminBypass));
        }

        let ctx = self.load_context(principal, &id, spec).map_err(|e| {
            if e.is_configuration() {
                error!(subject = %principal.subject_id, error = %e, "policy misconfiguration");
            }
            e
        })?;

        match decide(principal, spec, &ctx) {
            Ok(decision) => {
                if !decision.allowed {
                    debug!(
                        subject = %principal.subject_id,
                        role = %principal.role,
                        resource = %id,
                        reason = ?decision.reason,
                        "access denied"
                    );
                }
                Ok(decision)
            }
            Err(e) => {
                if e.is_configuration() {
                    error!(resource = %id, error = %e, "policy misconfiguration");
                }
                Err(e)
            }
        }
    }

    /// Load and populate everything the policy variant will look at.
    fn load_context(
        &self,
        principal: &Principal,
        id: &ResourceId,
        spec: &PolicySpec,
    ) -> Result<LoadedContext> {
        let mut ctx = LoadedContext::default();

        if let Some(model) = spec.target_model() {
            let schema = self.registry.require(model)?;
            let entity = self
                .loader
                .load_by_id(schema.name(), id.as_str())?
                .ok_or_else(|| GateError::NotFound {
                    model: model.to_string(),
                    id: id.to_string(),
                })?;
            let paths = spec.populate_paths();
            ctx.target = Some(populate(
                &self.loader,
                &self.registry,
                model,
                entity,
                &paths,
            )?);
        }

        if spec.needs_memberships() {
            ctx.memberships = self.memberships.find_by_subject(&principal.subject_id)?;
        }

        Ok(ctx)
    }
}
