//! Pathgate - ownership-resolution authorization over document graphs.
//!
//! A family of request-gating policies that decide, per request, whether an
//! authenticated principal may act on a target resource. Policies walk a
//! variable-depth graph of related entities ("is this user the manager of
//! the formateur who owns this formation?"), normalize ownership fields that
//! differ in name and shape across entity types, and combine role checks,
//! self-ownership, chained ownership, and entity membership into one
//! allow/deny decision.
//!
//! Layering, leaves first:
//! - [`RelationPath`] + [`resolve`]: pure path walking over a populated graph
//! - [`claims_for`]: normalize terminal values into comparable owner ids
//! - [`decide`]: the pure decision core (admin bypass, then the variant rule)
//! - [`Gate`]: the integration point; validates input, loads and populates
//!   via [`EntityLoader`], returns the Decision untouched
//!
//! Storage is an external collaborator: the engine only consumes the
//! [`EntityLoader`] and [`MembershipStore`] capabilities. [`MemoryStore`]
//! implements both for tests and the demo server.

pub mod claim;
pub mod error;
pub mod evaluate;
pub mod gate;
pub mod loader;
pub mod path;
pub mod policy;
pub mod populate;
pub mod principal;
pub mod registry;
pub mod resource_id;

#[cfg(feature = "server")]
pub mod server;

pub use claim::{claims_for, OwnershipClaim};
pub use error::{GateError, Result};
pub use evaluate::{decide, LoadedContext};
pub use gate::Gate;
pub use loader::{EntityLoader, MembershipStore, MemoryStore};
pub use path::{resolve, RelationPath, Resolution};
pub use policy::{AccessType, Decision, EntityMembership, PolicySpec, Reason};
pub use principal::{Principal, Role};
pub use registry::{ModelRegistry, ModelSchema};
pub use resource_id::ResourceId;
