//! Pathgate REST facade (demo server).
//!
//! Thin HTTP adapter over the gate: seed documents and memberships into the
//! in-memory store, then POST /authorize to obtain Decisions.
//!
//! Endpoints:
//!   POST /authorize    - Evaluate a policy for a principal and resource
//!   POST /entities     - Seed a document into the store
//!   POST /memberships  - Seed an entity membership
//!   GET  /models       - List registered model names
//!   POST /reset        - Clear the store (dev only)

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};

use crate::error::GateError;
use crate::gate::Gate;
use crate::loader::MemoryStore;
use crate::policy::{Decision, EntityMembership, PolicySpec};
use crate::principal::{Principal, Role};
use crate::registry::ModelRegistry;

// ============================================================================
// State
// ============================================================================

pub struct AppState {
    pub gate: Gate<Arc<MemoryStore>, Arc<MemoryStore>>,
    pub store: Arc<MemoryStore>,
}

impl AppState {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let gate = Gate::new(registry, store.clone(), store.clone());
        Self { gate, store }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
struct AuthorizeReq {
    subject_id: Option<String>,
    role: Option<Role>,
    resource_id: String,
    spec: PolicySpec,
}

#[derive(Deserialize)]
struct SeedEntityReq {
    model: String,
    document: Value,
}

#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Map a gate error to its outward signal. Configuration faults surface as
/// server faults with a generic body; the detail goes to the logs, not the
/// caller.
fn error_response<T>(e: &GateError) -> (StatusCode, Json<ApiResponse<T>>) {
    let (status, body) = match e {
        GateError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
        GateError::InvalidInput(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        GateError::Unauthenticated => (StatusCode::UNAUTHORIZED, e.to_string()),
        GateError::UnknownModel(_) | GateError::BrokenRelation { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "configuration error".to_string(),
        ),
        GateError::Storage(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "storage failure".to_string(),
        ),
    };
    (status, Json(ApiResponse::err(body)))
}

// ============================================================================
// Handlers
// ============================================================================

async fn post_authorize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthorizeReq>,
) -> (StatusCode, Json<ApiResponse<Decision>>) {
    let principal = match (req.subject_id, req.role) {
        (Some(subject_id), Some(role)) => Some(Principal::new(subject_id, role)),
        _ => None,
    };

    match state
        .gate
        .authorize(principal.as_ref(), &req.resource_id, &req.spec)
    {
        Ok(decision) => {
            let status = if decision.allowed {
                StatusCode::OK
            } else {
                StatusCode::FORBIDDEN
            };
            (status, Json(ApiResponse::ok(decision)))
        }
        Err(e) => error_response(&e),
    }
}

async fn post_entity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SeedEntityReq>,
) -> (StatusCode, Json<ApiResponse<String>>) {
    if !state.gate.registry().contains(&req.model) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::err(format!("unknown model '{}'", req.model))),
        );
    }
    match state.store.insert(&req.model, req.document) {
        Ok(id) => (StatusCode::OK, Json(ApiResponse::ok(id))),
        Err(e) => error_response(&e),
    }
}

async fn post_membership(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EntityMembership>,
) -> (StatusCode, Json<ApiResponse<String>>) {
    state.store.add_membership(req);
    (StatusCode::OK, Json(ApiResponse::ok("created".into())))
}

async fn get_models(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Vec<String>>> {
    Json(ApiResponse::ok(state.gate.registry().model_names()))
}

async fn post_reset(State(state): State<Arc<AppState>>) -> Json<ApiResponse<String>> {
    state.store.clear();
    Json(ApiResponse::ok("reset".into()))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: Arc<AppState>) -> Router {
    // CORS for demo
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/authorize", post(post_authorize))
        .route("/entities", post(post_entity))
        .route("/memberships", post(post_membership))
        .route("/models", get(get_models))
        .route("/reset", post(post_reset))
        .layer(cors)
        .with_state(state)
}
