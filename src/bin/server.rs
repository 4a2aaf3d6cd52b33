//! Pathgate REST demo server
//!
//! Run with: cargo run --features server --bin pathgate-server
//!
//! Registers the training-program models at startup; the registry is
//! read-only from then on. Seed documents and memberships over HTTP, then
//! POST /authorize to evaluate policies.

use std::sync::Arc;

use pathgate::server::{router, AppState};
use pathgate::{ModelRegistry, ModelSchema};

fn build_registry() -> ModelRegistry {
    let mut registry = ModelRegistry::new();
    registry
        .register(ModelSchema::new("Utilisateur"))
        .register(
            ModelSchema::new("Formateur")
                .relation("utilisateur", "Utilisateur")
                .relation("manager", "Manager"),
        )
        .register(ModelSchema::new("Manager").relation("utilisateur", "Utilisateur"))
        .register(
            ModelSchema::new("Coordinateur")
                .relation("utilisateur", "Utilisateur")
                .relation("manager", "Manager"),
        )
        .register(
            ModelSchema::new("Beneficiaire")
                .relation("utilisateur", "Utilisateur")
                .relation("formateur", "Formateur"),
        )
        .register(
            ModelSchema::new("Formation")
                .relation("formateur", "Formateur")
                .relation("beneficiaires", "Beneficiaire"),
        )
        .register(ModelSchema::new("Entite").relation("manager", "Manager"))
        .register(
            ModelSchema::new("Evenement")
                .relation("formation", "Formation")
                .relation("formateur", "Formateur"),
        );
    registry
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pathgate=debug,info".into()),
        )
        .init();

    let registry = Arc::new(build_registry());
    let state = Arc::new(AppState::new(registry));
    let app = router(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".into());
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("pathgate server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
