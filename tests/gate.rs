//! Gate contract tests: input validation, error mapping, idempotence, and
//! the end-to-end formation scenario.

use std::sync::Arc;

use pathgate::{
    AccessType, Gate, GateError, MemoryStore, ModelRegistry, ModelSchema, PolicySpec, Principal,
    Reason, Role,
};
use serde_json::json;

fn setup() -> Gate<Arc<MemoryStore>, Arc<MemoryStore>> {
    let mut reg = ModelRegistry::new();
    reg.register(ModelSchema::new("Utilisateur"))
        .register(
            ModelSchema::new("Formateur")
                .relation("utilisateur", "Utilisateur")
                .relation("manager", "Manager"),
        )
        .register(ModelSchema::new("Manager").relation("utilisateur", "Utilisateur"))
        .register(ModelSchema::new("Formation").relation("formateur", "Formateur"));

    let store = Arc::new(MemoryStore::new());
    store
        .insert("Utilisateur", json!({ "_id": "u1" }))
        .unwrap();
    store
        .insert(
            "Formateur",
            json!({ "_id": "f1", "utilisateur": "u1", "manager": "m1" }),
        )
        .unwrap();
    store
        .insert("Manager", json!({ "_id": "m1", "utilisateur": "u2" }))
        .unwrap();
    store
        .insert("Formation", json!({ "_id": "F1", "formateur": "f1" }))
        .unwrap();
    Gate::new(Arc::new(reg), store.clone(), store)
}

fn formation_spec(access: AccessType) -> PolicySpec {
    PolicySpec::ChainedFormationAccess { access }
}

// ============================================================================
// Input Validation
// ============================================================================

#[test]
fn test_missing_principal_rejected_before_anything_else() {
    let gate = setup();
    let err = gate
        .authorize(None, "F1", &formation_spec(AccessType::Read))
        .unwrap_err();
    assert_eq!(err, GateError::Unauthenticated);
}

#[test]
fn test_malformed_resource_id_is_invalid_input() {
    let gate = setup();
    let caller = Principal::new("u1", Role::Formateur);
    for bad in ["", "a b", "a/b", "x.y"] {
        let err = gate
            .authorize(Some(&caller), bad, &formation_spec(AccessType::Read))
            .unwrap_err();
        assert!(
            matches!(err, GateError::InvalidInput(_)),
            "expected InvalidInput for {:?}, got {:?}",
            bad,
            err
        );
    }
}

#[test]
fn test_id_validation_applies_to_admins_too() {
    let gate = setup();
    let admin = Principal::new("root", Role::Admin);
    let err = gate
        .authorize(Some(&admin), "no spaces", &formation_spec(AccessType::Read))
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidInput(_)));
}

#[test]
fn test_absent_resource_is_not_found() {
    let gate = setup();
    let caller = Principal::new("u1", Role::Formateur);
    let err = gate
        .authorize(Some(&caller), "F404", &formation_spec(AccessType::Read))
        .unwrap_err();
    assert_eq!(
        err,
        GateError::NotFound {
            model: "Formation".into(),
            id: "F404".into(),
        }
    );
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_identical_inputs_yield_identical_decisions() {
    let gate = setup();
    let owner = Principal::new("u1", Role::Formateur);
    let stranger = Principal::new("u9", Role::Formateur);

    let first = gate
        .authorize(Some(&owner), "F1", &formation_spec(AccessType::Update))
        .unwrap();
    let second = gate
        .authorize(Some(&owner), "F1", &formation_spec(AccessType::Update))
        .unwrap();
    assert_eq!(first, second);

    let first = gate
        .authorize(Some(&stranger), "F1", &formation_spec(AccessType::Update))
        .unwrap();
    let second = gate
        .authorize(Some(&stranger), "F1", &formation_spec(AccessType::Update))
        .unwrap();
    assert_eq!(first, second);
    assert!(!first.allowed);
}

// ============================================================================
// End-to-End Scenario
// ============================================================================

#[test]
fn test_formateur_update_allowed_delete_denied() {
    let gate = setup();
    let formateur = Principal::new("u1", Role::Formateur);

    let update = gate
        .authorize(Some(&formateur), "F1", &formation_spec(AccessType::Update))
        .unwrap();
    assert!(update.allowed);

    let delete = gate
        .authorize(Some(&formateur), "F1", &formation_spec(AccessType::Delete))
        .unwrap();
    assert!(!delete.allowed);
    assert_eq!(delete.reason, Some(Reason::FormateurCannotDelete));
    // The stable code is all a denied caller ever sees.
    assert_eq!(delete.reason.unwrap().as_str(), "formateur-cannot-delete");
}

#[test]
fn test_decision_survives_json_roundtrip() {
    let gate = setup();
    let formateur = Principal::new("u1", Role::Formateur);
    let decision = gate
        .authorize(Some(&formateur), "F1", &formation_spec(AccessType::Delete))
        .unwrap();

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["allowed"], false);
    assert_eq!(json["reason"], "formateur-cannot-delete");
}
