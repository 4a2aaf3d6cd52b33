//! Ownership policy tests: self, single-parent, multi-path.

use std::sync::Arc;

use pathgate::{
    Gate, GateError, MemoryStore, ModelRegistry, ModelSchema, PolicySpec, Principal, Reason,
    RelationPath, Role,
};
use serde_json::json;

fn registry() -> Arc<ModelRegistry> {
    let mut reg = ModelRegistry::new();
    reg.register(ModelSchema::new("Utilisateur"))
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
            ModelSchema::new("Evenement")
                .relation("formateur", "Formateur")
                .relation("createur", "Utilisateur"),
        );
    Arc::new(reg)
}

fn setup() -> Gate<Arc<MemoryStore>, Arc<MemoryStore>> {
    let store = Arc::new(MemoryStore::new());
    store
        .insert("Utilisateur", json!({ "_id": "u1", "nom": "Anne" }))
        .unwrap();
    store
        .insert("Utilisateur", json!({ "_id": "u2", "nom": "Bruno" }))
        .unwrap();
    store
        .insert("Utilisateur", json!({ "_id": "u3", "nom": "Chloe" }))
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
        .insert(
            "Coordinateur",
            json!({ "_id": "c1", "utilisateur": "u3", "manager": "m1" }),
        )
        .unwrap();
    store
        .insert(
            "Beneficiaire",
            json!({ "_id": "b1", "utilisateur": "u1", "formateur": "f1" }),
        )
        .unwrap();
    store
        .insert(
            "Evenement",
            json!({ "_id": "ev1", "formateur": "f1", "createur": "u5" }),
        )
        .unwrap();
    Gate::new(registry(), store.clone(), store)
}

fn self_spec() -> PolicySpec {
    PolicySpec::SelfOwnership {
        model: "Beneficiaire".into(),
        owner_field: "utilisateur".into(),
    }
}

fn parent_spec() -> PolicySpec {
    PolicySpec::SingleParentOwnership {
        model: "Coordinateur".into(),
        parent_field: "manager.utilisateur".into(),
    }
}

fn multi_spec() -> PolicySpec {
    PolicySpec::MultiPathOwnership {
        model: "Evenement".into(),
        paths: vec![
            RelationPath::parse("createur").unwrap(),
            RelationPath::parse("formateur.utilisateur").unwrap(),
        ],
    }
}

// ============================================================================
// Admin Bypass
// ============================================================================

#[test]
fn test_admin_bypass_for_every_variant() {
    let gate = setup();
    let admin = Principal::new("nobody", Role::Admin);

    for spec in [
        self_spec(),
        parent_spec(),
        multi_spec(),
        PolicySpec::RoleAndEntity {
            roles: vec![Role::Manager],
            entity_types: vec!["entreprise".into()],
        },
        PolicySpec::ChainedFormationAccess {
            access: pathgate::AccessType::Delete,
        },
    ] {
        // The admin never owns anything here, and the resource id does not
        // even exist: the bypass runs before any ownership data is read.
        let decision = gate
            .authorize(Some(&admin), "does-not-exist", &spec)
            .unwrap();
        assert!(decision.allowed, "admin denied under {:?}", spec);
        assert_eq!(decision.reason, Some(Reason::AdminBypass));
    }
}

// ============================================================================
// Self-Ownership
// ============================================================================

#[test]
fn test_self_ownership_allows_owner() {
    let gate = setup();
    let owner = Principal::new("u1", Role::Beneficiaire);
    let decision = gate.authorize(Some(&owner), "b1", &self_spec()).unwrap();
    assert!(decision.allowed);
}

#[test]
fn test_self_ownership_denies_non_owner() {
    let gate = setup();
    let stranger = Principal::new("u3", Role::Beneficiaire);
    let decision = gate.authorize(Some(&stranger), "b1", &self_spec()).unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(Reason::NotSelf));
}

// ============================================================================
// Single-Parent Ownership
// ============================================================================

#[test]
fn test_self_shortcut_wins_even_when_parent_does_not_match() {
    let gate = setup();
    // u3 is c1's own profile; u3 is nobody's manager.
    let caller = Principal::new("u3", Role::Coordinateur);
    let decision = gate.authorize(Some(&caller), "c1", &parent_spec()).unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, Some(Reason::SelfUpdate));
}

#[test]
fn test_parent_path_allows_manager() {
    let gate = setup();
    // u2 is the user behind manager m1, c1's manager.
    let manager = Principal::new("u2", Role::Manager);
    let decision = gate
        .authorize(Some(&manager), "c1", &parent_spec())
        .unwrap();
    assert!(decision.allowed);
    assert_eq!(decision.reason, None);
}

#[test]
fn test_neither_self_nor_parent_is_denied() {
    let gate = setup();
    let stranger = Principal::new("u1", Role::Formateur);
    let decision = gate
        .authorize(Some(&stranger), "c1", &parent_spec())
        .unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(Reason::NotOwner));
}

#[test]
fn test_unknown_model_is_configuration_error_not_deny() {
    let gate = setup();
    let caller = Principal::new("u2", Role::Manager);
    let spec = PolicySpec::SingleParentOwnership {
        model: "Bogus".into(),
        parent_field: "manager.utilisateur".into(),
    };
    let err = gate.authorize(Some(&caller), "c1", &spec).unwrap_err();
    assert_eq!(err, GateError::UnknownModel("Bogus".into()));
    assert!(err.is_configuration());
}

// ============================================================================
// Multi-Path Ownership (logical OR)
// ============================================================================

#[test]
fn test_any_matching_path_allows() {
    let gate = setup();

    // First path matches, second does not.
    let creator = Principal::new("u5", Role::Coordinateur);
    assert!(gate
        .authorize(Some(&creator), "ev1", &multi_spec())
        .unwrap()
        .allowed);

    // Second path matches, first does not.
    let formateur = Principal::new("u1", Role::Formateur);
    assert!(gate
        .authorize(Some(&formateur), "ev1", &multi_spec())
        .unwrap()
        .allowed);
}

#[test]
fn test_no_matching_path_is_denied() {
    let gate = setup();
    let stranger = Principal::new("u3", Role::Coordinateur);
    let decision = gate
        .authorize(Some(&stranger), "ev1", &multi_spec())
        .unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(Reason::NoPathMatched));
}

#[test]
fn test_unresolved_path_is_skipped_not_matched() {
    let gate = setup();
    let spec = PolicySpec::MultiPathOwnership {
        model: "Evenement".into(),
        paths: vec![
            RelationPath::parse("absent.relation").unwrap(),
            RelationPath::parse("createur").unwrap(),
        ],
    };

    // The dead path contributes nothing; the live one still admits u5.
    let creator = Principal::new("u5", Role::Coordinateur);
    assert!(gate.authorize(Some(&creator), "ev1", &spec).unwrap().allowed);

    // And a dead path alone is a deny, never an error.
    let only_dead = PolicySpec::MultiPathOwnership {
        model: "Evenement".into(),
        paths: vec![RelationPath::parse("absent.relation").unwrap()],
    };
    let decision = gate.authorize(Some(&creator), "ev1", &only_dead).unwrap();
    assert!(!decision.allowed);
    assert_eq!(decision.reason, Some(Reason::NoPathMatched));
}
