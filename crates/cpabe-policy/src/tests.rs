//! Workflow tests spanning several modules of cpabe-policy.

#![allow(clippy::unwrap_used)] // Tests use unwrap for simplicity
#![allow(clippy::too_many_lines)] // Test functions can be long

mod property_tests;

use crate::catalog::AttributeCatalog;
use crate::expression::{AttributeGroup, Operator, PolicyExpression, Slot};
use crate::key_attributes::KeyAttributeSet;
use crate::normalizer::SpacePolicy;
use crate::parser::parse;
use crate::predicate::Predicate;
use crate::serializer::{dropped_groups, serialize};
use crate::threshold::compile_postfix;
use crate::wire::{EncryptionRequest, KeyGenerationRequest, PolicyRecord};
use crate::PolicyError;

fn pred(token: &str) -> Predicate {
    Predicate::from_token(token).unwrap()
}

// ============================================================================
// Editor Workflow
// ============================================================================

#[test]
fn test_build_submit_store_and_reload() {
    // Two groups picked from the catalog plus one typed comparison.
    let catalog = AttributeCatalog::default();
    let mut expr = PolicyExpression::new();
    {
        let group = expr.group_mut(0).unwrap();
        group.set_slot(0, Slot::Filled(catalog.get("role:admin").unwrap().clone()));
        group.add_slot();
        group.set_slot(1, Slot::Filled(catalog.get("role:manager").unwrap().clone()));
        group.toggle_operator();
    }
    expr.add_group();
    expr.group_mut(1).unwrap().set_text(0, "age >= 30");

    assert_eq!(serialize(&expr), "(role:admin OR role:manager) AND age:ge:30");

    let request = EncryptionRequest::from_expression(&expr).unwrap();
    assert_eq!(
        request.policy_expression,
        "(role_admin or role_manager) and age_ge_30"
    );

    let record = PolicyRecord {
        name: "managers over 30".to_string(),
        description: Some("demo".to_string()),
        policy_expression: request.policy_expression.clone(),
    };
    let stored = serde_json::to_string(&record).unwrap();
    let loaded: PolicyRecord = serde_json::from_str(&stored).unwrap();

    let reloaded = loaded.to_expression();
    assert_eq!(reloaded.operator, Operator::And);
    assert_eq!(reloaded.groups[0].operator, Operator::Or);
    assert_eq!(
        reloaded.predicates().cloned().collect::<Vec<_>>(),
        expr.predicates().cloned().collect::<Vec<_>>()
    );
    assert_eq!(
        EncryptionRequest::from_expression(&reloaded).unwrap(),
        request
    );
}

#[test]
fn test_empty_groups_are_reported_not_submitted() {
    let mut expr = PolicyExpression::new()
        .with_group(AttributeGroup::of([pred("role_admin")], Operator::And));
    expr.add_group();

    assert_eq!(dropped_groups(&expr), vec![0, 2]);
    assert_eq!(serialize(&expr), "role:admin");

    expr.remove_group(2);
    expr.remove_group(0);
    assert!(dropped_groups(&expr).is_empty());
}

#[test]
fn test_correcting_a_literal_unblocks_submission() {
    let mut expr = parse("(role_admin and role admin)");
    let err = EncryptionRequest::from_expression(&expr).unwrap_err();
    assert!(matches!(err, PolicyError::UndecodedPredicate { .. }));

    expr.group_mut(0).unwrap().set_text(1, "role:owner");
    let request = EncryptionRequest::from_expression(&expr).unwrap();
    assert_eq!(request.policy_expression, "(role_admin and role_owner)");
}

#[test]
fn test_top_level_or_survives_a_full_cycle() {
    let expr = parse("(role:admin AND dept:eng) OR role:auditor");
    let request = EncryptionRequest::from_expression(&expr).unwrap();
    assert_eq!(
        request.policy_expression,
        "(role_admin and dept_eng) or role_auditor"
    );

    let back = crate::parser::parse_wire(&request.policy_expression);
    assert_eq!(back.operator, Operator::Or);
}

// ============================================================================
// Key Generation
// ============================================================================

#[test]
fn test_key_generation_from_mixed_entry() {
    let catalog = AttributeCatalog::default();
    let mut set = KeyAttributeSet::new();

    assert!(set.toggle(catalog.get("department:engineering").unwrap().clone()));
    set.insert_text("clearance top secret", SpacePolicy::UnderscoreFallback)
        .unwrap();
    set.insert_text("age >= 30", SpacePolicy::Preserve).unwrap();

    let err = set
        .insert_text("clearance top secret", SpacePolicy::Preserve)
        .unwrap_err();
    assert!(matches!(err, PolicyError::Format(_)));

    let request = KeyGenerationRequest::from_set(&set).unwrap();
    assert_eq!(
        serde_json::to_string(&request).unwrap(),
        r#"{"attributes":["department_engineering","clearance_top_secret","age_ge_30"]}"#
    );
}

// ============================================================================
// Threshold Compilation
// ============================================================================

#[test]
fn test_submitted_policy_compiles_to_postfix() {
    let expr = parse("(role:admin OR role:manager) AND age:ge:30");
    let request = EncryptionRequest::from_expression(&expr).unwrap();
    assert_eq!(
        compile_postfix(&request.policy_expression).unwrap(),
        "role_admin role_manager 1of2 age_ge_30 2of2"
    );
}
