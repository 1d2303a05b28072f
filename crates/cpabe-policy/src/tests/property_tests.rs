//! Property-based tests using proptest.
//!
//! Invariants that must hold for every policy the editor can build.

use proptest::prelude::*;

use crate::expression::{AttributeGroup, Operator, PolicyExpression};
use crate::normalizer::{parse_comparison, validate_format};
use crate::parser::{parse, parse_wire};
use crate::predicate::{ComparisonOp, Predicate};
use crate::serializer::serialize;
use crate::wire::to_wire;

fn operator() -> impl Strategy<Value = Operator> {
    prop_oneof![Just(Operator::And), Just(Operator::Or)]
}

fn comparison_op() -> impl Strategy<Value = ComparisonOp> {
    prop::sample::select(ComparisonOp::ALL.to_vec())
}

/// Predicates whose value is a single segment, in the given value alphabet.
fn predicate_with(value: &'static str) -> impl Strategy<Value = Predicate> {
    let equality = ("[a-z][a-z0-9]{0,7}", value)
        .prop_filter_map("valid equality", |(c, v)| Predicate::equality(&c, &v).ok());
    let comparison = ("[a-z][a-z0-9]{0,7}", comparison_op(), value)
        .prop_filter_map("valid comparison", |(c, op, v)| {
            Predicate::comparison(&c, op, &v).ok()
        });
    prop_oneof![equality, comparison]
}

fn expression_with(value: &'static str) -> impl Strategy<Value = PolicyExpression> {
    let group = (prop::collection::vec(predicate_with(value), 1..4), operator())
        .prop_map(|(predicates, op)| AttributeGroup::of(predicates, op));
    (prop::collection::vec(group, 1..4), operator())
        .prop_map(|(groups, op)| PolicyExpression::from_groups(groups, op))
}

fn expression() -> impl Strategy<Value = PolicyExpression> {
    expression_with("[A-Za-z0-9]{1,8}")
}

/// Checks that `back` carries the same structure as `original`.
///
/// Operators of single-predicate groups, and the top-level operator of a
/// single-group policy, do not appear in the text and are not compared.
fn assert_same_structure(
    original: &PolicyExpression,
    back: &PolicyExpression,
) -> Result<(), TestCaseError> {
    prop_assert_eq!(back.groups.len(), original.groups.len());
    for (a, b) in original.groups.iter().zip(&back.groups) {
        prop_assert_eq!(
            a.predicates().collect::<Vec<_>>(),
            b.predicates().collect::<Vec<_>>()
        );
        if a.slots.len() >= 2 {
            prop_assert_eq!(a.operator, b.operator);
        }
    }
    if original.groups.len() >= 2 {
        prop_assert_eq!(original.operator, back.operator);
    }
    Ok(())
}

proptest! {
    // ========================================================================
    // Serialize / Parse
    // ========================================================================

    /// Parsing a serialized policy gives back the same groups and operators.
    #[test]
    fn parse_inverts_serialize(expr in expression()) {
        let text = serialize(&expr);
        let back = parse(&text);
        prop_assert_eq!(back.literals().count(), 0);
        assert_same_structure(&expr, &back)?;
    }

    /// Serialization is a fixed point after one parse.
    #[test]
    fn serialize_is_idempotent(expr in expression()) {
        let once = serialize(&expr);
        let twice = serialize(&parse(&once));
        prop_assert_eq!(once, twice);
    }

    /// The wire form reloads to the same structure when values are lower-case.
    #[test]
    fn wire_form_reloads(expr in expression_with("[a-z0-9]{1,8}")) {
        let wire = to_wire(&serialize(&expr));
        let back = parse_wire(&wire);
        assert_same_structure(&expr, &back)?;
        prop_assert_eq!(to_wire(&serialize(&back)), wire);
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    /// A decoded token re-decodes to the same variant from either rendering.
    #[test]
    fn token_decoding_is_stable(
        category in "[a-z][a-z0-9]{0,5}",
        lead in prop::sample::select(vec!["ge", "gt", "le", "lt", "GE", "x1", "top"]),
        rest in prop::collection::vec("[A-Za-z0-9]{1,4}", 0..3),
    ) {
        let mut segments = vec![category, lead.to_string()];
        segments.extend(rest);
        let predicate = Predicate::from_token(&segments.join("_")).expect("valid segments");

        prop_assert_eq!(Predicate::from_token(&predicate.to_string()), Ok(predicate.clone()));
        prop_assert_eq!(Predicate::from_token(&predicate.display_form()), Ok(predicate));
    }

    /// The equality constructor never builds a predicate that decodes differently.
    #[test]
    fn equality_constructor_is_stable(
        category in "[a-z][a-z0-9]{0,5}",
        lead in prop::sample::select(vec!["ge", "gt", "le", "lt", "Lt", "x1", "top"]),
        rest in prop::collection::vec("[A-Za-z0-9]{1,4}", 0..3),
    ) {
        let mut value = lead.to_string();
        for segment in &rest {
            value.push('_');
            value.push_str(segment);
        }
        if let Ok(predicate) = Predicate::equality(&category, &value) {
            prop_assert_eq!(Predicate::from_token(&predicate.to_string()), Ok(predicate));
        }
    }

    // ========================================================================
    // Normalizer
    // ========================================================================

    /// Every successful normalization yields a token that validates.
    #[test]
    fn parse_comparison_output_validates(
        category in "[A-Za-z][A-Za-z0-9]{0,7}",
        symbol in prop::sample::select(vec!["=", ">=", ">", "<=", "<"]),
        value in "[A-Za-z0-9]{1,8}",
        pad in " {0,2}",
    ) {
        let input = format!("{category}{pad}{symbol}{pad}{value}");
        let predicate = parse_comparison(&input).expect("well-formed comparison");
        let token = predicate.to_string();
        prop_assert!(validate_format(&token));
        prop_assert_eq!(Predicate::from_token(&token).expect("token decodes"), predicate);
    }

    /// A canonical token normalizes to itself.
    #[test]
    fn canonical_tokens_are_fixed_points(
        category in "[a-z][a-z0-9]{0,7}",
        value in "[A-Za-z0-9]{1,8}",
    ) {
        let token = format!("{category}_{value}");
        prop_assert!(validate_format(&token));
        let predicate = parse_comparison(&token).expect("canonical token");
        prop_assert_eq!(predicate.to_string(), token);
    }

    /// Input outside the token alphabet never validates.
    #[test]
    fn punctuation_never_validates(
        left in "[a-z]{1,4}",
        junk in "[-!@#$%^&*.]",
        right in "[a-z]{1,4}",
    ) {
        let token = format!("{left}_{right}{junk}");
        prop_assert!(!validate_format(&token));
        prop_assert!(parse_comparison(&token).is_err());
    }
}
