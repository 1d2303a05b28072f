//! Policy expression serializer.
//!
//! Produces the editor form of a policy (`(role:admin OR role:manager) AND
//! dept:eng`). The wire form sent to the backend is derived from this string
//! by [`crate::wire::to_wire`] at submission time.

use std::fmt;

use tracing::debug;

use crate::expression::{AttributeGroup, PolicyExpression, Slot};

/// Serializes one group.
///
/// Returns `None` when the group has no filled slots, the bare predicate
/// for a single slot, and a parenthesized join for two or more.
pub fn serialize_group(group: &AttributeGroup) -> Option<String> {
    let parts: Vec<String> = group.contributing().filter_map(Slot::text).collect();
    match parts.len() {
        0 => None,
        1 => parts.into_iter().next(),
        _ => Some(format!(
            "({})",
            parts.join(&format!(" {} ", group.operator))
        )),
    }
}

/// Serializes a whole expression.
///
/// Groups without filled slots are dropped; see [`dropped_groups`]. A single
/// remaining group is emitted without a top-level operator. An empty string
/// means there is nothing to submit.
pub fn serialize(expression: &PolicyExpression) -> String {
    let parts: Vec<String> = expression
        .groups
        .iter()
        .enumerate()
        .filter_map(|(index, group)| {
            let part = serialize_group(group);
            if part.is_none() {
                debug!(group = index, "group has no attributes and was dropped");
            }
            part
        })
        .collect();

    parts.join(&format!(" {} ", expression.operator))
}

/// Indices of groups that contribute nothing to the serialized form.
///
/// Callers surface these as a correctable warning rather than silently
/// submitting a shorter policy.
pub fn dropped_groups(expression: &PolicyExpression) -> Vec<usize> {
    expression
        .groups
        .iter()
        .enumerate()
        .filter(|(_, group)| group.contributing().next().is_none())
        .map(|(index, _)| index)
        .collect()
}

impl fmt::Display for PolicyExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Operator;
    use crate::predicate::Predicate;

    fn group(tokens: &[&str], operator: Operator) -> AttributeGroup {
        AttributeGroup::of(
            tokens
                .iter()
                .map(|t| Predicate::from_token(t).expect("valid token")),
            operator,
        )
    }

    #[test]
    fn test_single_predicate() {
        let expr = PolicyExpression::from_groups(
            vec![group(&["role:admin"], Operator::And)],
            Operator::And,
        );
        assert_eq!(serialize(&expr), "role:admin");
    }

    #[test]
    fn test_single_or_group_is_parenthesized() {
        let expr = PolicyExpression::from_groups(
            vec![group(&["role:admin", "role:manager"], Operator::Or)],
            Operator::And,
        );
        assert_eq!(serialize(&expr), "(role:admin OR role:manager)");
    }

    #[test]
    fn test_singleton_groups_join_unparenthesized() {
        let expr = PolicyExpression::from_groups(
            vec![
                group(&["dept:eng"], Operator::And),
                group(&["dept:fin"], Operator::And),
            ],
            Operator::And,
        );
        assert_eq!(serialize(&expr), "dept:eng AND dept:fin");
    }

    #[test]
    fn test_mixed_groups_with_top_level_or() {
        let expr = PolicyExpression::from_groups(
            vec![
                group(&["department:engineering", "role:developer"], Operator::And),
                group(&["age_ge_30"], Operator::Or),
            ],
            Operator::Or,
        );
        assert_eq!(
            serialize(&expr),
            "(department:engineering AND role:developer) OR age:ge:30"
        );
        assert_eq!(expr.to_string(), serialize(&expr));
    }

    #[test]
    fn test_empty_placeholders_are_filtered() {
        let mut g = AttributeGroup::new(Operator::Or);
        g.add_slot();
        g.set_text(1, "role:admin");
        g.add_slot();

        let expr = PolicyExpression::from_groups(vec![g], Operator::And);
        assert_eq!(serialize(&expr), "role:admin");
    }

    #[test]
    fn test_empty_groups_are_dropped_and_reported() {
        let expr = PolicyExpression::from_groups(
            vec![
                AttributeGroup::default(),
                group(&["dept:eng"], Operator::And),
                AttributeGroup::default(),
            ],
            Operator::Or,
        );
        assert_eq!(serialize(&expr), "dept:eng");
        assert_eq!(dropped_groups(&expr), vec![0, 2]);
    }

    #[test]
    fn test_blank_model_serializes_to_empty_string() {
        let expr = PolicyExpression::new();
        assert_eq!(serialize(&expr), "");
        assert_eq!(dropped_groups(&expr), vec![0]);
    }

    #[test]
    fn test_literal_slots_are_emitted_verbatim() {
        let mut g = AttributeGroup::new(Operator::And);
        g.set_text(0, "role admin");
        g.add_slot();
        g.set_text(1, "dept:eng");

        let expr = PolicyExpression::from_groups(vec![g], Operator::And);
        assert_eq!(serialize(&expr), "(role admin AND dept:eng)");
    }

    #[test]
    fn test_serialize_is_repeatable() {
        let expr = PolicyExpression::from_groups(
            vec![group(&["a_1", "b_2"], Operator::Or), group(&["c_3"], Operator::And)],
            Operator::And,
        );
        assert_eq!(serialize(&expr), serialize(&expr));
    }
}
