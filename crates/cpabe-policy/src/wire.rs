//! Wire format and backend payloads.
//!
//! The editor shows predicates with `:` (`role:admin`); the backend expects
//! lower-case tokens joined with `_` (`role_admin`). The conversion happens
//! in exactly one place, [`to_wire`], at submission time. Policies read back
//! from the backend pass through [`restore_display_separator`] before they
//! are parsed.
//!
//! ```text
//! PolicyExpression ──serialize──▶ "(role:admin OR role:manager)"
//!                                        │ to_wire
//!                                        ▼
//!                     {"policyExpression": "(role_admin or role_manager)"}
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PolicyError, Result};
use crate::expression::PolicyExpression;
use crate::key_attributes::KeyAttributeSet;
use crate::parser;
use crate::predicate::{DISPLAY_SEPARATOR, WIRE_SEPARATOR};
use crate::serializer::serialize;

/// Converts an editor-form expression to the wire form.
///
/// Lower-cases everything (operators included) and maps `:` to `_`.
pub fn to_wire(display: &str) -> String {
    display
        .to_lowercase()
        .replace(DISPLAY_SEPARATOR, &WIRE_SEPARATOR.to_string())
}

/// Maps the wire separator back to the display separator.
pub fn restore_display_separator(wire: &str) -> String {
    wire.replace(WIRE_SEPARATOR, &DISPLAY_SEPARATOR.to_string())
}

// ============================================================================
// Payloads
// ============================================================================

/// Body of an encryption request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionRequest {
    /// The policy in wire form.
    pub policy_expression: String,
}

impl EncryptionRequest {
    /// Builds the request for an edited policy.
    ///
    /// Fails when a slot still holds undecoded text or when the policy
    /// serializes to nothing.
    pub fn from_expression(expression: &PolicyExpression) -> Result<Self> {
        if let Some(text) = expression.literals().next() {
            return Err(PolicyError::UndecodedPredicate {
                text: text.to_string(),
            });
        }

        let display = serialize(expression);
        if display.is_empty() {
            return Err(PolicyError::EmptyExpression);
        }

        let policy_expression = to_wire(&display);
        debug!(policy = %policy_expression, "encryption policy prepared");
        Ok(Self { policy_expression })
    }
}

/// Body of a private-key generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGenerationRequest {
    /// Canonical attribute tokens.
    pub attributes: Vec<String>,
}

impl KeyGenerationRequest {
    /// Builds the request for a key attribute set. The set must not be empty.
    pub fn from_set(set: &KeyAttributeSet) -> Result<Self> {
        if set.is_empty() {
            return Err(PolicyError::EmptyAttributeSet);
        }
        Ok(Self {
            attributes: set.to_tokens(),
        })
    }
}

/// A stored policy as returned by the policy store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The policy in wire form.
    pub policy_expression: String,
}

impl PolicyRecord {
    /// Reconstructs the editable model for this policy.
    pub fn to_expression(&self) -> PolicyExpression {
        parser::parse_wire(&self.policy_expression)
    }

    /// The policy as shown in the policy list.
    pub fn display_expression(&self) -> String {
        restore_display_separator(&self.policy_expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{AttributeGroup, Operator};
    use crate::normalizer::SpacePolicy;
    use crate::predicate::Predicate;

    fn pred(token: &str) -> Predicate {
        Predicate::from_token(token).expect("valid token")
    }

    #[test]
    fn test_to_wire() {
        assert_eq!(
            to_wire("(role:Admin OR role:manager) AND age:ge:30"),
            "(role_admin or role_manager) and age_ge_30"
        );
    }

    #[test]
    fn test_restore_display_separator() {
        assert_eq!(
            restore_display_separator("(department_engineering and role_developer)"),
            "(department:engineering and role:developer)"
        );
    }

    #[test]
    fn test_encryption_request_json() {
        let expr = PolicyExpression::from_groups(
            vec![AttributeGroup::of(
                [pred("role:admin"), pred("role:manager")],
                Operator::Or,
            )],
            Operator::And,
        );
        let request = EncryptionRequest::from_expression(&expr).expect("non-empty policy");
        let json = serde_json::to_string(&request).expect("serialize request");
        assert_eq!(
            json,
            r#"{"policyExpression":"(role_admin or role_manager)"}"#
        );
    }

    #[test]
    fn test_encryption_request_blocks_empty_policy() {
        let err = EncryptionRequest::from_expression(&PolicyExpression::new())
            .expect_err("blank model");
        assert_eq!(err, PolicyError::EmptyExpression);
    }

    #[test]
    fn test_encryption_request_blocks_literals() {
        let mut expr = PolicyExpression::new();
        expr.group_mut(0).expect("group").set_text(0, "role admin");
        let err = EncryptionRequest::from_expression(&expr).expect_err("undecoded slot");
        assert_eq!(
            err,
            PolicyError::UndecodedPredicate {
                text: "role admin".to_string()
            }
        );
    }

    #[test]
    fn test_key_generation_request() {
        let mut set = KeyAttributeSet::new();
        set.insert_text("department = HR", SpacePolicy::Preserve)
            .expect("valid attribute");
        set.insert_text("age >= 30", SpacePolicy::Preserve)
            .expect("valid attribute");

        let request = KeyGenerationRequest::from_set(&set).expect("non-empty set");
        let json = serde_json::to_value(&request).expect("serialize request");
        assert_eq!(json["attributes"][0], "department_HR");
        assert_eq!(json["attributes"][1], "age_ge_30");
    }

    #[test]
    fn test_key_generation_request_rejects_empty_set() {
        let err = KeyGenerationRequest::from_set(&KeyAttributeSet::new()).expect_err("empty");
        assert_eq!(err, PolicyError::EmptyAttributeSet);
    }

    #[test]
    fn test_policy_record_round_trip() {
        let json = r#"{
            "name": "Engineering",
            "policyExpression": "(department_engineering and role_developer) and role_admin"
        }"#;
        let record: PolicyRecord = serde_json::from_str(json).expect("deserialize record");
        assert_eq!(record.description, None);
        assert_eq!(
            record.display_expression(),
            "(department:engineering and role:developer) and role:admin"
        );

        let expr = record.to_expression();
        assert_eq!(expr.groups.len(), 2);
        assert_eq!(
            EncryptionRequest::from_expression(&expr)
                .expect("policy survives")
                .policy_expression,
            record.policy_expression
        );
    }
}
