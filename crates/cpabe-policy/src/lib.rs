//! # cpabe-policy: Attribute Policy Expression Engine
//!
//! Models, serializes, parses and lexically validates the access policies
//! and key attributes of a CP-ABE console. No cryptography happens here;
//! the engine only produces the strings the CP-ABE backend consumes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │  Free-text attribute entry   │      │  Policy editor state         │
//! │  "age >= 30"                 │      │  groups + operators          │
//! └──────────────┬───────────────┘      └──────────────┬───────────────┘
//!                │ normalizer                          │ serializer
//!                ▼                                     ▼
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │  Predicate  age_ge_30        │─────▶│  "(role:admin OR ...) AND .." │
//! └──────────────┬───────────────┘      └──────────────┬───────────────┘
//!                │ KeyAttributeSet                     │ wire::to_wire
//!                ▼                                     ▼
//! ┌──────────────────────────────┐      ┌──────────────────────────────┐
//! │  {"attributes": [...]}       │      │  {"policyExpression": "..."} │
//! └──────────────────────────────┘      └──────────────┬───────────────┘
//!                                                      │ stored policy
//!                                                      ▼
//!                                       parser::parse_wire → editor state
//! ```
//!
//! ## Examples
//!
//! ```
//! use cpabe_policy::{parse_comparison, parse, serialize, wire::EncryptionRequest};
//!
//! let token = parse_comparison("age >= 30")?;
//! assert_eq!(token.to_string(), "age_ge_30");
//!
//! let expr = parse("(role:admin OR role:manager) AND dept:eng");
//! assert_eq!(serialize(&expr), "(role:admin OR role:manager) AND dept:eng");
//!
//! let request = EncryptionRequest::from_expression(&expr)?;
//! assert_eq!(request.policy_expression, "(role_admin or role_manager) and dept_eng");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
mod error;
pub mod expression;
pub mod key_attributes;
pub mod normalizer;
pub mod parser;
pub mod predicate;
pub mod serializer;
pub mod threshold;
pub mod wire;

#[cfg(test)]
mod tests;

pub use catalog::AttributeCatalog;
pub use error::{FormatError, PolicyError, Result};
pub use expression::{AttributeGroup, Operator, PolicyExpression, Slot};
pub use key_attributes::KeyAttributeSet;
pub use normalizer::{SpacePolicy, parse_comparison, to_human_readable, validate_format};
pub use parser::{parse, parse_wire};
pub use predicate::{ComparisonOp, Predicate};
pub use serializer::{dropped_groups, serialize};
pub use threshold::compile_postfix;
