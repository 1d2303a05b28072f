//! Error types for the policy engine.
//!
//! Nothing here is fatal. Every variant describes a condition the caller
//! recovers from by prompting the user again.

use thiserror::Error;

/// An attribute entry that is neither a recognized comparison nor a
/// canonical token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid attribute format: '{input}' (expected e.g. 'department = HR', 'age >= 30' or 'location_NY')")]
pub struct FormatError {
    /// The rejected input, trimmed.
    pub input: String,
}

impl FormatError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.trim().to_string(),
        }
    }
}

/// Error type for policy and key-attribute operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// An attribute did not normalize.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The expression serialized to nothing; submission is blocked.
    #[error("Invalid policy: add at least one attribute to the policy")]
    EmptyExpression,

    /// The attribute is already part of the key attribute set.
    #[error("Attribute '{token}' is already in the attribute set")]
    DuplicateAttribute { token: String },

    /// A slot still holds text the parser could not decode.
    #[error("Policy contains an undecoded attribute: '{text}'")]
    UndecodedPredicate { text: String },

    /// A key generation request needs at least one attribute.
    #[error("Attributes list cannot be empty")]
    EmptyAttributeSet,

    /// The threshold program derived from an expression is not well formed.
    #[error("Malformed threshold policy: {reason}")]
    MalformedThreshold { reason: String },
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
