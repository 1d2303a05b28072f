//! Typed attribute predicates.
//!
//! A predicate is either an equality (`department_HR`) or a comparison
//! (`age_ge_30`). Strings only appear at the edges: [`Predicate::from_token`]
//! decodes a token, `Display` renders the canonical token, and
//! [`Predicate::display_form`] renders the editor form (`role:admin`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Separator used in canonical (wire) tokens.
pub const WIRE_SEPARATOR: char = '_';

/// Separator used when predicates are shown in the policy editor.
pub const DISPLAY_SEPARATOR: char = ':';

// ============================================================================
// Comparison Operator
// ============================================================================

/// A numeric comparison between a category and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    /// Strictly greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Strictly less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
}

impl ComparisonOp {
    /// All operators, in no particular order.
    pub const ALL: [Self; 4] = [Self::Gt, Self::Ge, Self::Lt, Self::Le];

    /// The token segment for this operator (`gt`, `ge`, `lt`, `le`).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Ge => "ge",
            Self::Lt => "lt",
            Self::Le => "le",
        }
    }

    /// The human comparison symbol (`>`, `>=`, `<`, `<=`).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Parses a token segment, ignoring ASCII case.
    pub fn from_keyword(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.keyword().eq_ignore_ascii_case(segment))
    }

    /// Parses a comparison symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Predicate
// ============================================================================

/// A single attribute predicate.
///
/// The category is stored lower-cased since categories and operators are
/// case-insensitive. The value keeps its casing and may span several
/// segments joined by `_` (`clearance_top_secret`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Predicate {
    /// `category_value`
    Equality { category: String, value: String },
    /// `category_<op>_value`
    Comparison {
        category: String,
        op: ComparisonOp,
        value: String,
    },
}

impl Predicate {
    /// Builds an equality predicate from its parts.
    ///
    /// A multi-segment value led by an operator keyword (`ge_30`) is
    /// rejected: its token would decode as a comparison.
    pub fn equality(category: &str, value: &str) -> Result<Self, FormatError> {
        check_parts(category, value)?;
        if led_by_operator(value) {
            return Err(FormatError::new(&format!("{category}_{value}")));
        }
        Ok(Self::Equality {
            category: category.to_ascii_lowercase(),
            value: value.to_string(),
        })
    }

    /// Builds a comparison predicate from its parts.
    pub fn comparison(category: &str, op: ComparisonOp, value: &str) -> Result<Self, FormatError> {
        check_parts(category, value)?;
        Ok(Self::Comparison {
            category: category.to_ascii_lowercase(),
            op,
            value: value.to_string(),
        })
    }

    /// Decodes a token written with either separator.
    ///
    /// `role_admin`, `role:admin`, `age_ge_30` and `age:ge:30` are all
    /// accepted. Every segment must be `[A-Za-z0-9]+` and there must be at
    /// least two. An operator keyword in second position makes a
    /// comparison only when a value segment follows it.
    pub fn from_token(token: &str) -> Result<Self, FormatError> {
        let trimmed = token.trim();
        let segments: Vec<&str> = trimmed
            .split([WIRE_SEPARATOR, DISPLAY_SEPARATOR])
            .collect();

        if segments.len() < 2 || !segments.iter().all(|s| is_segment(s)) {
            return Err(FormatError::new(trimmed));
        }

        let category = segments[0].to_ascii_lowercase();
        if segments.len() >= 3 {
            if let Some(op) = ComparisonOp::from_keyword(segments[1]) {
                return Ok(Self::Comparison {
                    category,
                    op,
                    value: segments[2..].join("_"),
                });
            }
        }

        Ok(Self::Equality {
            category,
            value: segments[1..].join("_"),
        })
    }

    /// The attribute category (`department`, `age`).
    pub fn category(&self) -> &str {
        match self {
            Self::Equality { category, .. } | Self::Comparison { category, .. } => category,
        }
    }

    /// The attribute value, segments joined by `_`.
    pub fn value(&self) -> &str {
        match self {
            Self::Equality { value, .. } | Self::Comparison { value, .. } => value,
        }
    }

    /// The comparison operator, if any.
    pub fn op(&self) -> Option<ComparisonOp> {
        match self {
            Self::Equality { .. } => None,
            Self::Comparison { op, .. } => Some(*op),
        }
    }

    /// Editor rendering: `role:admin`, `age:ge:30`.
    pub fn display_form(&self) -> String {
        match self {
            Self::Equality { category, value } => format!("{category}:{value}"),
            Self::Comparison {
                category,
                op,
                value,
            } => format!("{category}:{}:{value}", op.keyword()),
        }
    }

    /// Human rendering: `department: HR`, `age >= 30`.
    pub fn human_readable(&self) -> String {
        match self {
            Self::Equality { category, value } => format!("{category}: {value}"),
            Self::Comparison {
                category,
                op,
                value,
            } => format!("{category} {} {value}", op.symbol()),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equality { category, value } => write!(f, "{category}_{value}"),
            Self::Comparison {
                category,
                op,
                value,
            } => write!(f, "{category}_{}_{value}", op.keyword()),
        }
    }
}

impl FromStr for Predicate {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}

impl TryFrom<String> for Predicate {
    type Error = FormatError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        Self::from_token(&token)
    }
}

impl From<Predicate> for String {
    fn from(predicate: Predicate) -> Self {
        predicate.to_string()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// True for a non-empty run of ASCII letters and digits.
pub(crate) fn is_segment(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn led_by_operator(value: &str) -> bool {
    value
        .split_once(WIRE_SEPARATOR)
        .is_some_and(|(head, _)| ComparisonOp::from_keyword(head).is_some())
}

fn check_parts(category: &str, value: &str) -> Result<(), FormatError> {
    let value_ok = value.split(WIRE_SEPARATOR).all(is_segment);
    if is_segment(category) && value_ok {
        Ok(())
    } else {
        Err(FormatError::new(&format!("{category}_{value}")))
    }
}

// ============================================================================
// Tests
// ============================================================================
