//! Attribute token normalizer.
//!
//! Turns human comparison syntax into canonical tokens:
//!
//! | Input               | Token              |
//! |---------------------|--------------------|
//! | `department = HR`   | `department_HR`    |
//! | `age >= 30`         | `age_ge_30`        |
//! | `salary > 50000`    | `salary_gt_50000`  |
//! | `level <= 5`        | `level_le_5`       |
//! | `experience < 2`    | `experience_lt_2`  |
//! | `location_NY`       | `location_NY`      |
//!
//! Validation and transformation are separate functions. Whether spaces are
//! rewritten to underscores is a caller decision expressed as a
//! [`SpacePolicy`]; [`parse_comparison`] itself never rewrites input.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FormatError;
use crate::predicate::{ComparisonOp, Predicate, is_segment};

/// `left <op> right` with optional whitespace around the operator.
///
/// Alternation lists the two-character operators first so `>=` is never
/// read as `>` followed by a stray `=`.
static COMPARISON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9]+)\s*(>=|<=|=|>|<)\s*([A-Za-z0-9]+)$")
        .expect("comparison pattern is a valid regex")
});

static CANONICAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]+_[A-Za-z0-9]+(_[A-Za-z0-9]+)*$")
        .expect("canonical token pattern is a valid regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));

// ============================================================================
// Public API
// ============================================================================

/// Converts a comparison expression or a canonical token into a predicate.
///
/// The input is trimmed. Recognized forms, first match wins: `a = b`,
/// `a >= b`, `a > b`, `a <= b`, `a < b`; otherwise the input must already
/// satisfy [`validate_format`] and is accepted as a token.
///
/// Categories and operator keywords are case-insensitive and come back
/// lower-cased, so `Location_NY` gives `location_NY` and `age_GE_30` gives
/// `age_ge_30`. Value case is kept.
pub fn parse_comparison(input: &str) -> Result<Predicate, FormatError> {
    let trimmed = input.trim();

    if let Some(caps) = COMPARISON.captures(trimmed) {
        let (category, symbol, value) = (&caps[1], &caps[2], &caps[3]);
        return match symbol {
            "=" => Predicate::equality(category, value),
            other => match ComparisonOp::from_symbol(other) {
                Some(op) => Predicate::comparison(category, op, value),
                None => Err(FormatError::new(trimmed)),
            },
        };
    }

    if validate_format(trimmed) {
        return Predicate::from_token(trimmed);
    }

    debug!(input = %trimmed, "attribute did not match any recognized syntax");
    Err(FormatError::new(trimmed))
}

/// True iff `token` is `segment_segment(_segment)*` with alphanumeric segments.
pub fn validate_format(token: &str) -> bool {
    CANONICAL.is_match(token)
}

/// Best-effort human rendering of a token string.
///
/// `department_HR` becomes `department: HR` and `age_ge_30` becomes
/// `age >= 30`. Any other shape is returned unchanged. Use
/// [`Predicate::human_readable`] when a decoded predicate is at hand.
pub fn to_human_readable(token: &str) -> String {
    let segments: Vec<&str> = token.split('_').collect();
    if !segments.iter().all(|s| is_segment(s)) {
        return token.to_string();
    }
    match segments.as_slice() {
        [category, value] => format!("{category}: {value}"),
        [category, op, value] => match ComparisonOp::from_keyword(op) {
            Some(op) => format!("{category} {} {value}", op.symbol()),
            None => token.to_string(),
        },
        _ => token.to_string(),
    }
}

// ============================================================================
// Space Handling
// ============================================================================

/// How free-text attribute entries containing spaces are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacePolicy {
    /// Never rewrite input; `top secret` is rejected.
    #[default]
    Preserve,
    /// Try structured parsing first; if that fails, replace whitespace runs
    /// with `_` and validate again (`clearance top secret` becomes
    /// `clearance_top_secret`).
    UnderscoreFallback,
}

/// Replaces each whitespace run with a single `_` after trimming.
pub fn substitute_spaces(input: &str) -> String {
    WHITESPACE.replace_all(input.trim(), "_").into_owned()
}

/// Normalizes `input` under the given space policy.
///
/// The error always names the original input, not the rewritten one.
pub fn normalize_with(input: &str, policy: SpacePolicy) -> Result<Predicate, FormatError> {
    match (parse_comparison(input), policy) {
        (Ok(predicate), _) => Ok(predicate),
        (Err(err), SpacePolicy::Preserve) => Err(err),
        (Err(err), SpacePolicy::UnderscoreFallback) => {
            parse_comparison(&substitute_spaces(input)).map_err(|_| err)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
