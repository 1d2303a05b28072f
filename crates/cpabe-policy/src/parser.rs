//! Policy expression parser.
//!
//! Rebuilds the editable model from an expression string, whether produced
//! by [`crate::serializer::serialize`], by [`crate::wire::to_wire`], or
//! written by hand. Parsing never fails: text that cannot be decoded is kept
//! in [`Slot::Literal`]s so it can be corrected in the editor.
//!
//! Grammar accepted (keywords are case-insensitive):
//!
//! ```text
//! expression := segment ( KW segment )*        KW split only at paren depth 0
//! segment    := "(" piece ( KW piece )* ")"    one group, interior split flat
//!             | piece                          singleton group
//! piece      := token | comparison
//! ```
//!
//! The operator of each level is the first keyword found at that level. When
//! a level mixes `and` and `or`, only the first keyword splits; the rest of
//! the text ends up in literal slots.

use tracing::{debug, warn};

use crate::expression::{AttributeGroup, Operator, PolicyExpression, Slot};
use crate::wire::restore_display_separator;

/// A keyword occurrence with its surrounding whitespace.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    /// Byte offset where the leading whitespace starts.
    start: usize,
    /// Byte offset just past the trailing whitespace.
    end: usize,
    operator: Operator,
}

/// Parses an expression into its editable model.
///
/// Empty input gives a model with one empty group.
pub fn parse(input: &str) -> PolicyExpression {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return PolicyExpression::new();
    }

    let boundaries = keyword_boundaries(trimmed, true);
    let operator = boundaries.first().map_or(Operator::And, |b| b.operator);
    if boundaries.iter().any(|b| b.operator != operator) {
        warn!(
            expression = %trimmed,
            operator = %operator,
            "mixed top-level operators; only the first one is kept"
        );
    }

    let groups = split(trimmed, &boundaries, operator)
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect();

    PolicyExpression::from_groups(groups, operator)
}

/// Parses a wire-form expression, restoring the display separator first.
pub fn parse_wire(input: &str) -> PolicyExpression {
    parse(&restore_display_separator(input))
}

// ============================================================================
// Segments
// ============================================================================

fn parse_segment(segment: &str) -> AttributeGroup {
    let Some(inner) = segment
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return AttributeGroup {
            slots: vec![Slot::from_text(segment)],
            operator: Operator::And,
        };
    };

    let inner = inner.trim();
    if inner.is_empty() {
        debug!(segment = %segment, "empty group kept as literal");
        return AttributeGroup {
            slots: vec![Slot::Literal(segment.to_string())],
            operator: Operator::And,
        };
    }

    // Nested parentheses are not supported inside a group, so the interior
    // is split without tracking depth.
    let boundaries = keyword_boundaries(inner, false);
    let operator = boundaries.first().map_or(Operator::And, |b| b.operator);

    let slots: Vec<Slot> = split(inner, &boundaries, operator)
        .into_iter()
        .map(Slot::from_text)
        .collect();

    if slots.iter().any(|slot| matches!(slot, Slot::Literal(_))) {
        debug!(segment = %segment, "group contains undecoded attributes");
    }

    AttributeGroup { slots, operator }
}

// ============================================================================
// Scanning
// ============================================================================

/// Finds every standalone `and` / `or` surrounded by whitespace.
///
/// With `depth_aware`, keywords inside parentheses are skipped. Depth may go
/// negative on unbalanced input, in which case no further split happens.
fn keyword_boundaries(input: &str, depth_aware: bool) -> Vec<Boundary> {
    let bytes = input.as_bytes();
    let mut boundaries = Vec::new();
    let mut depth: i32 = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth -= 1;
                i += 1;
            }
            b if b.is_ascii_whitespace() => {
                let word_start = skip_whitespace(bytes, i);
                let word_end = skip_word(bytes, word_start);
                let followed_by_space = word_end < bytes.len();
                let at_level = !depth_aware || depth == 0;

                match Operator::from_keyword(&input[word_start..word_end]) {
                    Some(operator) if followed_by_space && at_level && i > 0 => {
                        let end = skip_whitespace(bytes, word_end);
                        boundaries.push(Boundary {
                            start: i,
                            end,
                            operator,
                        });
                        i = end;
                    }
                    _ => i = word_start,
                }
            }
            _ => i += 1,
        }
    }

    boundaries
}

/// Splits `input` at the boundaries carrying `operator`.
fn split<'a>(input: &'a str, boundaries: &[Boundary], operator: Operator) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut from = 0;
    for boundary in boundaries.iter().filter(|b| b.operator == operator) {
        pieces.push(&input[from..boundary.start]);
        from = boundary.end;
    }
    pieces.push(&input[from..]);
    pieces
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn skip_word(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

// ============================================================================
// Tests
// ============================================================================
