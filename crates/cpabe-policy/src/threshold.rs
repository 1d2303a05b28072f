//! Threshold-gate compilation.
//!
//! The CP-ABE evaluator consumes policies as postfix programs of attribute
//! pushes and `kofn` gates. This module compiles an infix expression into
//! that form so a policy can be previewed exactly as the backend will see it.
//!
//! | Infix                      | Postfix                 |
//! |----------------------------|-------------------------|
//! | `a and b`                  | `a b 2of2`              |
//! | `(a and b) or c`           | `a b 2of2 c 1of2`       |
//! | `not a`                    | `a 0of1`                |
//! | `2 of (a, b, c)`           | `a b c 2of3`            |
//! | `age >= 30 and role_admin` | `age_ge_30 role_admin 2of2` |
//! | `role:admin or dept:eng`   | `role_admin dept_eng 1of2`  |

use std::fmt;

use crate::error::{PolicyError, Result};
use crate::predicate::{ComparisonOp, DISPLAY_SEPARATOR, WIRE_SEPARATOR};

/// One step of a postfix threshold program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Push an attribute leaf.
    Attribute(String),
    /// Satisfied when at least `threshold` of the top `inputs` leaves hold.
    Gate { threshold: u32, inputs: u32 },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attribute(token) => f.write_str(token),
            Self::Gate { threshold, inputs } => write!(f, "{threshold}of{inputs}"),
        }
    }
}

const AND_GATE: Instruction = Instruction::Gate {
    threshold: 2,
    inputs: 2,
};
const OR_GATE: Instruction = Instruction::Gate {
    threshold: 1,
    inputs: 2,
};
const NOT_GATE: Instruction = Instruction::Gate {
    threshold: 0,
    inputs: 1,
};

/// Compiles an infix policy into a space-separated postfix program.
pub fn compile_postfix(input: &str) -> Result<String> {
    let program = compile(input)?;
    Ok(program
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" "))
}

/// Compiles an infix policy into postfix instructions.
///
/// Comparison syntax is folded into canonical tokens first and
/// `k of (a, b, ...)` clauses expand into their own gate. The result is
/// checked for arity before it is returned.
pub fn compile(input: &str) -> Result<Vec<Instruction>> {
    let lexemes = lex(input);
    if lexemes.is_empty() {
        return Err(malformed("empty policy"));
    }
    let items = fold(&lexemes)?;
    let program = shunting_yard(items)?;
    check_arity(&program)?;
    Ok(program)
}

// ============================================================================
// Lexing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
    Open,
    Close,
    Comma,
    Compare(&'static str),
    Word(String),
}

fn lex(input: &str) -> Vec<Lexeme> {
    let mut lexemes = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                lexemes.push(Lexeme::Open);
            }
            ')' => {
                chars.next();
                lexemes.push(Lexeme::Close);
            }
            ',' => {
                chars.next();
                lexemes.push(Lexeme::Comma);
            }
            '=' => {
                chars.next();
                lexemes.push(Lexeme::Compare("="));
            }
            '>' | '<' => {
                chars.next();
                let with_eq = chars.next_if_eq(&'=').is_some();
                let symbol = match (c, with_eq) {
                    ('>', true) => ">=",
                    ('>', false) => ">",
                    ('<', true) => "<=",
                    _ => "<",
                };
                lexemes.push(Lexeme::Compare(symbol));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || "(),=<>".contains(c) {
                        break;
                    }
                    // Display tokens (`role:admin`) lex to their wire form.
                    word.push(if c == DISPLAY_SEPARATOR { WIRE_SEPARATOR } else { c });
                    chars.next();
                }
                lexemes.push(Lexeme::Word(word));
            }
        }
    }

    lexemes
}

// ============================================================================
// Folding
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    And,
    Or,
    Not,
}

impl Op {
    fn precedence(self) -> u8 {
        match self {
            Self::Not => 3,
            Self::And => 2,
            Self::Or => 1,
        }
    }

    fn gate(self) -> Instruction {
        match self {
            Self::And => AND_GATE,
            Self::Or => OR_GATE,
            Self::Not => NOT_GATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// A self-contained postfix fragment: one leaf, or a whole `k of` clause.
    Operand(Vec<Instruction>),
    Op(Op),
    Open,
    Close,
}

fn keyword(word: &str) -> Option<Op> {
    if word.eq_ignore_ascii_case("and") {
        Some(Op::And)
    } else if word.eq_ignore_ascii_case("or") {
        Some(Op::Or)
    } else if word.eq_ignore_ascii_case("not") {
        Some(Op::Not)
    } else {
        None
    }
}

/// Folds comparisons and threshold clauses into operands.
fn fold(lexemes: &[Lexeme]) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut i = 0;

    while i < lexemes.len() {
        match &lexemes[i] {
            Lexeme::Open => {
                items.push(Item::Open);
                i += 1;
            }
            Lexeme::Close => {
                items.push(Item::Close);
                i += 1;
            }
            Lexeme::Comma => return Err(malformed("',' outside a threshold clause")),
            Lexeme::Compare(symbol) => {
                return Err(malformed(&format!("'{symbol}' without a left operand")));
            }
            Lexeme::Word(word) => {
                if let Some(op) = keyword(word) {
                    items.push(Item::Op(op));
                    i += 1;
                } else if is_threshold_clause(lexemes, i) {
                    let (operand, next) = threshold_clause(lexemes, i)?;
                    items.push(Item::Operand(operand));
                    i = next;
                } else {
                    let (token, next) = attribute(lexemes, i)?;
                    items.push(Item::Operand(vec![Instruction::Attribute(token)]));
                    i = next;
                }
            }
        }
    }

    Ok(items)
}

fn is_threshold_clause(lexemes: &[Lexeme], i: usize) -> bool {
    matches!(
        (&lexemes[i], lexemes.get(i + 1), lexemes.get(i + 2)),
        (Lexeme::Word(k), Some(Lexeme::Word(of)), Some(Lexeme::Open))
            if k.bytes().all(|b| b.is_ascii_digit()) && of.eq_ignore_ascii_case("of")
    )
}

/// Reads `word` or `word <cmp> word` starting at `i`.
fn attribute(lexemes: &[Lexeme], i: usize) -> Result<(String, usize)> {
    let Lexeme::Word(left) = &lexemes[i] else {
        return Err(malformed("expected an attribute"));
    };

    let Some(Lexeme::Compare(symbol)) = lexemes.get(i + 1) else {
        return Ok((left.clone(), i + 1));
    };

    match lexemes.get(i + 2) {
        Some(Lexeme::Word(right)) if keyword(right).is_none() => {
            let token = match ComparisonOp::from_symbol(symbol) {
                Some(op) => format!("{left}_{}_{right}", op.keyword()),
                None => format!("{left}_{right}"),
            };
            Ok((token, i + 3))
        }
        _ => Err(malformed(&format!("'{left} {symbol}' is missing a value"))),
    }
}

/// Reads `k of ( item, item, ... )` starting at `i`.
fn threshold_clause(lexemes: &[Lexeme], i: usize) -> Result<(Vec<Instruction>, usize)> {
    let Lexeme::Word(k) = &lexemes[i] else {
        return Err(malformed("expected a threshold"));
    };
    let threshold: u32 = k
        .parse()
        .map_err(|_| malformed(&format!("threshold '{k}' is not a number")))?;

    let mut leaves = Vec::new();
    let mut j = i + 3;
    loop {
        match lexemes.get(j) {
            Some(Lexeme::Word(word)) if keyword(word).is_none() => {
                let (token, next) = attribute(lexemes, j)?;
                leaves.push(Instruction::Attribute(token));
                j = next;
            }
            _ => return Err(malformed("threshold clause expects attributes")),
        }
        match lexemes.get(j) {
            Some(Lexeme::Comma) => j += 1,
            Some(Lexeme::Close) => {
                j += 1;
                break;
            }
            _ => return Err(malformed("threshold clause is not closed")),
        }
    }

    let inputs = u32::try_from(leaves.len())
        .map_err(|_| malformed("threshold clause has too many attributes"))?;
    if threshold == 0 || threshold > inputs {
        return Err(malformed(&format!(
            "threshold {threshold} of {inputs} cannot be satisfied"
        )));
    }

    leaves.push(Instruction::Gate { threshold, inputs });
    Ok((leaves, j))
}

// ============================================================================
// Shunting Yard
// ============================================================================

fn shunting_yard(items: Vec<Item>) -> Result<Vec<Instruction>> {
    let mut output = Vec::new();
    let mut stack: Vec<Item> = Vec::new();

    for item in items {
        match item {
            Item::Operand(fragment) => output.extend(fragment),
            Item::Open => stack.push(Item::Open),
            Item::Close => loop {
                match stack.pop() {
                    Some(Item::Op(op)) => output.push(op.gate()),
                    Some(Item::Open) => break,
                    _ => return Err(malformed("unbalanced ')'")),
                }
            },
            // Prefix `not` binds to what follows; it never pops.
            Item::Op(Op::Not) => stack.push(Item::Op(Op::Not)),
            Item::Op(op) => {
                while let Some(Item::Op(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(top.gate());
                    stack.pop();
                }
                stack.push(Item::Op(op));
            }
        }
    }

    while let Some(item) = stack.pop() {
        match item {
            Item::Op(op) => output.push(op.gate()),
            _ => return Err(malformed("unbalanced '('")),
        }
    }

    Ok(output)
}

/// Verifies every gate has enough inputs and exactly one result remains.
fn check_arity(program: &[Instruction]) -> Result<()> {
    let mut depth: u32 = 0;
    for instruction in program {
        match instruction {
            Instruction::Attribute(_) => depth += 1,
            Instruction::Gate { inputs, .. } => {
                if depth < *inputs {
                    return Err(malformed(&format!(
                        "gate '{instruction}' is missing operands"
                    )));
                }
                depth = depth - inputs + 1;
            }
        }
    }

    if depth == 1 {
        Ok(())
    } else {
        Err(malformed("operands are not joined by an operator"))
    }
}

fn malformed(reason: &str) -> PolicyError {
    PolicyError::MalformedThreshold {
        reason: reason.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
