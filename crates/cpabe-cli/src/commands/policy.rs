//! Policy expression commands.

use anyhow::{Context, Result};
use cpabe_policy::wire::to_wire;
use cpabe_policy::{PolicyExpression, compile_postfix, dropped_groups, parse_wire};

use super::read_model;
use crate::style::{print_labeled, print_warn};

/// Prints the display and wire forms of a JSON model.
pub fn serialize(input: &str) -> Result<()> {
    let expression = read_model(input)?;
    warn_incomplete(&expression);

    let display = cpabe_policy::serialize(&expression);
    print_labeled("display", &display);
    print_labeled("wire", &to_wire(&display));
    Ok(())
}

/// Prints the JSON model of an expression.
pub fn parse(expression: &str, wire: bool) -> Result<()> {
    let model = if wire {
        parse_wire(expression)
    } else {
        cpabe_policy::parse(expression)
    };

    for text in model.literals() {
        print_warn(&format!("Could not decode '{text}'"));
    }

    let json = serde_json::to_string_pretty(&model).context("Failed to encode model")?;
    println!("{json}");
    Ok(())
}

/// Prints the postfix gate program of an expression.
pub fn threshold(expression: &str) -> Result<()> {
    let program = compile_postfix(expression)?;
    println!("{program}");
    Ok(())
}

/// Warns about groups and slots that will not reach the backend.
pub(crate) fn warn_incomplete(expression: &PolicyExpression) {
    for index in dropped_groups(expression) {
        print_warn(&format!("Group {} has no attributes and is skipped", index + 1));
    }
    for text in expression.literals() {
        print_warn(&format!("Could not decode '{text}'"));
    }
}
