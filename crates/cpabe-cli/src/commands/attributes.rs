//! Attribute token commands.

use anyhow::{Result, bail};
use cpabe_policy::normalizer::normalize_with;
use cpabe_policy::{SpacePolicy, to_human_readable, validate_format};

use crate::style::colors::SemanticStyle;
use crate::style::{print_error, print_hint};

/// Normalizes each attribute and prints `input -> token`.
///
/// Every attribute is attempted; the command fails if any was rejected.
pub fn normalize(attributes: &[String], policy: SpacePolicy) -> Result<()> {
    let mut rejected = 0usize;

    for input in attributes {
        match normalize_with(input, policy) {
            Ok(predicate) => {
                println!("{} -> {}", input.muted(), predicate.to_string().code());
            }
            Err(err) => {
                print_error(&err.to_string());
                rejected += 1;
            }
        }
    }

    if rejected > 0 {
        if policy == SpacePolicy::Preserve {
            print_hint("Use category_value, \"category = value\" or \"category >= 30\"");
        }
        bail!("{rejected} of {} attributes rejected", attributes.len());
    }
    Ok(())
}

/// Checks the token shape.
pub fn validate(token: &str) -> Result<()> {
    if validate_format(token) {
        println!("{} {}", token.code(), "is valid".success());
        Ok(())
    } else {
        bail!("'{token}' is not a valid attribute token");
    }
}

pub fn humanize(token: &str) {
    println!("{}", to_human_readable(token));
}
