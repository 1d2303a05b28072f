//! Backend payload commands.

use anyhow::{Context, Result, bail};
use cpabe_policy::wire::{EncryptionRequest, KeyGenerationRequest};
use cpabe_policy::{KeyAttributeSet, PolicyError, SpacePolicy};

use super::policy::warn_incomplete;
use super::read_model;
use crate::style::{print_error, print_warn};

/// Prints the key generation payload for the given attributes.
///
/// Duplicates are reported and skipped. Any attribute that fails to
/// normalize aborts the request.
pub fn keygen(attributes: &[String], policy: SpacePolicy) -> Result<()> {
    let mut set = KeyAttributeSet::new();
    let mut rejected = 0usize;

    for input in attributes {
        match set.insert_text(input, policy) {
            Ok(_) => {}
            Err(PolicyError::DuplicateAttribute { token }) => {
                print_warn(&format!("'{token}' is already in the key, skipped"));
            }
            Err(err) => {
                print_error(&err.to_string());
                rejected += 1;
            }
        }
    }

    if rejected > 0 {
        bail!("{rejected} of {} attributes rejected", attributes.len());
    }

    let request = KeyGenerationRequest::from_set(&set)?;
    let json = serde_json::to_string_pretty(&request).context("Failed to encode request")?;
    println!("{json}");
    Ok(())
}

/// Prints the encryption payload for a JSON policy model.
pub fn encrypt(input: &str) -> Result<()> {
    let expression = read_model(input)?;
    warn_incomplete(&expression);

    let request = EncryptionRequest::from_expression(&expression)?;
    let json = serde_json::to_string_pretty(&request).context("Failed to encode request")?;
    println!("{json}");
    Ok(())
}
