//! Catalog and policy store listings.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cpabe_config::CpabeConfig;
use cpabe_policy::wire::PolicyRecord;

use crate::style::colors::SemanticStyle;
use crate::style::{print_hint, print_table};

/// Prints the configured catalog grouped by category.
pub fn list(config: &CpabeConfig) -> Result<()> {
    let catalog = config.catalog().context("Invalid [catalog] configuration")?;

    let rows: Vec<Vec<String>> = catalog
        .by_category()
        .into_iter()
        .map(|(category, predicates)| {
            let values: Vec<String> = predicates.iter().map(|p| p.display_form()).collect();
            vec![category.to_string(), values.join(", ")]
        })
        .collect();

    print_table(&["Category", "Attributes"], &rows);
    println!("{}", format!("({} attributes)", catalog.len()).muted());
    Ok(())
}

/// Prints stored policies with their display expression.
pub fn policies(path: &Path) -> Result<()> {
    if !path.exists() {
        println!("{}", "No stored policies.".muted());
        print_hint(&format!("Policies are read from {}", path.display()));
        return Ok(());
    }

    let json =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<PolicyRecord> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid policy store {}", path.display()))?;

    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            vec![
                record.name.clone(),
                record.description.clone().unwrap_or_default(),
                record.display_expression(),
            ]
        })
        .collect();

    print_table(&["Name", "Description", "Policy"], &rows);
    Ok(())
}
