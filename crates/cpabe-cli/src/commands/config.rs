//! Configuration management commands.

use std::path::Path;

use anyhow::{Result, bail};
use cpabe_config::{ConfigLoader, CpabeConfig, Paths};

use crate::style::colors::SemanticStyle;
use crate::style::{print_hint, print_labeled, print_spacer};

/// Show the effective configuration.
pub fn show(project: &Path, config: &CpabeConfig, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        "toml" => {
            println!("{}", config.to_toml()?);
        }
        "text" => {
            println!("{}", "cpabe Configuration".header());
            print_spacer();

            println!("Project:");
            print_labeled("Name", &config.project.name);
            print_spacer();

            println!("Normalizer:");
            print_labeled(
                "Space policy",
                &format!("{:?}", config.normalizer.space_policy),
            );
            print_spacer();

            println!("Catalog:");
            let source = if config.catalog.attributes.is_empty() {
                "built-in".to_string()
            } else {
                format!("{} configured attributes", config.catalog.attributes.len())
            };
            print_labeled("Attributes", &source);
            print_spacer();

            println!("Store:");
            print_labeled(
                "Policies file",
                &config.store.policies_file.display().to_string(),
            );
            print_spacer();

            println!("Sources:");
            let layers = ConfigLoader::new().with_project_dir(project).layers();
            if layers.is_empty() {
                print_labeled("Files", "none");
            }
            for layer in &layers {
                print_labeled("File", &layer.display().to_string());
            }

            if !Paths::is_initialized(project) {
                print_spacer();
                print_hint(&format!(
                    "No cpabe.toml in {}, showing defaults",
                    project.display()
                ));
            }
        }
        other => bail!("Unknown format '{other}' (expected text, toml or json)"),
    }

    Ok(())
}
