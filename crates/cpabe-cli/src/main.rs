//! Command-line tools for CP-ABE access policies.
//!
//! Normalizes typed attributes, builds key generation and encryption
//! payloads, and previews policies the way the CP-ABE backend reads them.
//!
//! # Quick Start
//!
//! ```bash
//! # Turn typed comparisons into canonical tokens
//! cpabe normalize "age >= 30" "department = HR"
//!
//! # Build the key generation payload
//! cpabe keygen-request role_admin "age >= 30"
//!
//! # Rebuild the editor model of a stored policy
//! cpabe parse --wire "(role_admin or role_manager) and age_ge_30"
//! ```

mod commands;
mod style;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// cpabe - build and check attribute-based access policies.
#[derive(Parser)]
#[command(name = "cpabe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory holding cpabe.toml.
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Replace spaces with underscores when an attribute does not parse.
    #[arg(long, global = true)]
    underscore_spaces: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert attributes to canonical tokens ("age >= 30" -> age_ge_30).
    Normalize {
        /// Attributes in comparison syntax or token form.
        #[arg(required = true)]
        attributes: Vec<String>,
    },

    /// Check that a token has the category_value shape.
    Validate {
        /// Token to check.
        token: String,
    },

    /// Render a token for people (age_ge_30 -> "age >= 30").
    Humanize {
        /// Token to render.
        token: String,
    },

    /// Serialize a JSON policy model into display and wire form.
    Serialize {
        /// JSON file with the model, or "-" for stdin.
        input: String,
    },

    /// Parse a policy expression into its JSON model.
    Parse {
        /// Policy expression.
        expression: String,

        /// The expression uses the wire separator ("_").
        #[arg(long)]
        wire: bool,
    },

    /// Build a private-key generation payload.
    KeygenRequest {
        /// Key attributes in comparison syntax or token form.
        #[arg(required = true)]
        attributes: Vec<String>,
    },

    /// Build an encryption payload from a JSON policy model.
    EncryptRequest {
        /// JSON file with the model, or "-" for stdin.
        input: String,
    },

    /// Compile a policy into postfix threshold gates.
    Threshold {
        /// Policy expression, wire or display form.
        expression: String,
    },

    /// List the selectable attribute catalog.
    Catalog,

    /// List stored policies.
    Policies {
        /// JSON file of stored policies (defaults to the configured store).
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, toml, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    // stdout carries payloads; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    let config = commands::load_config(&cli.project, cli.underscore_spaces)?;
    let space_policy = config.normalizer.space_policy;

    match cli.command {
        Commands::Normalize { attributes } => {
            commands::attributes::normalize(&attributes, space_policy)
        }
        Commands::Validate { token } => commands::attributes::validate(&token),
        Commands::Humanize { token } => {
            commands::attributes::humanize(&token);
            Ok(())
        }
        Commands::Serialize { input } => commands::policy::serialize(&input),
        Commands::Parse { expression, wire } => commands::policy::parse(&expression, wire),
        Commands::KeygenRequest { attributes } => {
            commands::request::keygen(&attributes, space_policy)
        }
        Commands::EncryptRequest { input } => commands::request::encrypt(&input),
        Commands::Threshold { expression } => commands::policy::threshold(&expression),
        Commands::Catalog => commands::catalog::list(&config),
        Commands::Policies { file } => {
            let path = file.unwrap_or_else(|| config.store.policies_file.clone());
            commands::catalog::policies(&path)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show { format } => {
                commands::config::show(&cli.project, &config, &format)
            }
        },
    }
}
