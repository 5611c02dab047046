//! Operation layout CLI
//!
//! Loads a normalized API document and prints the layout derived for its
//! operations.
//!
//! Usage:
//!   cargo run --bin operation_cli -- list --document petstore.yaml
//!   cargo run --bin operation_cli -- render --document petstore.yaml \
//!     --operation operation/getPet --show-webhook-verb --format yaml
//!   cargo run --bin operation_cli -- validate --document petstore.yaml
//!
//! Display options come from the YAML file named by `--config` (or
//! `OPERATION_VIEW_CONFIG`). `--path-in-middle-panel <true|false>` and
//! `--show-webhook-verb <true|false>` override the file.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;

use operation_projection::{
    validate, ApiDocument, DisplayConfig, DisplayConfigLoader, LayoutGenerator, OperationGenerator,
    OperationHash,
};

/// Derive documentation layouts for API operations
#[derive(Parser, Debug)]
#[command(name = "operation_cli")]
#[command(about = "Derive documentation layouts for API operations")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List operations in declaration order
    List {
        /// Document file (.yaml, .yml or .json)
        #[arg(long, short = 'd')]
        document: PathBuf,
    },

    /// Print the layout descriptor for one or all operations
    Render {
        /// Document file (.yaml, .yml or .json)
        #[arg(long, short = 'd')]
        document: PathBuf,

        /// Operation hash to render (default: every operation)
        #[arg(long, short = 'o')]
        operation: Option<String>,

        /// Display options file
        #[arg(long, short = 'c', env = "OPERATION_VIEW_CONFIG")]
        config: Option<PathBuf>,

        /// Show the endpoint summary in the main column
        #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
        path_in_middle_panel: Option<bool>,

        /// Append the HTTP verb to webhook badges
        #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
        show_webhook_verb: Option<bool>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Check document integrity before rendering
    Validate {
        /// Document file (.yaml, .yml or .json)
        #[arg(long, short = 'd')]
        document: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,operation_projection=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(?args, "Parsed arguments");

    match args.command {
        Command::List { document } => list(&load_document(&document)?),
        Command::Render {
            document,
            operation,
            config,
            path_in_middle_panel,
            show_webhook_verb,
            format,
        } => {
            let document = load_document(&document)?;
            let loader = config.map(DisplayConfigLoader::new).unwrap_or_default();
            let file = loader.load().with_context(|| match loader.path() {
                Some(path) => format!("Failed to load display config {}", path.display()),
                None => "Failed to load display config".to_string(),
            })?;
            let display = apply_overrides(file, path_in_middle_panel, show_webhook_verb);

            render(&document, operation.as_deref(), &display, format)
        }
        Command::Validate { document } => check(&load_document(&document)?),
    }
}

/// Command-line values win over the config file.
fn apply_overrides(
    mut config: DisplayConfig,
    path_in_middle_panel: Option<bool>,
    show_webhook_verb: Option<bool>,
) -> DisplayConfig {
    if let Some(enabled) = path_in_middle_panel {
        config.path_in_middle_panel = enabled;
    }
    if let Some(enabled) = show_webhook_verb {
        config.show_webhook_verb = enabled;
    }
    config
}

fn load_document(path: &Path) -> Result<ApiDocument> {
    ApiDocument::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn list(document: &ApiDocument) -> Result<()> {
    if let Some(title) = &document.title {
        println!("{}", title);
    }
    for operation in document.operations() {
        let kind = if operation.is_webhook {
            "webhook"
        } else {
            "endpoint"
        };
        println!(
            "{:<8} {:<7} {:<40} {}",
            kind,
            operation
                .http_verb
                .as_deref()
                .unwrap_or("-")
                .to_uppercase(),
            operation.operation_hash,
            operation.name
        );
    }
    Ok(())
}

fn render(
    document: &ApiDocument,
    operation: Option<&str>,
    config: &DisplayConfig,
    format: OutputFormat,
) -> Result<()> {
    let generator = OperationGenerator::new();

    let layouts = match operation {
        Some(hash) => {
            let hash = OperationHash::new(hash);
            let node = document
                .operation(&hash)
                .with_context(|| format!("No operation with hash '{}'", hash))?;
            vec![generator.generate(node, config)]
        }
        None => document
            .operations()
            .map(|node| generator.generate(node, config))
            .collect(),
    };

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&layouts)?,
        OutputFormat::Yaml => serde_yaml::to_string(&layouts)?,
    };
    println!("{}", output);
    Ok(())
}

fn check(document: &ApiDocument) -> Result<()> {
    let result = validate(document);

    for warning in &result.warnings {
        println!("warning [{}]: {}", warning.code(), warning);
    }
    for error in &result.errors {
        println!("error   [{}]: {}", error.code(), error);
    }

    if !result.is_valid() {
        bail!("{} blocking validation error(s)", result.errors.len());
    }

    println!(
        "OK: {} operations, {} warning(s)",
        document.operations.len(),
        result.warnings.len()
    );
    Ok(())
}
