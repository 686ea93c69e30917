mod inspect;
mod stats;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ivypick_core::Platform;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ivypick")]
#[command(about = "Picking-list statistics for Ivy House order exports")]
struct Cli {
    /// Canonical catalog file (overrides IVYPICK_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute picking statistics from adapter output files
    Stats {
        /// JSON files, each an array of raw picking lines
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Manual override file (overrides IVYPICK_OVERRIDES_PATH)
        #[arg(long)]
        overrides: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
        /// Also write the report to the output directory
        #[arg(long)]
        write: bool,
    },
    /// Show the canonical spelling of a product name
    Normalize { name: String },
    /// Run the mapping rules for a single line
    Map {
        name: String,
        #[arg(long, default_value = "")]
        spec: String,
        #[arg(long, default_value = "1")]
        quantity: u32,
        /// momo, official, shopee or orangepoint
        #[arg(long, default_value = "momo")]
        platform: Platform,
    },
    /// List the canonical catalog in report order
    Catalog,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("ivypick: no command given; see `ivypick --help`");
        return Ok(());
    };

    let config = ivypick_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let catalog_path = cli.catalog.unwrap_or_else(|| config.catalog_path.clone());
    let catalog = ivypick_core::load_catalog(&catalog_path)
        .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
    tracing::debug!(path = %catalog_path.display(), products = catalog.len(), "catalog loaded");

    match command {
        Commands::Stats {
            inputs,
            overrides,
            format,
            write,
        } => {
            let overrides_path = overrides.or_else(|| config.overrides_path.clone());
            stats::run_stats(
                &config,
                &catalog,
                &inputs,
                overrides_path.as_deref(),
                format,
                write,
            )
        }
        Commands::Normalize { name } => {
            inspect::run_normalize(&catalog, &name);
            Ok(())
        }
        Commands::Map {
            name,
            spec,
            quantity,
            platform,
        } => inspect::run_map(&catalog, &name, &spec, quantity, platform),
        Commands::Catalog => {
            inspect::run_catalog(&catalog);
            Ok(())
        }
    }
}
