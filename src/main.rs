use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use catalog_matcher::observability::logging::init_logging;
use catalog_matcher::{MatchPipeline, MatcherConfig, SourceCatalog, SourceRecord};

#[derive(Parser)]
#[command(name = "catalog-matcher")]
#[command(about = "Reconciles product catalogs from heterogeneous sources into match groups")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match records across the given catalogs and write the groups as JSON
    Reconcile {
        /// Catalog files (JSON array of canonical records), processed in the
        /// given order; the source name is the file stem
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file for the match groups
        #[arg(long, default_value = "results.json")]
        out: PathBuf,
        /// Optional TOML file with thresholds and stop words
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile {
            inputs,
            out,
            config,
        } => {
            let config = match config {
                Some(path) => MatcherConfig::load(&path)?,
                None => MatcherConfig::default(),
            };

            let mut catalogs = Vec::with_capacity(inputs.len());
            for path in &inputs {
                catalogs.push(load_catalog(path)?);
            }

            let outcome = MatchPipeline::new(config).run(&catalogs)?;
            info!(
                "combined by code: {}, unique brands: {}, combined by alias: {}",
                outcome.stats.combined_by_code,
                outcome.stats.unique_brands,
                outcome.stats.combined_by_alias
            );

            fs::write(&out, serde_json::to_string_pretty(&outcome.groups)?)
                .with_context(|| format!("failed to write results to {}", out.display()))?;
            info!(
                "{} match groups written to {}",
                outcome.groups.len(),
                out.display()
            );
        }
    }

    Ok(())
}

/// Thin input adapter: the core only ever sees canonical records.
fn load_catalog(path: &PathBuf) -> anyhow::Result<SourceCatalog> {
    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("source")
        .to_string();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    let records: Vec<SourceRecord> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse catalog file {}", path.display()))?;
    info!("{}: {} records loaded", name, records.len());
    Ok(SourceCatalog { name, records })
}
