//! rdfvec CLI - Command-line interface
//!
//! Usage:
//!   rdfvec run [--config rdfvec.toml] [--go-file <path>] [--hp-file <path>]
//!   rdfvec extract <file> --prefix GO_
//!   rdfvec inspect <embeddings.json>
//!
//! Author: hephaex@gmail.com

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::error;

use rdfvec_cli::{init_logging, read_json, Pipeline};
use rdfvec_core::{AppConfig, ConflictPolicy, LoggingConfig};
use rdfvec_extractor::extract_entities;

#[derive(Parser)]
#[command(name = "rdfvec")]
#[command(about = "RDF2Vec embeddings for ontology entities")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities from every source, train embeddings, write JSON
    Run(RunArgs),
    /// Print the entities of one RDF file matching a prefix
    Extract {
        /// RDF file
        file: PathBuf,
        /// Substring entity URIs must contain
        #[arg(long)]
        prefix: String,
    },
    /// Summarize an embeddings JSON file
    Inspect {
        /// JSON file written by `run`
        file: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Gene Ontology file
    #[arg(long)]
    go_file: Option<PathBuf>,
    /// Human Phenotype Ontology file
    #[arg(long)]
    hp_file: Option<PathBuf>,
    /// Output directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Embedding dimensionality
    #[arg(long)]
    vector_size: Option<usize>,
    /// Training epochs
    #[arg(long)]
    epochs: Option<usize>,
    /// Maximum hops per walk
    #[arg(long)]
    walk_depth: Option<usize>,
    /// Maximum walks per entity
    #[arg(long)]
    walk_count: Option<usize>,
    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Fail when an entity appears in more than one source
    #[arg(long)]
    strict_merge: bool,
}

impl RunArgs {
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        let mut config = config.with_env_override()?;

        if let Some(path) = &self.go_file {
            config.source_or_insert("GO", "GO_").path = path.clone();
        }
        if let Some(path) = &self.hp_file {
            config.source_or_insert("HP", "HP_").path = path.clone();
        }
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
        if let Some(value) = self.vector_size {
            config.training.vector_size = value;
        }
        if let Some(value) = self.epochs {
            config.training.epochs = value;
        }
        if let Some(value) = self.walk_depth {
            config.training.walk_depth = value;
        }
        if let Some(value) = self.walk_count {
            config.training.walk_count = value;
        }
        if self.seed.is_some() {
            config.training.seed = self.seed;
        }
        if self.strict_merge {
            config.merge.policy = ConflictPolicy::Reject;
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Extract { file, prefix } => {
            init_logging(&LoggingConfig::default()).context("Failed to open log file")?;
            let entities = extract_entities(&file, &prefix)?;
            for entity in &entities {
                println!("{entity}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Inspect { file } => {
            let mapping = read_json(&file)?;
            let dimension = mapping.iter().next().map_or(0, |(_, v)| v.len());
            println!("{}: {} entities, dimension {}", file.display(), mapping.len(), dimension);
            for key in mapping.keys().take(5) {
                println!("  {key}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let config = args.load_config();

    let logging = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    init_logging(&logging)
        .with_context(|| format!("Failed to open log file {}", logging.file.display()))?;

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!("ERROR: invalid configuration: {err:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut pipeline = Pipeline::new(config);
    match pipeline.run_logged() {
        Some(summary) => {
            for source in &summary.sources {
                println!(
                    "{}: {} entities, {} embeddings",
                    source.label, source.entities, source.embeddings
                );
            }
            println!(
                "{} keys written to {}",
                summary.total_keys,
                summary.output_path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::FAILURE),
    }
}
