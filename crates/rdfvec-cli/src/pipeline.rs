//! Run orchestration
//!
//! Sequences path checks, entity extraction, training and the JSON write
//! for every configured source. Sources are handled one after another in
//! configuration order; a failure in any stage aborts the run.
//!
//! Author: hephaex@gmail.com

use std::backtrace::Backtrace;
use std::path::PathBuf;

use tracing::{error, info, warn};

use rdfvec_core::{
    AppConfig, Entity, EntitySet, OutputMapping, RdfVecError, Result, SourceConfig,
};
use rdfvec_embed::EmbeddingTrainer;
use rdfvec_extractor::{extract_entities, SAMPLE_SIZE};

use crate::output::write_json;
use crate::paths::check_path;

/// Progress of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    PathsVerified,
    EntitiesExtracted,
    Trained,
    Written,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::PathsVerified => write!(f, "paths-verified"),
            Self::EntitiesExtracted => write!(f, "entities-extracted"),
            Self::Trained => write!(f, "trained"),
            Self::Written => write!(f, "written"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Per-source counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSummary {
    pub label: String,
    pub entities: usize,
    pub embeddings: usize,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub sources: Vec<SourceSummary>,
    pub total_keys: usize,
    /// Keys overwritten by a later source
    pub collisions: Vec<String>,
    pub output_path: PathBuf,
}

/// Single-threaded GO + HP embedding run
pub struct Pipeline {
    config: AppConfig,
    stage: Stage,
    backtrace: Option<Backtrace>,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            stage: Stage::Init,
            backtrace: None,
        }
    }

    /// Last stage reached; on failure, the stage the error happened after
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Stack captured where the last failure was raised
    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    fn advance(&mut self, stage: Stage) {
        self.stage = stage;
    }

    fn fail(&mut self, err: impl Into<RdfVecError>) -> RdfVecError {
        self.backtrace = Some(Backtrace::force_capture());
        err.into()
    }

    /// Run, logging any failure through [`Pipeline::report_failure`]
    pub fn run_logged(&mut self) -> Option<RunSummary> {
        match self.run() {
            Ok(summary) => Some(summary),
            Err(err) => {
                self.report_failure(&err);
                None
            }
        }
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        self.advance(Stage::Init);
        self.backtrace = None;
        self.config.validate().map_err(|e| self.fail(e))?;

        let sources = self.config.sources.clone();
        let labels: Vec<&str> = sources.iter().map(|s| s.label.as_str()).collect();

        let cwd = std::env::current_dir().map_err(|e| self.fail(e))?;
        info!("==== Current working directory: {} ====", cwd.display());
        info!("==== Checking input file existence... ====");
        for source in &sources {
            check_path(&source.path).map_err(|e| self.fail(e))?;
        }
        std::fs::create_dir_all(&self.config.output.dir).map_err(|e| self.fail(e))?;
        self.advance(Stage::PathsVerified);

        info!(
            "==== RDF2Vec Embedding Run Started ({}) ====",
            labels.join(" + ")
        );

        let mut extracted: Vec<(&SourceConfig, EntitySet)> = Vec::with_capacity(sources.len());
        for source in &sources {
            info!("Extracting all entities from {} ontology...", source.label);
            let entities =
                extract_entities(&source.path, &source.prefix).map_err(|e| self.fail(e))?;
            extracted.push((source, entities));
        }
        for (source, entities) in &extracted {
            info!("Total {} entities: {}", source.label, entities.len());
            info!(
                "First {SAMPLE_SIZE} {} entities: {:?}",
                source.label,
                entities
                    .sample(SAMPLE_SIZE)
                    .iter()
                    .map(Entity::as_str)
                    .collect::<Vec<_>>()
            );
        }
        self.advance(Stage::EntitiesExtracted);

        let trainer = EmbeddingTrainer::new(self.config.training.clone());
        let mut trained = Vec::with_capacity(extracted.len());
        for (source, entities) in &extracted {
            let embeddings = trainer
                .train(&source.path, entities, &source.label)
                .map_err(|e| self.fail(e))?;
            trained.push((*source, entities.len(), embeddings));
        }
        self.advance(Stage::Trained);

        let policy = self.config.merge.policy;
        let mut mapping = OutputMapping::new();
        let mut collisions = Vec::new();
        let mut summaries = Vec::with_capacity(trained.len());
        for (source, entity_count, embeddings) in trained {
            summaries.push(SourceSummary {
                label: source.label.clone(),
                entities: entity_count,
                embeddings: embeddings.len(),
            });

            let overwritten = mapping
                .extend_from(embeddings, policy)
                .map_err(|e| self.fail(e))?;
            if !overwritten.is_empty() {
                warn!(
                    "{} entities from {} overwrote earlier vectors",
                    overwritten.len(),
                    source.label
                );
            }
            collisions.extend(overwritten);
        }
        info!(
            "Output dictionary prepared, keys: {:?}..., total: {}",
            mapping.keys().take(SAMPLE_SIZE).collect::<Vec<_>>(),
            mapping.len()
        );

        let output_path = self.config.output.path();
        write_json(&mapping, &output_path).map_err(|e| self.fail(e))?;
        info!("Embeddings saved to {}", output_path.display());
        self.advance(Stage::Written);

        info!("==== Run Finished SUCCESSFULLY ====");
        self.advance(Stage::Done);

        Ok(RunSummary {
            sources: summaries,
            total_keys: mapping.len(),
            collisions,
            output_path,
        })
    }

    /// Log a failed run: summary line, cause chain, then the stack
    /// captured at the failing stage.
    pub fn report_failure(&self, err: &RdfVecError) {
        error!("ERROR: run failed after stage '{}': {err}", self.stage);

        let mut source = std::error::Error::source(err);
        while let Some(cause) = source {
            error!("Caused by: {cause}");
            source = cause.source();
        }

        match &self.backtrace {
            Some(trace) => error!("Stack trace:\n{trace}"),
            None => error!("Stack trace:\n{}", Backtrace::force_capture()),
        }
    }
}
