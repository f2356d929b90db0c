//! Embedding training
//!
//! [`Rdf2VecTransformer`] combines a walker and an embedder and returns
//! one [`EntityEmbedding`] per requested entity, in request order.
//! Entities that never share a walk with another token get a zero vector.
//!
//! Author: hephaex@gmail.com

use std::path::Path;

use tracing::{info, warn};

use rdfvec_core::{Entity, EntityEmbedding, EntitySet, RdfVecError, Result, TrainingConfig};

use crate::graph::KnowledgeGraph;
use crate::walker::RandomWalker;
use crate::word2vec::{Word2Vec, Word2VecConfig};
use crate::{Embedder, Walker};

// ============================================================================
// Transformer
// ============================================================================

/// Walker + embedder pipeline over a single knowledge graph
pub struct Rdf2VecTransformer<E, W> {
    embedder: E,
    walker: W,
}

impl<E: Embedder, W: Walker> Rdf2VecTransformer<E, W> {
    pub fn new(embedder: E, walker: W) -> Self {
        Self { embedder, walker }
    }

    /// Fit on the walks of `entities` and return their vectors
    pub fn fit_transform(
        &mut self,
        graph: &KnowledgeGraph,
        entities: &[Entity],
    ) -> Result<Vec<EntityEmbedding>> {
        if entities.is_empty() {
            return Ok(Vec::new());
        }

        let corpus = self.walker.extract(graph, entities)?;
        info!("Extracted {} walks for {} entities", corpus.len(), entities.len());

        self.embedder.fit(&corpus)?;
        Ok(self.transform(entities))
    }

    /// Vectors for `entities` from the fitted embedder
    pub fn transform(&self, entities: &[Entity]) -> Vec<EntityEmbedding> {
        let dimension = self.embedder.dimension();
        let mut isolated = 0usize;

        let embeddings = entities
            .iter()
            .map(|entity| {
                let vector = self.embedder.vector(entity.as_str()).unwrap_or_else(|| {
                    isolated += 1;
                    vec![0.0; dimension]
                });
                EntityEmbedding::new(entity.clone(), vector)
            })
            .collect();

        if isolated > 0 {
            warn!("{isolated} entities have no walks; using zero vectors");
        }
        embeddings
    }
}

// ============================================================================
// Trainer
// ============================================================================

/// Per-source training entry point
#[derive(Debug, Clone)]
pub struct EmbeddingTrainer {
    config: TrainingConfig,
}

impl EmbeddingTrainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Build a knowledge graph from `graph_source` and train `entities`
    pub fn train(
        &self,
        graph_source: &Path,
        entities: &EntitySet,
        label: &str,
    ) -> Result<Vec<EntityEmbedding>> {
        self.config
            .validate()
            .map_err(|e| RdfVecError::Training(e.to_string()))?;

        info!("Creating KG object for RDF2Vec ({label})...");
        let graph = KnowledgeGraph::from_path(graph_source)?;
        info!("KG created for {label}: {graph}");

        self.train_graph(&graph, entities, label)
    }

    /// Train `entities` on an already-built graph
    pub fn train_graph(
        &self,
        graph: &KnowledgeGraph,
        entities: &EntitySet,
        label: &str,
    ) -> Result<Vec<EntityEmbedding>> {
        let config = &self.config;
        info!(
            "Training embeddings for {} {label} entities. VECTOR_SIZE={}, EPOCHS={}, Walks={}, Depth={}",
            entities.len(),
            config.vector_size,
            config.epochs,
            config.walk_count,
            config.walk_depth
        );

        let walker =
            RandomWalker::new(config.walk_depth, config.walk_count).with_seed(config.seed);
        let embedder = Word2Vec::new(Word2VecConfig::from(config));
        let mut transformer = Rdf2VecTransformer::new(embedder, walker);

        let embeddings = transformer.fit_transform(graph, entities.as_slice())?;

        info!("Training completed for {label}.");
        info!("len({label} embeddings): {}", embeddings.len());
        match embeddings.first() {
            Some(first) => info!("Sample {label} embedding[0]: {:?}", first.vector),
            None => info!("Sample {label} embedding[0]: EMPTY"),
        }

        Ok(embeddings)
    }
}

// ============================================================================
// Tests
// ============================================================================
