//! rdfvec Embed - RDF2Vec graph embeddings
//!
//! Random walks over a knowledge graph are used as sentences for a
//! skip-gram word2vec model; the vector of an entity is the vector of
//! its token.
//!
//! - [`graph::KnowledgeGraph`]: local graph built from an RDF file
//! - [`walker::RandomWalker`]: walk sampling strategy
//! - [`word2vec::Word2Vec`]: embedding model
//! - [`trainer::Rdf2VecTransformer`] / [`trainer::EmbeddingTrainer`]:
//!   wiring and the per-source training entry point
//!
//! Author: hephaex@gmail.com

use rdfvec_core::{Entity, Result};

pub mod graph;
pub mod trainer;
pub mod walker;
pub mod word2vec;

pub use graph::KnowledgeGraph;
pub use trainer::{EmbeddingTrainer, Rdf2VecTransformer};
pub use walker::RandomWalker;
pub use word2vec::{Word2Vec, Word2VecConfig};

/// A walk: root entity followed by alternating predicate and vertex tokens
pub type Walk = Vec<String>;

/// Trait for walk sampling strategies
pub trait Walker {
    /// Sample walks for each entity, in entity order
    fn extract(&self, graph: &KnowledgeGraph, entities: &[Entity]) -> Result<Vec<Walk>>;
}

/// Trait for models that learn token vectors from a walk corpus
pub trait Embedder {
    /// Train on the corpus, replacing any previous state
    fn fit(&mut self, corpus: &[Walk]) -> Result<()>;

    /// Vector of a token that took part in at least one training pair
    fn vector(&self, token: &str) -> Option<Vec<f32>>;

    /// Embedding dimension
    fn dimension(&self) -> usize;
}
