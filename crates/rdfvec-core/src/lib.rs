//! rdfvec Core - Domain models, errors, and shared types
//!
//! This crate defines the core abstractions used throughout rdfvec:
//! - RDF triples as owned values (subject, predicate, object)
//! - Entities and entity sets extracted from ontologies
//! - Entity embeddings and the merged output mapping
//! - Common error types
//! - Configuration management
//!
//! Author: hephaex@gmail.com

pub mod config;

pub use config::{
    AppConfig, ConfigError, ConflictPolicy, LoggingConfig, MergeConfig, OutputConfig,
    SourceConfig, TrainingConfig,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for rdfvec operations
#[derive(Error, Debug)]
pub enum RdfVecError {
    #[error("File not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("Failed to parse RDF file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Training error: {0}")]
    Training(String),

    #[error("Failed to write embeddings to {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Entity present in more than one source: {entity}")]
    EntityConflict { entity: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RdfVecError>;

// ============================================================================
// RDF Models
// ============================================================================

/// A node in subject or object position of an RDF triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RdfNode {
    /// Named node (IRI)
    Iri(String),
    /// Blank node identifier, without the `_:` prefix
    Blank(String),
    /// Literal lexical value
    Literal(String),
}

impl RdfNode {
    /// Return the IRI text if this node is a named node
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Text used for this node as a graph vertex
    pub fn key(&self) -> String {
        match self {
            Self::Iri(iri) => iri.clone(),
            Self::Blank(id) => format!("_:{id}"),
            Self::Literal(value) => value.clone(),
        }
    }
}

/// An owned subject-predicate-object triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RdfTriple {
    pub subject: RdfNode,
    pub predicate: String,
    pub object: RdfNode,
}

impl RdfTriple {
    pub fn new(subject: RdfNode, predicate: impl Into<String>, object: RdfNode) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

// ============================================================================
// Entities
// ============================================================================

/// An ontology node identified by its URI
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(String);

impl Entity {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Entity {
    fn from(uri: &str) -> Self {
        Self(uri.to_string())
    }
}

impl From<String> for Entity {
    fn from(uri: String) -> Self {
        Self(uri)
    }
}

/// Unique entities extracted from one ontology source, in sorted order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySet {
    entities: Vec<Entity>,
}

impl EntitySet {
    /// Build a set from any iterator; duplicates are dropped and the
    /// result is sorted by URI.
    pub fn from_unsorted(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut entities: Vec<Entity> = entities.into_iter().collect();
        entities.sort();
        entities.dedup();
        Self { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.entities
            .binary_search_by(|e| e.as_str().cmp(uri))
            .is_ok()
    }

    /// First `n` entities, for log output
    pub fn sample(&self, n: usize) -> &[Entity] {
        &self.entities[..n.min(self.entities.len())]
    }
}

impl<'a> IntoIterator for &'a EntitySet {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

// ============================================================================
// Embeddings
// ============================================================================

/// An entity paired with its trained vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityEmbedding {
    pub entity: Entity,
    pub vector: Vec<f32>,
}

impl EntityEmbedding {
    pub fn new(entity: Entity, vector: Vec<f32>) -> Self {
        Self { entity, vector }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Merged entity URI to vector mapping written as the final JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputMapping(BTreeMap<String, Vec<f32>>);

impl OutputMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge embeddings from one source.
    ///
    /// Returns the keys that were already present. Under
    /// [`ConflictPolicy::LastWriteWins`] they are overwritten; under
    /// [`ConflictPolicy::Reject`] the first collision aborts the merge
    /// before anything is inserted.
    pub fn extend_from(
        &mut self,
        embeddings: impl IntoIterator<Item = EntityEmbedding>,
        policy: ConflictPolicy,
    ) -> Result<Vec<String>> {
        let embeddings: Vec<EntityEmbedding> = embeddings.into_iter().collect();

        if policy == ConflictPolicy::Reject {
            if let Some(existing) = embeddings
                .iter()
                .find(|e| self.0.contains_key(e.entity.as_str()))
            {
                return Err(RdfVecError::EntityConflict {
                    entity: existing.entity.to_string(),
                });
            }
        }

        let mut overwritten = Vec::new();
        for embedding in embeddings {
            let key = embedding.entity.into_string();
            if self.0.insert(key.clone(), embedding.vector).is_some() {
                overwritten.push(key);
            }
        }
        Ok(overwritten)
    }

    pub fn insert(&mut self, entity: impl Into<String>, vector: Vec<f32>) -> Option<Vec<f32>> {
        self.0.insert(entity.into(), vector)
    }

    pub fn get(&self, entity: &str) -> Option<&Vec<f32>> {
        self.0.get(entity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<f32>)> {
        self.0.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn embedding(uri: &str, value: f32) -> EntityEmbedding {
        EntityEmbedding::new(Entity::new(uri), vec![value; 3])
    }

    #[test]
    fn test_entity_set_sorted_and_unique() {
        let set = EntitySet::from_unsorted(vec![
            Entity::new("http://x.org/GO_2"),
            Entity::new("http://x.org/GO_1"),
            Entity::new("http://x.org/GO_2"),
        ]);

        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].as_str(), "http://x.org/GO_1");
        assert!(set.contains("http://x.org/GO_2"));
        assert!(!set.contains("http://x.org/GO_3"));
        assert_eq!(set.sample(5).len(), 2);
    }

    #[test]
    fn test_rdf_node_key() {
        assert_eq!(RdfNode::Iri("http://a".into()).key(), "http://a");
        assert_eq!(RdfNode::Blank("b0".into()).key(), "_:b0");
        assert_eq!(RdfNode::Literal("text".into()).as_iri(), None);
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut mapping = OutputMapping::new();
        mapping
            .extend_from(
                vec![embedding("http://x/A", 1.0), embedding("http://x/B", 1.0)],
                ConflictPolicy::LastWriteWins,
            )
            .unwrap();
        let overwritten = mapping
            .extend_from(vec![embedding("http://x/B", 2.0)], ConflictPolicy::LastWriteWins)
            .unwrap();

        assert_eq!(overwritten, vec!["http://x/B".to_string()]);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("http://x/B"), Some(&vec![2.0; 3]));
    }

    #[test]
    fn test_merge_reject_leaves_mapping_untouched() {
        let mut mapping = OutputMapping::new();
        mapping
            .extend_from(vec![embedding("http://x/A", 1.0)], ConflictPolicy::Reject)
            .unwrap();

        let err = mapping
            .extend_from(
                vec![embedding("http://x/C", 2.0), embedding("http://x/A", 2.0)],
                ConflictPolicy::Reject,
            )
            .unwrap_err();

        assert!(matches!(err, RdfVecError::EntityConflict { ref entity } if entity == "http://x/A"));
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("http://x/A"), Some(&vec![1.0; 3]));
    }

    #[test]
    fn test_mapping_serializes_as_plain_object() {
        let mut mapping = OutputMapping::new();
        mapping.insert("http://x/A", vec![0.5, -1.0]);

        let json = serde_json::to_value(&mapping).unwrap();
        assert_eq!(json, serde_json::json!({ "http://x/A": [0.5, -1.0] }));
    }

    #[test]
    fn test_missing_file_message() {
        let err = RdfVecError::MissingInputFile {
            path: PathBuf::from("/tmp/nope.owl"),
        };
        assert_eq!(err.to_string(), "File not found: /tmp/nope.owl");
    }
}
