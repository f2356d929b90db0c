//! rdfvec Extractor - Ontology entity extraction
//!
//! Parses RDF ontology files through `oxrdfio` and selects the
//! namespace-filtered entities that will receive embeddings.
//!
//! Author: hephaex@gmail.com

pub mod entities;
pub mod rdf;

pub use entities::{extract_entities, extract_from_triples, is_entity, SAMPLE_SIZE};
pub use rdf::{detect_format, read_triples};
