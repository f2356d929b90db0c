//! rdfvec CLI - embedding pipeline
//!
//! Checks the configured ontology files, extracts entities, trains
//! RDF2Vec embeddings per source and writes one merged JSON mapping.
//!
//! Author: hephaex@gmail.com

pub mod logging;
pub mod output;
pub mod paths;
pub mod pipeline;

pub use logging::{init_logging, AppendLog};
pub use output::{read_json, write_json};
pub use paths::check_path;
pub use pipeline::{Pipeline, RunSummary, SourceSummary, Stage};
