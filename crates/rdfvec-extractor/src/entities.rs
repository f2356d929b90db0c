//! Ontology entity extraction
//!
//! Selects the namespace-filtered IRIs that appear in subject or object
//! position of a graph. Predicates, literals and blank nodes never match.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use rdfvec_core::{Entity, EntitySet, RdfNode, RdfTriple, Result};

use crate::rdf::read_triples;

/// Number of entities echoed in log lines
pub const SAMPLE_SIZE: usize = 5;

/// Check whether a node is an entity IRI for `prefix`
pub fn is_entity(node: &RdfNode, prefix: &str) -> bool {
    node.as_iri()
        .is_some_and(|iri| iri.starts_with("http") && iri.contains(prefix))
}

/// Extract entities from already-parsed triples
pub fn extract_from_triples<'a, I>(triples: I, prefix: &str) -> EntitySet
where
    I: IntoIterator<Item = &'a RdfTriple>,
{
    let mut seen: HashSet<&str> = HashSet::new();

    for triple in triples {
        for node in [&triple.subject, &triple.object] {
            if is_entity(node, prefix) {
                if let Some(iri) = node.as_iri() {
                    seen.insert(iri);
                }
            }
        }
    }

    EntitySet::from_unsorted(seen.into_iter().map(Entity::from))
}

/// Parse `path` and extract the entities matching `prefix`
pub fn extract_entities(path: &Path, prefix: &str) -> Result<EntitySet> {
    let triples = read_triples(path)?;
    info!(
        "Parsed {} for entity extraction, triples: {}",
        path.display(),
        triples.len()
    );

    let entities = extract_from_triples(&triples, prefix);
    info!("Extracted {} unique entities from {prefix}", entities.len());
    info!(
        "Sample extracted {prefix} entities: {:?}",
        entities
            .sample(SAMPLE_SIZE)
            .iter()
            .map(Entity::as_str)
            .collect::<Vec<_>>()
    );

    Ok(entities)
}
