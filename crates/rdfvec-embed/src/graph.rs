//! Knowledge graph handle
//!
//! Directed graph over the node texts of an RDF document. Every triple
//! becomes an edge `subject -> object` labelled with the predicate IRI.
//! Literals and blank nodes are vertices like any other node.

use std::collections::HashMap;
use std::path::Path;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use rdfvec_core::{RdfTriple, Result};
use rdfvec_extractor::read_triples;

/// Local, in-memory knowledge graph
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<String, String>,
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from parsed triples
    pub fn from_triples<'a>(triples: impl IntoIterator<Item = &'a RdfTriple>) -> Self {
        let mut kg = Self::new();
        for triple in triples {
            kg.add_triple(triple);
        }
        kg
    }

    /// Parse an RDF file into a graph
    pub fn from_path(path: &Path) -> Result<Self> {
        let triples = read_triples(path)?;
        Ok(Self::from_triples(&triples))
    }

    /// Insert a triple; repeated triples are stored once
    pub fn add_triple(&mut self, triple: &RdfTriple) {
        let subject = self.vertex(triple.subject.key());
        let object = self.vertex(triple.object.key());

        let exists = self
            .graph
            .edges_connecting(subject, object)
            .any(|edge| edge.weight() == &triple.predicate);
        if !exists {
            self.graph
                .add_edge(subject, object, triple.predicate.clone());
        }
    }

    fn vertex(&mut self, name: String) -> NodeIndex {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.index.insert(name, idx);
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Vertex text
    pub fn name(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }

    /// Outgoing `(predicate, target)` hops of a vertex
    pub fn hops(&self, idx: NodeIndex) -> impl Iterator<Item = (&str, NodeIndex)> + '_ {
        self.graph
            .edges(idx)
            .map(|edge| (edge.weight().as_str(), edge.target()))
    }

    pub fn out_degree(&self, idx: NodeIndex) -> usize {
        self.graph.edges(idx).count()
    }
}

impl std::fmt::Display for KnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "KnowledgeGraph(vertices={}, edges={})",
            self.node_count(),
            self.edge_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdfvec_core::RdfNode;

    fn triple(s: &str, p: &str, o: RdfNode) -> RdfTriple {
        RdfTriple::new(RdfNode::Iri(s.to_string()), p, o)
    }

    #[test]
    fn test_build_graph() {
        let triples = vec![
            triple("http://x/A", "http://x/sub", RdfNode::Iri("http://x/B".into())),
            triple("http://x/A", "http://x/sub", RdfNode::Iri("http://x/B".into())),
            triple("http://x/A", "http://x/label", RdfNode::Literal("A".into())),
            triple("http://x/B", "http://x/sub", RdfNode::Blank("b1".into())),
        ];
        let kg = KnowledgeGraph::from_triples(&triples);

        assert_eq!(kg.node_count(), 4);
        assert_eq!(kg.edge_count(), 3);
        assert!(kg.contains("_:b1"));

        let a = kg.index_of("http://x/A").unwrap();
        assert_eq!(kg.out_degree(a), 2);
        let mut hops: Vec<(&str, &str)> = kg.hops(a).map(|(p, t)| (p, kg.name(t))).collect();
        hops.sort();
        assert_eq!(hops, vec![("http://x/label", "A"), ("http://x/sub", "http://x/B")]);
    }

    #[test]
    fn test_leaf_nodes() {
        let kg = KnowledgeGraph::from_triples(&[triple(
            "http://x/A",
            "http://x/sub",
            RdfNode::Iri("http://x/B".into()),
        )]);

        assert_eq!(kg.out_degree(kg.index_of("http://x/A").unwrap()), 1);
        assert_eq!(kg.out_degree(kg.index_of("http://x/B").unwrap()), 0);
        assert!(kg.index_of("http://x/missing").is_none());
        assert_eq!(kg.to_string(), "KnowledgeGraph(vertices=2, edges=1)");
    }
}
