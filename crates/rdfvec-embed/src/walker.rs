//! Random walk sampling
//!
//! A walk starts at an entity and follows up to `depth` outgoing hops,
//! recording the predicate and the reached vertex at each hop:
//! `[root, p1, o1, p2, o2, ...]`. Up to `max_walks` distinct walks are
//! kept per entity.

use std::collections::HashSet;

use petgraph::graph::NodeIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rdfvec_core::{Entity, Result};

use crate::graph::KnowledgeGraph;
use crate::{Walk, Walker};

/// Sampling attempts per requested walk before giving up on finding
/// new distinct walks.
const ATTEMPTS_PER_WALK: usize = 4;

/// Uniform random walker over outgoing edges
#[derive(Debug, Clone)]
pub struct RandomWalker {
    depth: usize,
    max_walks: usize,
    seed: Option<u64>,
}

impl RandomWalker {
    pub fn new(depth: usize, max_walks: usize) -> Self {
        Self {
            depth,
            max_walks,
            seed: None,
        }
    }

    /// Fix the RNG seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Distinct walks rooted at `root`
    fn walks_from(&self, graph: &KnowledgeGraph, root: NodeIndex, rng: &mut StdRng) -> Vec<Walk> {
        if self.depth == 0 || graph.out_degree(root) == 0 {
            return vec![vec![graph.name(root).to_string()]];
        }

        let mut seen: HashSet<Walk> = HashSet::new();
        let mut walks = Vec::new();
        let attempts = self.max_walks.saturating_mul(ATTEMPTS_PER_WALK);

        for _ in 0..attempts {
            if walks.len() >= self.max_walks {
                break;
            }

            let walk = self.random_walk(graph, root, rng);
            if seen.insert(walk.clone()) {
                walks.push(walk);
            }
        }

        walks
    }

    fn random_walk(&self, graph: &KnowledgeGraph, root: NodeIndex, rng: &mut StdRng) -> Walk {
        let mut walk = vec![graph.name(root).to_string()];
        let mut current = root;

        for _ in 0..self.depth {
            let degree = graph.out_degree(current);
            if degree == 0 {
                break;
            }

            let pick = rng.gen_range(0..degree);
            let Some((predicate, next)) = graph.hops(current).nth(pick) else {
                break;
            };

            walk.push(predicate.to_string());
            walk.push(graph.name(next).to_string());
            current = next;
        }

        walk
    }
}

impl Walker for RandomWalker {
    fn extract(&self, graph: &KnowledgeGraph, entities: &[Entity]) -> Result<Vec<Walk>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut corpus = Vec::new();
        for entity in entities {
            match graph.index_of(entity.as_str()) {
                Some(root) => corpus.extend(self.walks_from(graph, root, &mut rng)),
                None => corpus.push(vec![entity.to_string()]),
            }
        }

        Ok(corpus)
    }
}
