//! Skip-gram word2vec with negative sampling
//!
//! Treats each walk as a sentence. Every token of the corpus enters the
//! vocabulary (no minimum count), but only tokens that share a walk with
//! at least one other token get a vector. Input vectors are initialized uniformly
//! in `[-0.5 / dim, 0.5 / dim)` and output vectors at zero; the learning
//! rate decays linearly from `learning_rate` to `min_learning_rate` over
//! all epochs.

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use rdfvec_core::{RdfVecError, Result, TrainingConfig};

use crate::{Embedder, Walk};

/// Dot products beyond this magnitude saturate the sigmoid
const MAX_EXP: f32 = 6.0;

/// Exponent applied to token counts for the negative sampling table
const NEGATIVE_POWER: f64 = 0.75;

/// Word2vec hyperparameters
#[derive(Debug, Clone, PartialEq)]
pub struct Word2VecConfig {
    pub vector_size: usize,
    pub epochs: usize,
    pub window: usize,
    pub negative: usize,
    pub learning_rate: f32,
    pub min_learning_rate: f32,
    pub seed: Option<u64>,
}

impl From<&TrainingConfig> for Word2VecConfig {
    fn from(config: &TrainingConfig) -> Self {
        Self {
            vector_size: config.vector_size,
            epochs: config.epochs,
            window: config.window,
            negative: config.negative,
            learning_rate: config.learning_rate,
            min_learning_rate: config.min_learning_rate,
            seed: config.seed,
        }
    }
}

impl Default for Word2VecConfig {
    fn default() -> Self {
        Self::from(&TrainingConfig::default())
    }
}

/// Skip-gram model
pub struct Word2Vec {
    config: Word2VecConfig,
    vocab: HashMap<String, usize>,
    counts: Vec<u64>,
    trained: Vec<bool>,
    syn0: Array2<f32>,
    syn1neg: Array2<f32>,
}

impl Word2Vec {
    pub fn new(config: Word2VecConfig) -> Self {
        Self {
            syn0: Array2::zeros((0, config.vector_size)),
            syn1neg: Array2::zeros((0, config.vector_size)),
            config,
            vocab: HashMap::new(),
            counts: Vec::new(),
            trained: Vec::new(),
        }
    }

    pub fn vocab_len(&self) -> usize {
        self.vocab.len()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vocab.contains_key(token)
    }

    fn build_vocab(&mut self, corpus: &[Walk]) {
        self.vocab.clear();
        self.counts.clear();
        self.trained.clear();

        for walk in corpus {
            for token in walk {
                match self.vocab.get(token) {
                    Some(&idx) => self.counts[idx] += 1,
                    None => {
                        self.vocab.insert(token.clone(), self.counts.len());
                        self.counts.push(1);
                    }
                }
            }
        }
    }

    fn update_pair(
        &mut self,
        input: usize,
        output: usize,
        alpha: f32,
        table: &WeightedIndex<f64>,
        rng: &mut StdRng,
    ) {
        let mut neu1e = Array1::<f32>::zeros(self.config.vector_size);

        for d in 0..=self.config.negative {
            let (target, label) = if d == 0 {
                (output, 1.0)
            } else {
                let sampled = table.sample(rng);
                if sampled == output {
                    continue;
                }
                (sampled, 0.0)
            };

            let f = self.syn0.row(input).dot(&self.syn1neg.row(target));
            let g = (label - sigmoid(f)) * alpha;

            neu1e.scaled_add(g, &self.syn1neg.row(target));
            let input_row = self.syn0.row(input);
            self.syn1neg.row_mut(target).scaled_add(g, &input_row);
        }

        let mut row = self.syn0.row_mut(input);
        row += &neu1e;
    }
}

impl Embedder for Word2Vec {
    fn fit(&mut self, corpus: &[Walk]) -> Result<()> {
        let config = self.config.clone();
        if config.vector_size == 0 {
            return Err(RdfVecError::Training(
                "vector_size must be greater than zero".to_string(),
            ));
        }
        if config.epochs == 0 {
            return Err(RdfVecError::Training(
                "epochs must be greater than zero".to_string(),
            ));
        }
        if config.window == 0 {
            return Err(RdfVecError::Training(
                "window must be greater than zero".to_string(),
            ));
        }

        self.build_vocab(corpus);
        let vocab_len = self.vocab.len();
        if vocab_len == 0 {
            self.syn0 = Array2::zeros((0, config.vector_size));
            self.syn1neg = Array2::zeros((0, config.vector_size));
            return Ok(());
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let bound = 0.5 / config.vector_size as f32;
        self.syn0 = Array2::from_shape_fn((vocab_len, config.vector_size), |_| {
            rng.gen_range(-bound..bound)
        });
        self.syn1neg = Array2::zeros((vocab_len, config.vector_size));

        let table = WeightedIndex::new(
            self.counts
                .iter()
                .map(|&c| (c as f64).powf(NEGATIVE_POWER)),
        )
        .map_err(|e| RdfVecError::Training(format!("Negative sampling table: {e}")))?;

        let encoded: Vec<Vec<usize>> = corpus
            .iter()
            .map(|walk| walk.iter().filter_map(|t| self.vocab.get(t).copied()).collect())
            .collect();

        self.trained = vec![false; vocab_len];
        for sentence in encoded.iter().filter(|s| s.len() > 1) {
            for &idx in sentence {
                self.trained[idx] = true;
            }
        }

        let total_steps = (config.epochs * encoded.len()).max(1) as f32;
        let mut step = 0usize;
        let mut order: Vec<usize> = (0..encoded.len()).collect();

        for epoch in 0..config.epochs {
            order.shuffle(&mut rng);

            for &sentence_idx in &order {
                let progress = step as f32 / total_steps;
                let alpha = (config.learning_rate
                    - (config.learning_rate - config.min_learning_rate) * progress)
                    .max(config.min_learning_rate);
                step += 1;

                let sentence = &encoded[sentence_idx];
                for (pos, &center) in sentence.iter().enumerate() {
                    let reduced = rng.gen_range(0..config.window);
                    let span = config.window - reduced;
                    let start = pos.saturating_sub(span);
                    let end = (pos + span + 1).min(sentence.len());

                    for ctx_pos in start..end {
                        if ctx_pos == pos {
                            continue;
                        }
                        self.update_pair(center, sentence[ctx_pos], alpha, &table, &mut rng);
                    }
                }
            }

            debug!("Word2Vec epoch {}/{} done", epoch + 1, config.epochs);
        }

        Ok(())
    }

    fn vector(&self, token: &str) -> Option<Vec<f32>> {
        self.vocab
            .get(token)
            .filter(|&&idx| self.trained[idx])
            .map(|&idx| self.syn0.row(idx).to_vec())
    }

    fn dimension(&self) -> usize {
        self.config.vector_size
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x.clamp(-MAX_EXP, MAX_EXP)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vector_size: usize, epochs: usize) -> Word2VecConfig {
        Word2VecConfig {
            vector_size,
            epochs,
            seed: Some(7),
            ..Default::default()
        }
    }

    fn walk(tokens: &[&str]) -> Walk {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn cosine(a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
        dot / (na * nb)
    }

    #[test]
    fn test_vocab_and_dimension() {
        let corpus = vec![walk(&["a", "p", "b"]), walk(&["b", "p", "c"]), walk(&["z"])];
        let mut model = Word2Vec::new(config(8, 2));
        model.fit(&corpus).unwrap();

        assert_eq!(model.vocab_len(), 5);
        assert_eq!(model.dimension(), 8);
        assert_eq!(model.vector("a").unwrap().len(), 8);
        assert!(model.vector("missing").is_none());
        // never paired with a context token
        assert!(model.contains("z"));
        assert!(model.vector("z").is_none());
    }

    #[test]
    fn test_empty_corpus() {
        let mut model = Word2Vec::new(config(4, 1));
        model.fit(&[]).unwrap();
        assert_eq!(model.vocab_len(), 0);
    }

    #[test]
    fn test_invalid_hyperparameters() {
        let corpus = vec![walk(&["a", "p", "b"])];

        let mut model = Word2Vec::new(config(0, 1));
        assert!(matches!(model.fit(&corpus), Err(RdfVecError::Training(_))));

        let mut model = Word2Vec::new(config(4, 0));
        assert!(matches!(model.fit(&corpus), Err(RdfVecError::Training(_))));
    }

    #[test]
    fn test_seeded_training_is_deterministic() {
        let corpus = vec![
            walk(&["a", "p", "b", "q", "c"]),
            walk(&["b", "q", "c"]),
            walk(&["c", "r", "a"]),
        ];

        let mut first = Word2Vec::new(config(6, 3));
        first.fit(&corpus).unwrap();
        let mut second = Word2Vec::new(config(6, 3));
        second.fit(&corpus).unwrap();

        assert_eq!(first.vector("b"), second.vector("b"));
    }

    #[test]
    fn test_shared_context_tokens_move_closer() {
        // "x" and "y" always appear in the same contexts, "lonely" never does.
        let mut corpus = Vec::new();
        for _ in 0..50 {
            corpus.push(walk(&["x", "rel", "hub"]));
            corpus.push(walk(&["y", "rel", "hub"]));
            corpus.push(walk(&["lonely", "other", "elsewhere"]));
        }

        let mut model = Word2Vec::new(Word2VecConfig {
            vector_size: 16,
            epochs: 20,
            window: 2,
            seed: Some(3),
            ..Default::default()
        });
        model.fit(&corpus).unwrap();

        let x = model.vector("x").unwrap();
        let y = model.vector("y").unwrap();
        let lonely = model.vector("lonely").unwrap();

        assert!(cosine(&x, &y) > cosine(&x, &lonely));
    }
}
