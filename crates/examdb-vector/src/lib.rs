//! examdb-vector
//!
//! In-memory Semantic Index: cosine similarity over unit-normalized
//! embeddings with plain top-k search and a maximal-marginal-relevance
//! diverse search. Built once from a finalized chunk collection and
//! read-only for its lifetime.

use anyhow::Result;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use examdb_core::traits::{Embedder, SemanticSearcher};
use examdb_core::types::Chunk;

/// Relevance/redundancy trade-off for diverse search. Favors relevance.
const MMR_LAMBDA: f32 = 0.7;
/// Floor for the MMR candidate pool size.
const MMR_FETCH_FLOOR: usize = 20;

pub struct SemanticIndex {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    embedder: Arc<dyn Embedder>,
}

impl SemanticIndex {
    /// Embeds the whole collection once. Zero chunks is a valid
    /// degenerate index that returns no results for any query.
    pub fn build(chunks: Vec<Chunk>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts)?
        };
        for e in &embeddings {
            assert_eq!(e.len(), embedder.dim());
        }
        debug!(chunks = chunks.len(), "semantic index built");
        Ok(Self { chunks, embeddings, embedder })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let mut out = self.embedder.embed_batch(&[query.to_string()])?;
        Ok(out.remove(0))
    }

    /// Indices of the top-k chunks by cosine score, ties broken by
    /// insertion order so a fixed index is deterministic.
    fn ranked_candidates(&self, query_vec: &[f32], k: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(i, e)| (i, cosine(query_vec, e)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

impl SemanticSearcher for SemanticIndex {
    fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.embed_query(query)?;
        let hits = self
            .ranked_candidates(&query_vec, k)
            .into_iter()
            .map(|(i, _)| self.chunks[i].clone())
            .collect();
        Ok(hits)
    }

    /// Iteratively picks the candidate maximizing
    /// `λ·relevance − (1−λ)·max_similarity(candidate, selected)` over an
    /// over-fetched nearest-neighbor pool.
    fn diverse_search(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        if self.chunks.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vec = self.embed_query(query)?;
        let fetch_k = (4 * k).max(MMR_FETCH_FLOOR);
        let candidates = self.ranked_candidates(&query_vec, fetch_k);

        let mut selected: Vec<usize> = Vec::with_capacity(k);
        let mut remaining: Vec<(usize, f32)> = candidates;
        while selected.len() < k && !remaining.is_empty() {
            let mut best_pos = 0usize;
            let mut best_score = f32::NEG_INFINITY;
            for (pos, (idx, relevance)) in remaining.iter().enumerate() {
                let redundancy = selected
                    .iter()
                    .map(|s| cosine(&self.embeddings[*idx], &self.embeddings[*s]))
                    .fold(f32::NEG_INFINITY, f32::max);
                let redundancy = if selected.is_empty() { 0.0 } else { redundancy };
                let score = MMR_LAMBDA * relevance - (1.0 - MMR_LAMBDA) * redundancy;
                if score > best_score {
                    best_score = score;
                    best_pos = pos;
                }
            }
            let (idx, _) = remaining.remove(best_pos);
            selected.push(idx);
        }
        Ok(selected.into_iter().map(|i| self.chunks[i].clone()).collect())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }
    (dot / (mag_a * mag_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.5, 0.3, 0.2];
        assert!((cosine(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert!(cosine(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
