//! examdb-hybrid
//!
//! Weighted reciprocal-rank fusion over one Semantic Index and an
//! optional Lexical Index. The fused order is fully determined by the
//! two input orders: recomputing the weights and re-sorting reproduces
//! it exactly.

use anyhow::Result;
use std::cmp::Ordering;
use std::collections::HashSet;

use examdb_core::traits::{LexicalSearcher, SemanticSearcher};
use examdb_core::types::{Chunk, FusionCandidate};

/// Fixed preference for semantic relevance over lexical overlap.
pub const SEMANTIC_WEIGHT: f32 = 0.7;
pub const LEXICAL_WEIGHT: f32 = 0.3;

/// One corpus's retriever: a Semantic Index plus zero-or-one Lexical
/// Index. Built once from a finalized chunk collection and read-only
/// for its lifetime; rebuilding means re-running construction.
pub struct HybridRetriever<S, L>
where
    S: SemanticSearcher,
    L: LexicalSearcher,
{
    semantic: S,
    lexical: Option<L>,
}

impl<S, L> HybridRetriever<S, L>
where
    S: SemanticSearcher,
    L: LexicalSearcher,
{
    pub fn new(semantic: S, lexical: Option<L>) -> Self {
        Self { semantic, lexical }
    }

    /// Hybrid search. `diversity` selects MMR on the semantic side.
    /// Without a lexical index the semantic hits pass through directly,
    /// already capped at `k`. Never errors on empty corpora.
    pub fn search(&self, query: &str, k: usize, diversity: bool) -> Result<Vec<Chunk>> {
        let semantic_hits = if diversity {
            self.semantic.diverse_search(query, k)?
        } else {
            self.semantic.similarity_search(query, k)?
        };
        let Some(lexical) = &self.lexical else {
            return Ok(semantic_hits);
        };
        let lexical_hits = lexical.relevant_search(query)?;
        Ok(fuse(semantic_hits, lexical_hits, k))
    }
}

/// Weighted reciprocal-rank fusion with `(file, page_start)` dedup.
///
/// A chunk appearing in both lists contributes two separate weighted
/// entries; it surfaces via its best single placement, not a combined
/// score, because dedup keeps only the highest-weight occurrence.
pub fn fuse(semantic_hits: Vec<Chunk>, lexical_hits: Vec<Chunk>, k: usize) -> Vec<Chunk> {
    let mut pool: Vec<FusionCandidate> = Vec::with_capacity(semantic_hits.len() + lexical_hits.len());
    for (i, chunk) in semantic_hits.into_iter().enumerate() {
        pool.push(FusionCandidate { weight: SEMANTIC_WEIGHT / (i + 1) as f32, chunk });
    }
    for (j, chunk) in lexical_hits.into_iter().enumerate() {
        pool.push(FusionCandidate { weight: LEXICAL_WEIGHT / (j + 1) as f32, chunk });
    }
    // Stable sort: on an exact weight tie the semantic entry, pushed
    // first, stays ahead.
    pool.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));

    let mut seen: HashSet<(String, u32)> = HashSet::new();
    let mut fused = Vec::with_capacity(k);
    for candidate in pool {
        let key = (candidate.chunk.file.clone(), candidate.chunk.page_start);
        if !seen.insert(key) {
            continue;
        }
        fused.push(candidate.chunk);
        if fused.len() == k {
            break;
        }
    }
    fused
}
