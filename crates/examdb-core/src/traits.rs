use crate::types::Chunk;

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Embedding-backed nearest-neighbor retriever over a fixed chunk set.
pub trait SemanticSearcher: Send + Sync {
    /// Top-k by similarity, best match first.
    fn similarity_search(&self, query: &str, k: usize) -> anyhow::Result<Vec<Chunk>>;
    /// Maximal-marginal-relevance selection: top-k trading relevance
    /// against redundancy with already-selected chunks.
    fn diverse_search(&self, query: &str, k: usize) -> anyhow::Result<Vec<Chunk>>;
}

/// Term-frequency-ranked retriever over a fixed chunk set.
pub trait LexicalSearcher: Send + Sync {
    /// Every indexed chunk in score order; the caller truncates.
    fn relevant_search(&self, query: &str) -> anyhow::Result<Vec<Chunk>>;
}
