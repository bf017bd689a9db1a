//! Named corpora, built once per session and read-only afterwards.
//!
//! Each corpus gets corpus-specific chunking before indexing:
//! specifications split fine with generous overlap for precise rubric
//! matching, pool/evaluation split coarser to preserve narrative.

use anyhow::{bail, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use examdb_core::chunker::ChunkSplitter;
use examdb_core::corpus::CorpusLoader;
use examdb_core::error::Error;
use examdb_core::traits::Embedder;
use examdb_core::types::{Chunk, SourceLabel};
use examdb_hybrid::HybridRetriever;
use examdb_text::LexicalIndex;
use examdb_vector::SemanticIndex;

/// The concrete per-corpus retriever held by the registry.
pub type CorpusStore = HybridRetriever<SemanticIndex, LexicalIndex>;

pub struct CorpusSpec {
    pub name: &'static str,
    pub dir: &'static str,
    pub label: SourceLabel,
    pub chunk_size: usize,
    pub overlap: usize,
}

pub const CORPORA: [CorpusSpec; 3] = [
    CorpusSpec { name: "specs", dir: "specs", label: SourceLabel::Specs, chunk_size: 550, overlap: 100 },
    CorpusSpec { name: "pool", dir: "pool", label: SourceLabel::Pool, chunk_size: 1000, overlap: 120 },
    CorpusSpec { name: "eval", dir: "evaluation", label: SourceLabel::Evaluation, chunk_size: 1000, overlap: 120 },
];

/// Built exactly once, then shared immutably; queries after
/// construction are lock-free reads. Callers hold it behind `Arc`.
pub struct CorpusRegistry {
    stores: HashMap<String, CorpusStore>,
    chunk_counts: HashMap<String, usize>,
}

impl std::fmt::Debug for CorpusRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusRegistry")
            .field("corpora", &self.stores.keys().collect::<Vec<_>>())
            .field("chunk_counts", &self.chunk_counts)
            .finish()
    }
}

impl CorpusRegistry {
    /// Builds every corpus store from raw extracted sections grouped by
    /// corpus name. A corpus with no sections is valid and yields empty
    /// retrieval results; an embedding failure aborts the whole build.
    pub fn build(
        mut raw: HashMap<String, Vec<Chunk>>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Arc<Self>> {
        let mut stores = HashMap::new();
        let mut chunk_counts = HashMap::new();
        for spec in &CORPORA {
            let sections = raw.remove(spec.name).unwrap_or_default();
            let splitter = ChunkSplitter::new(spec.chunk_size, spec.overlap);
            let chunks = splitter.split_sections(&sections);
            info!(
                corpus = spec.name,
                sections = sections.len(),
                chunks = chunks.len(),
                "building corpus store"
            );
            chunk_counts.insert(spec.name.to_string(), chunks.len());
            let semantic = SemanticIndex::build(chunks.clone(), Arc::clone(&embedder))?;
            let lexical = LexicalIndex::build(chunks)?;
            stores.insert(spec.name.to_string(), HybridRetriever::new(semantic, lexical));
        }
        Ok(Arc::new(Self { stores, chunk_counts }))
    }

    /// Loads extraction records from `<root>/{specs,pool,evaluation}`
    /// and builds the registry. A missing corpus directory is fine; an
    /// unreadable root is not.
    pub fn build_from_root(root: &Path, embedder: Arc<dyn Embedder>) -> Result<Arc<Self>> {
        if !root.is_dir() {
            bail!(Error::InvalidConfig(format!(
                "data root {} is not a readable directory",
                root.display()
            )));
        }
        let mut raw = HashMap::new();
        for spec in &CORPORA {
            let sections = CorpusLoader::load_corpus(&root.join(spec.dir), spec.label)?;
            raw.insert(spec.name.to_string(), sections);
        }
        Self::build(raw, embedder)
    }

    pub fn get(&self, name: &str) -> examdb_core::error::Result<&CorpusStore> {
        self.stores
            .get(name)
            .ok_or_else(|| Error::NotInitialized(format!("no corpus named '{name}'")))
    }

    /// Hybrid search against one named corpus.
    pub fn search(&self, corpus: &str, query: &str, k: usize, diversity: bool) -> Result<Vec<Chunk>> {
        let store = self.get(corpus)?;
        store.search(query, k, diversity)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.stores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// `(corpus, chunk count)` pairs in name order.
    pub fn stats(&self) -> Vec<(&str, usize)> {
        let mut stats: Vec<(&str, usize)> = self
            .chunk_counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        stats.sort_unstable();
        stats
    }
}
