use examdb_core::traits::{LexicalSearcher, SemanticSearcher};
use examdb_core::types::{Chunk, SourceLabel};
use examdb_hybrid::HybridRetriever;

fn chunk(name: &str, page: u32) -> Chunk {
    Chunk {
        content: format!("content of {name}"),
        source: SourceLabel::Pool,
        file: format!("{name}.pdf"),
        section: format!("Page {page}"),
        page_start: page,
        page_end: page,
    }
}

/// Fixed-order stand-ins so the tests control both input rankings.
struct StubSemantic(Vec<Chunk>);

impl SemanticSearcher for StubSemantic {
    fn similarity_search(&self, _query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.0.iter().take(k).cloned().collect())
    }

    fn diverse_search(&self, _query: &str, k: usize) -> anyhow::Result<Vec<Chunk>> {
        // Diverse order: reversed, to make the mode observable.
        Ok(self.0.iter().rev().take(k).cloned().collect())
    }
}

struct StubLexical(Vec<Chunk>);

impl LexicalSearcher for StubLexical {
    fn relevant_search(&self, _query: &str) -> anyhow::Result<Vec<Chunk>> {
        Ok(self.0.clone())
    }
}

#[test]
fn without_lexical_index_semantic_hits_pass_through() {
    let hits = vec![chunk("a", 1), chunk("b", 1), chunk("c", 1)];
    let retriever: HybridRetriever<_, StubLexical> =
        HybridRetriever::new(StubSemantic(hits.clone()), None);
    let out = retriever.search("anything", 2, false).expect("search");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].file, "a.pdf");
    assert_eq!(out[1].file, "b.pdf");
}

#[test]
fn diversity_flag_selects_diverse_search() {
    let hits = vec![chunk("a", 1), chunk("b", 1)];
    let retriever: HybridRetriever<_, StubLexical> =
        HybridRetriever::new(StubSemantic(hits), None);
    let out = retriever.search("anything", 2, true).expect("search");
    assert_eq!(out[0].file, "b.pdf", "diversity mode must reach diverse_search");
}

#[test]
fn fusion_path_merges_both_sources() {
    let retriever = HybridRetriever::new(
        StubSemantic(vec![chunk("a", 1), chunk("b", 1)]),
        Some(StubLexical(vec![chunk("b", 1), chunk("c", 1)])),
    );
    let out = retriever.search("anything", 2, false).expect("search");
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].file, "a.pdf");
    assert_eq!(out[1].file, "b.pdf");
}

#[test]
fn fusion_backfills_from_lexical_when_semantic_is_short() {
    let retriever = HybridRetriever::new(
        StubSemantic(vec![chunk("a", 1)]),
        Some(StubLexical(vec![chunk("x", 1), chunk("y", 1), chunk("z", 1)])),
    );
    let out = retriever.search("anything", 3, false).expect("search");
    let files: Vec<&str> = out.iter().map(|c| c.file.as_str()).collect();
    assert_eq!(files, vec!["a.pdf", "x.pdf", "y.pdf"]);
}

#[test]
fn empty_corpus_searches_to_empty() {
    let retriever: HybridRetriever<_, StubLexical> =
        HybridRetriever::new(StubSemantic(Vec::new()), None);
    assert!(retriever.search("anything", 6, true).expect("search").is_empty());
}
