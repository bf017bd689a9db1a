use anyhow::Result;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::Value;
use tantivy::{doc, Index, TantivyDocument};
use tracing::debug;

use examdb_core::traits::LexicalSearcher;
use examdb_core::types::Chunk;

use crate::tantivy_utils::{build_schema, register_tokenizer};

/// Term-frequency index over one finalized chunk collection. Chunks are
/// addressed by a stored ordinal into the owned `chunks` vec, so hits
/// map back to full provenance metadata without storing it in tantivy.
pub struct LexicalIndex {
	index: Index,
	ordinal_field: tantivy::schema::Field,
	text_field: tantivy::schema::Field,
	chunks: Vec<Chunk>,
}

impl LexicalIndex {
	/// Builds an in-RAM index. Returns `Ok(None)` for an empty chunk
	/// collection; that is an expected degenerate case, not a failure.
	pub fn build(chunks: Vec<Chunk>) -> Result<Option<Self>> {
		if chunks.is_empty() {
			return Ok(None);
		}
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);
		let ordinal_field = schema.get_field("ordinal")?;
		let text_field = schema.get_field("text")?;

		let mut index_writer = index.writer(50_000_000)?;
		for (ordinal, chunk) in chunks.iter().enumerate() {
			index_writer.add_document(doc!(
				ordinal_field => ordinal as u64,
				text_field => chunk.content.clone(),
			))?;
		}
		index_writer.commit()?;
		debug!(chunks = chunks.len(), "lexical index built");
		Ok(Some(Self { index, ordinal_field, text_field, chunks }))
	}

	pub fn len(&self) -> usize {
		self.chunks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chunks.is_empty()
	}
}

impl LexicalSearcher for LexicalIndex {
	/// Every indexed chunk in BM25 score order. Queries are parsed
	/// leniently: malformed query syntax degrades to whatever terms
	/// survive instead of erroring.
	fn relevant_search(&self, query: &str) -> Result<Vec<Chunk>> {
		let reader = self.index.reader()?;
		let searcher = reader.searcher();
		let qp = QueryParser::for_index(&self.index, vec![self.text_field]);
		let (q, _errors) = qp.parse_query_lenient(query);
		let top_docs = searcher.search(&q, &TopDocs::with_limit(self.chunks.len()))?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (_score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr)?;
			let ordinal = doc
				.get_first(self.ordinal_field)
				.and_then(|v| v.as_u64())
				.unwrap_or_default() as usize;
			if let Some(chunk) = self.chunks.get(ordinal) {
				hits.push(chunk.clone());
			}
		}
		Ok(hits)
	}
}
