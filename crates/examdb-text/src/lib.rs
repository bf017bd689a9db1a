//! examdb-text
//!
//! Tantivy-backed Lexical Index: BM25-ranked retrieval over a finalized
//! chunk collection. Built in RAM once per corpus and read-only for its
//! lifetime.

pub mod index;
pub mod tantivy_utils;

pub use index::LexicalIndex;
