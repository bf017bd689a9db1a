//! examdb-context
//!
//! The session-scoped Corpus Registry (named corpora, each backed by a
//! hybrid retriever), bounded context assembly for generation, and the
//! provenance-constrained retriever used to assemble per-criterion
//! evaluation contexts.

pub mod assemble;
pub mod provenance;
pub mod registry;

pub use provenance::{CriterionSpec, ProvenanceRetriever};
pub use registry::{CorpusRegistry, CorpusStore};
