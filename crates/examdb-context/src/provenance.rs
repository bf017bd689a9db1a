//! Provenance-constrained retrieval for evaluation contexts.
//!
//! A decorator over the general registry: per criterion it over-fetches
//! from the specifications corpus, then keeps only chunks from that
//! criterion's single required document. The allow-list has size one
//! and violations are fatal, never silently degraded, because judging
//! against an empty or cross-document context would be meaningless.

use anyhow::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

use examdb_core::corpus::basename;
use examdb_core::error::Error;
use examdb_core::types::Chunk;

use crate::assemble::concat;
use crate::registry::CorpusRegistry;

/// Over-fetch width. Approximates "effectively all" hits for the
/// required file; chunks of the required file that fall below this
/// cutoff count as missing. Not a completeness guarantee.
pub const OVERFETCH_K: usize = 48;
pub const CRITERION_CONTEXT_CHARS: usize = 3500;

/// One evaluation criterion: the retrieval query plus the only document
/// allowed to ground it (basename, compared case-insensitively).
#[derive(Debug, Clone, Deserialize)]
pub struct CriterionSpec {
    pub query: String,
    pub file: String,
}

/// The reference deployment's five criteria. The mapping is fixed for
/// the process lifetime; deployments may supply their own.
pub fn default_criteria() -> BTreeMap<u32, CriterionSpec> {
    let entries = [
        (
            1,
            "examination focus areas 2025 advanced course task types assessment exam duration",
            "exam_focus_2025_advanced.pdf",
        ),
        (
            2,
            "operator definitions examples requirement levels written exam",
            "operators_glossary.pdf",
        ),
        (
            3,
            "description of task structure working time selection time expectation horizon marking guidance",
            "task_structure.pdf",
        ),
        (
            4,
            "notes on task construction task types principles variants material based",
            "task_construction.pdf",
        ),
        (
            5,
            "criteria for tasks expectation horizons marking guidance domain specifics material basis",
            "task_criteria_marking.pdf",
        ),
    ];
    entries
        .into_iter()
        .map(|(id, query, file)| {
            (id, CriterionSpec { query: query.to_string(), file: file.to_string() })
        })
        .collect()
}

pub struct ProvenanceRetriever {
    registry: Arc<CorpusRegistry>,
    criteria: BTreeMap<u32, CriterionSpec>,
}

impl ProvenanceRetriever {
    pub fn new(registry: Arc<CorpusRegistry>, criteria: BTreeMap<u32, CriterionSpec>) -> Self {
        Self { registry, criteria }
    }

    pub fn with_default_criteria(registry: Arc<CorpusRegistry>) -> Self {
        Self::new(registry, default_criteria())
    }

    /// One bounded context per criterion id. Fails on the first
    /// criterion whose required document contributes nothing.
    pub fn evaluation_contexts(&self) -> Result<BTreeMap<u32, String>> {
        let mut out = BTreeMap::new();
        for criterion in self.criteria.keys() {
            out.insert(*criterion, self.context_for(*criterion)?);
        }
        Ok(out)
    }

    /// Evaluation context for a single criterion. Fatal when the
    /// criterion is unmapped, the specs corpus is missing, or the
    /// required document contributes zero chunks after filtering.
    pub fn context_for(&self, criterion: u32) -> Result<String> {
        let spec = self
            .criteria
            .get(&criterion)
            .ok_or(Error::MissingCriterion { criterion })?;
        let store = self.registry.get("specs")?;
        let hits = store.search(&spec.query, OVERFETCH_K, true)?;
        let filtered = only_from_required_file(hits, &spec.file);
        debug!(criterion, file = %spec.file, kept = filtered.len(), "provenance filter applied");
        if filtered.is_empty() {
            return Err(Error::ProvenanceViolation { criterion, file: spec.file.clone() }.into());
        }
        Ok(concat(&filtered, CRITERION_CONTEXT_CHARS))
    }
}

/// Keeps only chunks whose `file` basename equals the required document,
/// case-insensitively. A strict allow-list, not a ranking preference.
fn only_from_required_file(hits: Vec<Chunk>, required: &str) -> Vec<Chunk> {
    let rf = required.trim().to_lowercase();
    hits.into_iter()
        .filter(|c| basename(&c.file).to_lowercase() == rf)
        .collect()
}
