//! Domain types shared by the lexical, semantic and hybrid engines.

use serde::{Deserialize, Serialize};

/// Which corpus a chunk was extracted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLabel {
    Pool,
    Evaluation,
    Specs,
}

impl SourceLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceLabel::Pool => "pool",
            SourceLabel::Evaluation => "evaluation",
            SourceLabel::Specs => "specs",
        }
    }
}

/// An immutable span of extracted document text with provenance metadata.
///
/// - `content`: the text payload (non-empty after trimming)
/// - `source`: corpus the chunk was extracted for
/// - `file`: origin document basename; compared case-insensitively
/// - `section`: human-readable section label (e.g. "Page 3")
/// - `page_start`/`page_end`: 1-based page range, start <= end
///
/// The same shape serves raw extracted sections and split chunks; the
/// splitter copies metadata unchanged and only replaces `content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub source: SourceLabel,
    pub file: String,
    pub section: String,
    pub page_start: u32,
    pub page_end: u32,
}

impl Chunk {
    /// Identity key used for fusion dedup: origin file plus first page.
    pub fn dedup_key(&self) -> (&str, u32) {
        (self.file.as_str(), self.page_start)
    }
}

/// Transient `(fusion weight, chunk)` pair produced during a single
/// hybrid query. Never persisted.
#[derive(Debug, Clone)]
pub struct FusionCandidate {
    pub weight: f32,
    pub chunk: Chunk,
}
