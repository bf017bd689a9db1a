//! Extraction-record loader.
//!
//! PDF extraction runs upstream; its output lands here as `.jsonl`
//! files (one chunk-shaped record per line) under
//! `<root>/{pool,evaluation,specs}`. Plain `.txt` files are accepted as
//! a degenerate single-section document. A missing corpus directory
//! yields an empty corpus, not an error.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{Chunk, SourceLabel};

/// One line of an extraction dump. `source` is assigned from the corpus
/// directory, not trusted from the record.
#[derive(Debug, Deserialize)]
struct ExtractionRecord {
    content: String,
    file: String,
    #[serde(default)]
    section: String,
    #[serde(default = "default_page")]
    page_start: u32,
    #[serde(default = "default_page")]
    page_end: u32,
}

fn default_page() -> u32 {
    1
}

pub struct CorpusLoader;

impl CorpusLoader {
    /// Reads every extraction record under `dir`, stamped with `label`.
    /// Returns an empty vec when `dir` does not exist.
    pub fn load_corpus(dir: &Path, label: SourceLabel) -> Result<Vec<Chunk>> {
        if !dir.is_dir() {
            debug!(dir = %dir.display(), corpus = label.as_str(), "corpus directory missing, treating as empty");
            return Ok(Vec::new());
        }
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        let mut sections = Vec::new();
        for path in files {
            match path.extension().and_then(|s| s.to_str()) {
                Some("jsonl") => sections.extend(Self::read_jsonl(&path, label)?),
                Some("txt") => {
                    if let Some(section) = Self::read_txt(&path, label)? {
                        sections.push(section);
                    }
                }
                _ => {}
            }
        }
        debug!(corpus = label.as_str(), sections = sections.len(), "corpus loaded");
        Ok(sections)
    }

    fn read_jsonl(path: &Path, label: SourceLabel) -> Result<Vec<Chunk>> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read extraction dump {}", path.display()))?;
        let mut out = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: ExtractionRecord = serde_json::from_str(line).with_context(|| {
                format!("Malformed extraction record at {}:{}", path.display(), lineno + 1)
            })?;
            if record.content.trim().is_empty() {
                continue;
            }
            if record.page_start > record.page_end {
                warn!(file = %record.file, "page_start > page_end in extraction record, skipping");
                continue;
            }
            out.push(Chunk {
                content: record.content,
                source: label,
                file: basename(&record.file),
                section: record.section,
                page_start: record.page_start,
                page_end: record.page_end,
            });
        }
        Ok(out)
    }

    fn read_txt(path: &Path, label: SourceLabel) -> Result<Option<Chunk>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => String::from_utf8_lossy(&fs::read(path)?).to_string(),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Some(Chunk {
            content,
            source: label,
            file,
            section: stem,
            page_start: 1,
            page_end: 1,
        }))
    }
}

/// Basename of a possibly path-qualified file reference.
pub fn basename(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string())
}
