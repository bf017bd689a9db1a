//! Bounded context assembly.
//!
//! Character budgets count Unicode scalars and include the blank-line
//! separators, so a concatenation that overflows is cut to exactly the
//! budget.

use anyhow::Result;

use examdb_core::types::Chunk;

use crate::registry::CorpusRegistry;

pub const CANON_SECTION_CHARS: usize = 1200;
pub const CANON_TOTAL_CHARS: usize = 2200;
pub const GENERATION_SPECS_CHARS: usize = 4000;
pub const GENERATION_POOL_CHARS: usize = 2800;
pub const GENERATION_EVAL_CHARS: usize = 1200;
pub const GENERATION_K: usize = 6;
const CANON_K: usize = 3;

/// Always-on canon queries: operator/terminology definitions and
/// format requirements.
pub const OPERATOR_CANON_QUERY: &str = "operator definitions list command words written exam";
pub const FORMAT_CANON_QUERY: &str = "format requirements structure tasks task types";

const GENERATION_SPECS_QUERY: &str =
    "task construction operators competence areas expectation horizon";
const GENERATION_POOL_QUERY: &str =
    "example exam tasks interpretation essay material based writing";
const GENERATION_EVAL_QUERY: &str =
    "statistical evaluation selection frequency topics task choice schools";

/// Concatenates trimmed chunk contents separated by a blank line under
/// a character budget. The chunk that would overflow is truncated to
/// exactly fill the remaining budget and iteration stops; blank chunks
/// are skipped entirely.
pub fn concat(chunks: &[Chunk], limit_chars: usize) -> String {
    let mut out = String::new();
    for chunk in chunks {
        let t = chunk.content.trim();
        if t.is_empty() {
            continue;
        }
        let used = char_len(&out);
        let remaining = limit_chars.saturating_sub(used);
        if remaining == 0 {
            break;
        }
        let sep_len = if out.is_empty() { 0 } else { 2 };
        if sep_len + char_len(t) > remaining {
            if remaining > sep_len {
                if sep_len > 0 {
                    out.push_str("\n\n");
                }
                out.push_str(&take_chars(t, remaining - sep_len));
            }
            break;
        }
        if sep_len > 0 {
            out.push_str("\n\n");
        }
        out.push_str(t);
    }
    out
}

/// Truncates to `limit` characters with an ellipsis marker; a no-op on
/// text that already fits.
pub fn shorten(text: &str, limit: usize) -> String {
    if char_len(text) <= limit {
        text.to_string()
    } else {
        format!("{} …", take_chars(text, limit))
    }
}

/// The always-on short canon: operator definitions plus format
/// requirements, each independently budgeted, the pair capped again.
pub fn build_canon(registry: &CorpusRegistry) -> Result<String> {
    let op = registry.search("specs", OPERATOR_CANON_QUERY, CANON_K, true)?;
    let fm = registry.search("specs", FORMAT_CANON_QUERY, CANON_K, true)?;
    let joined = format!(
        "### Operators (canon)\n{}\n\n### Format requirements (canon)\n{}",
        concat(&op, CANON_SECTION_CHARS),
        concat(&fm, CANON_SECTION_CHARS),
    );
    Ok(shorten(&joined, CANON_TOTAL_CHARS))
}

#[derive(Debug)]
pub struct GenerationContexts {
    pub specs: String,
    pub pool: String,
    pub evals: String,
}

/// High-level contexts for the generation collaborator: canon + specs,
/// pool examples, evaluation statistics, each under its budget.
pub fn generation_contexts(registry: &CorpusRegistry) -> Result<GenerationContexts> {
    let canon = build_canon(registry)?;
    let spec_docs = registry.search("specs", GENERATION_SPECS_QUERY, GENERATION_K, true)?;
    let pool_docs = registry.search("pool", GENERATION_POOL_QUERY, GENERATION_K, true)?;
    let eval_docs = registry.search("eval", GENERATION_EVAL_QUERY, GENERATION_K, true)?;
    Ok(GenerationContexts {
        specs: format!("{}\n\n{}", canon, concat(&spec_docs, GENERATION_SPECS_CHARS)),
        pool: concat(&pool_docs, GENERATION_POOL_CHARS),
        evals: concat(&eval_docs, GENERATION_EVAL_CHARS),
    })
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}
