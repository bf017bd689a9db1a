use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use examdb_context::assemble::{self, CANON_TOTAL_CHARS};
use examdb_context::provenance::CriterionSpec;
use examdb_context::{CorpusRegistry, ProvenanceRetriever};
use examdb_core::error::Error;
use examdb_core::types::{Chunk, SourceLabel};
use examdb_embed::FakeEmbedder;

fn chunk(content: &str) -> Chunk {
    Chunk {
        content: content.to_string(),
        source: SourceLabel::Specs,
        file: "doc.pdf".to_string(),
        section: "Page 1".to_string(),
        page_start: 1,
        page_end: 1,
    }
}

fn write_jsonl(dir: &Path, name: &str, records: &[(&str, u32, &str)]) {
    let mut body = String::new();
    for (file, page, content) in records {
        body.push_str(&format!(
            r#"{{"content":"{content}","file":"{file}","section":"Page {page}","page_start":{page},"page_end":{page}}}"#,
        ));
        body.push('\n');
    }
    fs::write(dir.join(name), body).unwrap();
}

fn seeded_registry(tmp: &TempDir) -> Arc<CorpusRegistry> {
    let root = tmp.path();
    fs::create_dir_all(root.join("specs")).unwrap();
    fs::create_dir_all(root.join("pool")).unwrap();
    write_jsonl(
        &root.join("specs"),
        "specs.jsonl",
        &[
            ("ops.pdf", 1, "Operator definitions list the command words used in written exams."),
            ("ops.pdf", 2, "Each operator names a requirement level for written exam answers."),
            ("structure.pdf", 1, "The task structure fixes working time and selection time for exams."),
        ],
    );
    write_jsonl(
        &root.join("pool"),
        "pool.jsonl",
        &[("pool.pdf", 1, "An example interpretation task drawn from the exam pool.")],
    );
    // no evaluation/ directory on purpose
    CorpusRegistry::build_from_root(root, Arc::new(FakeEmbedder::new(64))).expect("registry")
}

#[test]
fn concat_under_budget_keeps_everything_verbatim() {
    let chunks = vec![chunk("alpha"), chunk("beta"), chunk("  "), chunk("gamma")];
    let out = assemble::concat(&chunks, 200);
    assert_eq!(out, "alpha\n\nbeta\n\ngamma", "blank chunks are skipped");
}

#[test]
fn concat_overflow_fills_budget_exactly() {
    let chunks = vec![chunk("aaaa"), chunk("bbbbbbbbbb")];
    let out = assemble::concat(&chunks, 10);
    assert_eq!(out.chars().count(), 10);
    assert_eq!(out, "aaaa\n\nbbbb");
}

#[test]
fn concat_counts_unicode_scalars_not_bytes() {
    let chunks = vec![chunk("ääää"), chunk("öööööö")];
    let out = assemble::concat(&chunks, 8);
    assert_eq!(out.chars().count(), 8);
    assert_eq!(out, "ääää\n\nöö");
}

#[test]
fn concat_skips_separator_that_cannot_fit() {
    let chunks = vec![chunk("aaaa"), chunk("bbbb")];
    let out = assemble::concat(&chunks, 5);
    assert_eq!(out, "aaaa", "a lone separator never trails the output");
}

#[test]
fn shorten_is_noop_below_limit_and_marks_above() {
    assert_eq!(assemble::shorten("short", 10), "short");
    let cut = assemble::shorten("0123456789abcdef", 10);
    assert!(cut.starts_with("0123456789"));
    assert!(cut.ends_with('…'));
}

#[test]
fn registry_builds_and_answers_hybrid_queries() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);

    let mut names = registry.names();
    names.sort_unstable();
    assert_eq!(names, vec!["eval", "pool", "specs"]);

    let hits = registry
        .search("specs", "operator definitions written exam", 2, true)
        .expect("search");
    assert!(!hits.is_empty());
    assert!(hits.iter().any(|c| c.file == "ops.pdf"));
}

#[test]
fn registry_empty_corpus_returns_no_hits_without_error() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let hits = registry
        .search("eval", "statistical evaluation of task choice", 5, true)
        .expect("querying an empty corpus is not an error");
    assert!(hits.is_empty());
}

#[test]
fn registry_unknown_corpus_is_not_initialized() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let err = registry.search("archive", "anything", 3, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::NotInitialized(_))
    ));
}

#[test]
fn registry_rejects_missing_data_root() {
    let err = CorpusRegistry::build_from_root(
        Path::new("/nonexistent/examdb-data"),
        Arc::new(FakeEmbedder::new(16)),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::InvalidConfig(_))
    ));
}

#[test]
fn canon_respects_outer_budget() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let canon = assemble::build_canon(&registry).expect("canon");
    assert!(canon.chars().count() <= CANON_TOTAL_CHARS + 2, "shorten marker aside");
    assert!(canon.contains("### Operators (canon)"));
    assert!(canon.contains("### Format requirements (canon)"));
}

#[test]
fn generation_contexts_cover_all_three_corpora() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let ctx = assemble::generation_contexts(&registry).expect("contexts");
    assert!(ctx.specs.contains("### Operators (canon)"));
    assert!(ctx.pool.contains("interpretation task"));
    assert!(ctx.evals.is_empty(), "no evaluation data was seeded");
}

fn one_criterion(query: &str, file: &str) -> BTreeMap<u32, CriterionSpec> {
    let mut criteria = BTreeMap::new();
    criteria.insert(2, CriterionSpec { query: query.to_string(), file: file.to_string() });
    criteria
}

#[test]
fn provenance_context_only_cites_the_required_file() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    // query matches both documents; filtering must keep only ops.pdf
    let retriever = ProvenanceRetriever::new(
        registry,
        one_criterion("operator definitions task structure written exams", "OPS.PDF"),
    );
    let context = retriever.context_for(2).expect("context");
    assert!(context.contains("Operator definitions"));
    assert!(
        !context.contains("task structure fixes"),
        "other documents must not leak into the criterion context"
    );
}

#[test]
fn provenance_violation_names_criterion_and_file() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let retriever = ProvenanceRetriever::new(
        registry,
        one_criterion("operator definitions written exams", "absent.pdf"),
    );
    let err = retriever.context_for(2).unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::ProvenanceViolation { criterion, file }) => {
            assert_eq!(*criterion, 2);
            assert_eq!(file, "absent.pdf");
        }
        other => panic!("expected a provenance violation, got {other:?}"),
    }
}

#[test]
fn unmapped_criterion_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let retriever = ProvenanceRetriever::new(
        registry,
        one_criterion("operator definitions", "ops.pdf"),
    );
    let err = retriever.context_for(9).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MissingCriterion { criterion: 9 })
    ));
}

#[test]
fn evaluation_contexts_visit_every_mapped_criterion() {
    let tmp = TempDir::new().unwrap();
    let registry = seeded_registry(&tmp);
    let mut criteria = one_criterion("operator definitions written exams", "ops.pdf");
    criteria.insert(
        3,
        CriterionSpec {
            query: "task structure working time selection time".to_string(),
            file: "structure.pdf".to_string(),
        },
    );
    let retriever = ProvenanceRetriever::new(registry, criteria);
    let contexts = retriever.evaluation_contexts().expect("contexts");
    assert_eq!(contexts.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    assert!(contexts[&3].contains("working time"));
}