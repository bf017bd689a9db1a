use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use examdb_context::assemble;
use examdb_context::provenance::default_criteria;
use examdb_context::{CorpusRegistry, CriterionSpec, ProvenanceRetriever};
use examdb_core::config::Config;
use examdb_core::traits::Embedder;
use examdb_embed::get_default_embedder;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <build|query|contexts|eval-contexts> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn data_root(config: &Config, args: &[String]) -> PathBuf {
    args.iter()
        .find(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let dir: String = config.get("data.root").unwrap_or_else(|_| "./data".to_string());
            examdb_core::config::expand_path(dir)
        })
}

/// Criterion table from the `[criteria]` config section (keys are
/// criterion ids), falling back to the compiled-in defaults.
fn load_criteria(config: &Config) -> std::collections::BTreeMap<u32, CriterionSpec> {
    let raw: std::collections::BTreeMap<String, CriterionSpec> = match config.get("criteria") {
        Ok(raw) => raw,
        Err(_) => return default_criteria(),
    };
    raw.into_iter()
        .filter_map(|(id, spec)| id.parse::<u32>().ok().map(|id| (id, spec)))
        .collect()
}

fn build_registry(root: &PathBuf) -> anyhow::Result<Arc<CorpusRegistry>> {
    let embedder: Arc<dyn Embedder> = Arc::from(get_default_embedder()?);
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Building corpora from {}", root.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let registry = CorpusRegistry::build_from_root(root, embedder);
    spinner.finish_and_clear();
    registry
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let config = Config::load().map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "build" => {
            let root = data_root(&config, &args);
            let registry = build_registry(&root)?;
            println!("✅ Corpora ready");
            for (name, count) in registry.stats() {
                println!("📊 {}: {} chunks", name, count);
            }
        }
        "query" => {
            if args.len() < 2 {
                eprintln!("Usage: examdb query <specs|pool|eval> \"<query>\" [k] [--no-diversity]");
                std::process::exit(1);
            }
            let corpus = &args[0];
            let query = &args[1];
            let k = args.get(2).and_then(|a| a.parse::<usize>().ok()).unwrap_or(6);
            let diversity = !args.iter().any(|a| a == "--no-diversity");
            let root = data_root(&config, &[]);
            let registry = build_registry(&root)?;
            let hits = registry.search(corpus, query, k, diversity)?;
            if hits.is_empty() {
                println!("No results for \"{}\" in corpus '{}'", query, corpus);
            }
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "{}. {} p.{}-{} [{}]",
                    rank + 1, hit.file, hit.page_start, hit.page_end, hit.section
                );
                let preview: String = hit.content.chars().take(160).collect();
                println!("   {}", preview.replace('\n', " "));
            }
        }
        "contexts" => {
            let root = data_root(&config, &args);
            let registry = build_registry(&root)?;
            let contexts = assemble::generation_contexts(&registry)?;
            println!("=== specs ({} chars) ===\n{}\n", contexts.specs.chars().count(), contexts.specs);
            println!("=== pool ({} chars) ===\n{}\n", contexts.pool.chars().count(), contexts.pool);
            println!("=== evals ({} chars) ===\n{}", contexts.evals.chars().count(), contexts.evals);
        }
        "eval-contexts" => {
            let criterion = args.iter().find_map(|a| a.parse::<u32>().ok());
            let path_args: Vec<String> =
                args.iter().filter(|a| a.parse::<u32>().is_err()).cloned().collect();
            let root = data_root(&config, &path_args);
            let registry = build_registry(&root)?;
            let retriever = ProvenanceRetriever::new(registry, load_criteria(&config));
            match criterion {
                Some(n) => {
                    let context = retriever.context_for(n)?;
                    println!("=== criterion {} ({} chars) ===\n{}", n, context.chars().count(), context);
                }
                None => {
                    for (n, context) in retriever.evaluation_contexts()? {
                        println!("=== criterion {} ({} chars) ===\n{}\n", n, context.chars().count(), context);
                    }
                }
            }
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
