//! Subcommand implementations.

pub mod init;
pub mod items;
pub mod student;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use testlens_core::config::load_config_from;
use testlens_core::parser;
use testlens_core::store::InMemoryStore;
use testlens_core::AnalysisEngine;

/// Datasets loaded into a store, with an engine reading from it.
pub struct Loaded {
    pub store: Arc<InMemoryStore>,
    pub engine: AnalysisEngine,
}

/// Load config and datasets and build the engine over them.
pub fn load(dataset: &Path, config_path: Option<&Path>) -> Result<Loaded> {
    let config = load_config_from(config_path)?;
    let datasets = parser::load_datasets(dataset)?;
    anyhow::ensure!(
        !datasets.is_empty(),
        "no datasets found in {}",
        dataset.display()
    );

    let store = Arc::new(InMemoryStore::from_datasets(datasets));
    let engine = AnalysisEngine::with_store(store.clone(), config);
    Ok(Loaded { store, engine })
}

/// Pick the test instance to analyze.
///
/// An explicit id must exist; without one, the store must hold exactly one
/// instance.
pub fn resolve_instance(store: &InMemoryStore, requested: Option<String>) -> Result<String> {
    let available = store.instance_ids();
    match requested {
        Some(id) => {
            anyhow::ensure!(
                store.instance(&id).is_some(),
                "unknown test instance '{}'. Available: {}",
                id,
                available.join(", ")
            );
            Ok(id)
        }
        None => match available.as_slice() {
            [only] => Ok(only.to_string()),
            _ => anyhow::bail!(
                "{} test instances loaded, choose one with --instance: {}",
                available.len(),
                available.join(", ")
            ),
        },
    }
}

/// Where to write a file report when `--output` was not given.
pub fn default_output(output: Option<PathBuf>, file_name: String) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(file_name))
}

/// Print `content` or write it to `output`.
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}
