//! The `branches build` command: harvest location names from extracted
//! status documents and publish the branch-id artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use aladi_core::{BookStatus, BranchRegistry};
use anyhow::Context;

/// Suffix of the documents the `process` command writes for detail pages.
const STATUS_DOCUMENT_SUFFIX: &str = ".book-status.json";

/// Builds the registry from every `*.book-status.json` in `input_dir` and
/// writes `libraries.name-id.json` / `libraries.id-name.json` artifacts.
///
/// Unreadable status documents are logged and skipped so one corrupt file
/// does not abort the build.
///
/// # Errors
///
/// Returns an error if the input directory cannot be read, the output
/// directory cannot be created, or the artifacts cannot be written.
pub(crate) fn run_build(input_dir: &Path, output_dir: Option<&Path>) -> anyhow::Result<()> {
    let mut documents: Vec<PathBuf> = fs::read_dir(input_dir)
        .with_context(|| format!("reading status directory {}", input_dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(STATUS_DOCUMENT_SUFFIX))
        })
        .collect();
    documents.sort();

    let mut names: Vec<String> = Vec::new();
    let mut scanned = 0usize;
    for path in &documents {
        match read_location_names(path) {
            Ok(mut found) => {
                scanned += 1;
                names.append(&mut found);
            }
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    error = %format!("{e:#}"),
                    "skipping status document"
                );
            }
        }
    }

    let registry = BranchRegistry::from_names(names);
    let out_dir = output_dir.unwrap_or(input_dir);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    registry
        .save_artifacts(out_dir)
        .with_context(|| format!("writing branch artifacts into {}", out_dir.display()))?;

    println!(
        "registered {} branches from {} status documents into {}",
        registry.len(),
        scanned,
        out_dir.display()
    );
    Ok(())
}

fn read_location_names(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading status document {}", path.display()))?;
    let statuses: Vec<BookStatus> = serde_json::from_str(&content)
        .with_context(|| format!("parsing status document {}", path.display()))?;
    Ok(statuses
        .into_iter()
        .map(|status| status.location_identifier)
        .collect())
}
