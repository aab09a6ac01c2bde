//! The `process` command: classify every capture in a directory and write
//! the extracted JSON documents next to it.
//!
//! Per-file failures are logged and skipped rather than propagated so one
//! bad capture does not abort the full run.

use std::fs;
use std::path::{Path, PathBuf};

use aladi_core::{BranchRegistry, LocaleMap, PageKind};
use aladi_extract::Extractor;
use anyhow::Context;
use serde::Serialize;

#[derive(Debug, Default)]
struct RunSummary {
    lists: usize,
    details: usize,
    no_results: usize,
    failed: usize,
}

impl RunSummary {
    fn processed(&self) -> usize {
        self.lists + self.details + self.no_results
    }
}

/// Runs a full extraction pass over `input_dir`.
///
/// Captures are files named `<name>.<language>.txt`; anything else in the
/// directory is ignored. List pages produce `<name>.book-list.json`;
/// detail pages produce `<name>.book-results.json` plus
/// `<name>.book-status.json`; no-results pages produce nothing.
///
/// # Errors
///
/// Returns an error if the locale table or branch artifact cannot be
/// loaded, a requested language is not configured, or the directories
/// cannot be read or created. Per-capture extraction failures are logged
/// and skipped, not propagated.
pub(crate) fn run(
    input_dir: &Path,
    output_dir: Option<&Path>,
    languages: &[String],
    locales_path: Option<&Path>,
    branches_path: Option<&Path>,
) -> anyhow::Result<()> {
    let locales = match locales_path {
        Some(path) => LocaleMap::from_yaml_file(path)
            .with_context(|| format!("loading locale table from {}", path.display()))?,
        None => LocaleMap::builtin(),
    };
    let known: Vec<String> = locales.languages().map(str::to_string).collect();

    let selected: Vec<String> = if languages.is_empty() {
        known
    } else {
        for language in languages {
            if !known.iter().any(|k| k == language) {
                anyhow::bail!(
                    "language '{language}' is not in the locale table (configured: {})",
                    known.join(", ")
                );
            }
        }
        languages.to_vec()
    };

    let mut extractor = Extractor::new(locales);
    if let Some(path) = branches_path {
        let registry = BranchRegistry::from_name_id_file(path)
            .with_context(|| format!("loading branch artifact from {}", path.display()))?;
        tracing::info!(branches = registry.len(), "remapping locations to branch ids");
        extractor = extractor.with_branches(registry);
    }

    let out_dir = output_dir.unwrap_or(input_dir);
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let mut captures: Vec<PathBuf> = fs::read_dir(input_dir)
        .with_context(|| format!("reading capture directory {}", input_dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    captures.sort();

    let mut summary = RunSummary::default();
    for path in captures {
        let Some((base, language)) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| split_capture_name(n, &selected))
        else {
            continue;
        };

        match process_capture(&extractor, &path, &base, &language, out_dir) {
            Ok(PageKind::NoResults) => summary.no_results += 1,
            Ok(PageKind::List) => summary.lists += 1,
            Ok(PageKind::Detail) => summary.details += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(
                    file = %path.display(),
                    error = %format!("{e:#}"),
                    "skipping capture"
                );
            }
        }
    }

    println!(
        "processed {} captures: {} lists, {} details, {} without results, {} failed",
        summary.processed(),
        summary.lists,
        summary.details,
        summary.no_results,
        summary.failed
    );
    Ok(())
}

/// Splits a capture file name into its base name and language code.
///
/// The name must end in `.txt` and carry one of the configured language
/// codes as its last dotted segment; the base may itself contain dots.
pub(crate) fn split_capture_name(file_name: &str, languages: &[String]) -> Option<(String, String)> {
    let stem = file_name.strip_suffix(".txt")?;
    let (base, language) = stem.rsplit_once('.')?;
    if base.is_empty() || !languages.iter().any(|l| l == language) {
        return None;
    }
    Some((base.to_string(), language.to_string()))
}

fn process_capture(
    extractor: &Extractor,
    path: &Path,
    base: &str,
    language: &str,
    out_dir: &Path,
) -> anyhow::Result<PageKind> {
    let page = fs::read_to_string(path)
        .with_context(|| format!("reading capture {}", path.display()))?;

    let kind = extractor.classify(&page, language)?;
    tracing::info!(file = %path.display(), language, kind = %kind, "classified capture");

    match kind {
        PageKind::NoResults => {}
        PageKind::List => {
            let results = extractor.parse_list(&page, language)?;
            write_document(out_dir, base, "book-list", &results)?;
        }
        PageKind::Detail => {
            let info = extractor.parse_detail(&page, language)?;
            write_document(out_dir, base, "book-results", &info)?;
            // The status document is written even when the detail page
            // defers its availability to a separate all-statuses page; an
            // empty list is a valid extraction outcome.
            let statuses = extractor.parse_status_table(&page, language)?;
            write_document(out_dir, base, "book-status", &statuses)?;
        }
    }
    Ok(kind)
}

fn write_document<T: Serialize>(
    dir: &Path,
    base: &str,
    suffix: &str,
    value: &T,
) -> anyhow::Result<()> {
    let path = dir.join(format!("{base}.{suffix}.json"));
    let json = serde_json::to_string_pretty(value)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(file = %path.display(), "wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // split_capture_name
    // -----------------------------------------------------------------------

    #[test]
    fn capture_name_splits_base_and_language() {
        let langs = codes(&["ca", "en", "es"]);
        assert_eq!(
            split_capture_name("fons1.ca.txt", &langs),
            Some(("fons1".to_string(), "ca".to_string()))
        );
    }

    #[test]
    fn capture_base_may_contain_dots() {
        let langs = codes(&["ca"]);
        assert_eq!(
            split_capture_name("arxiu.vell.ca.txt", &langs),
            Some(("arxiu.vell".to_string(), "ca".to_string()))
        );
    }

    #[test]
    fn unknown_language_and_bad_shapes_are_rejected() {
        let langs = codes(&["ca", "es"]);
        assert_eq!(split_capture_name("fons1.fr.txt", &langs), None);
        assert_eq!(split_capture_name("fons1.txt", &langs), None);
        assert_eq!(split_capture_name("fons1.ca.json", &langs), None);
        assert_eq!(split_capture_name(".ca.txt", &langs), None);
    }

    // -----------------------------------------------------------------------
    // run
    // -----------------------------------------------------------------------

    const DETAIL_CAPTURE: &str = r#"<html><body>
<table><tr><td class="bibInfoLabel">Títol</td><td class="bibInfoData">Contes / Pere Calders</td></tr></table>
<table class="bibItems"><tr class="bibItemsEntry"><td>GIRONA.Central</td><td>N Cal</td><td>DISPONIBLE</td><td></td></tr></table>
</body></html>"#;

    const LIST_CAPTURE: &str = r#"<html><body>Ordenat per data
<div class="briefcitEntryNum">1</div>
<span class="titular"> <a href="/record=b1~S9*cat">Contes + info</a></span>
<hr />
</body></html>"#;

    const NO_RESULTS_CAPTURE: &str = "<html><body>NO HI HA RESULTATS</body></html>";

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn processes_a_capture_directory_end_to_end() {
        let dir = std::env::temp_dir().join(format!("aladi-process-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("fons1.ca.txt"), DETAIL_CAPTURE).unwrap();
        fs::write(dir.join("cerca1.ca.txt"), LIST_CAPTURE).unwrap();
        fs::write(dir.join("cerca2.ca.txt"), NO_RESULTS_CAPTURE).unwrap();
        fs::write(dir.join("orphan.txt"), "not a capture").unwrap();

        run(&dir, None, &[], None, None).unwrap();

        let info = read_json(&dir.join("fons1.book-results.json"));
        assert_eq!(info["title"], "Contes");
        let statuses = read_json(&dir.join("fons1.book-status.json"));
        assert_eq!(statuses[0]["locationIdentifier"], "GIRONA.Central");
        assert_eq!(statuses[0]["statusCode"], "available");

        let list = read_json(&dir.join("cerca1.book-list.json"));
        assert_eq!(list["totalResults"], 1);
        assert_eq!(list["items"][0]["title"], "Contes");

        // No-results pages and non-capture files produce no documents.
        assert!(!dir.join("cerca2.book-list.json").exists());
        assert!(!dir.join("cerca2.book-results.json").exists());
        assert!(!dir.join("orphan.book-results.json").exists());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn unconfigured_requested_language_aborts_the_run() {
        let dir = std::env::temp_dir().join(format!("aladi-process-lang-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let err = run(&dir, None, &codes(&["fr"]), None, None).unwrap_err();
        assert!(err.to_string().contains("'fr'"));

        fs::remove_dir_all(&dir).ok();
    }
}
