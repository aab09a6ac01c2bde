//! Labeled-field extraction from metadata tables.

use regex::Regex;

use crate::text::{decode_entities, strip_tags};

/// Returns the cleaned text of the data cell paired with `label`, or an
/// empty string when the label or the cell structure is absent.
///
/// Metadata rows pair a `bibInfoLabel` cell with a following `bibInfoData`
/// cell; only the first occurrence of the label counts. The label is
/// matched against raw markup, so entity-encoded labels must be passed in
/// their entity form.
#[must_use]
pub fn extract_by_label(page: &str, label: &str) -> String {
    let pattern = format!(
        r#"(?is)class="bibInfoLabel"[^>]*>\s*{}\s*<[^>]*>[^<]*<td[^>]*class="bibInfoData"[^>]*>(.*?)</td>"#,
        regex::escape(label)
    );
    let re = Regex::new(&pattern).expect("valid label regex");

    match re.captures(page) {
        Some(caps) => decode_entities(strip_tags(&caps[1]).trim()),
        None => String::new(),
    }
}
