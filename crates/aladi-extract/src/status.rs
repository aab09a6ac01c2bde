//! Availability-table parsing: one record per physical-location row.

use std::sync::LazyLock;

use aladi_core::{BookStatus, StatusCode, StatusVocabulary};
use regex::Regex;

use crate::text::{clean_punctuation_spacing, decode_entities, strip_tags};
use crate::ParseContext;

static TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<table[^>]*class="bibItems"[^>]*>(.*?)</table>"#).expect("valid table regex")
});
static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<tr[^>]*class="bibItemsEntry"[^>]*>(.*?)</tr>"#).expect("valid row regex")
});
static CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<td[^>]*>(.*?)</td>").expect("valid cell regex"));

/// Location names where the text after the last hyphen is part of the
/// proper noun, not a branch-suffix separator. Grows as new catalog data
/// is observed; override via [`crate::Extractor::with_hyphen_exceptions`].
pub const DEFAULT_HYPHEN_EXCEPTIONS: &[&str] = &["SOLITÀ", "SOLITA"];

/// Ordered literal rewrites that normalize the volume abbreviation in the
/// notes column. Applied top to bottom, first occurrence each.
const NOTE_REWRITES: &[(&str, &str)] = &[
    ("v.", "V."),
    ("V;", "V."),
    ("V. 0", "V."),
    ("V. ", "V."),
];

/// A note reduced to the bare abbreviation letter means the first volume.
const BARE_VOLUME_NOTE: &str = "V";
const BARE_VOLUME_EXPANSION: &str = "V.1";

/// Extracts all per-location rows from the availability table.
///
/// Returns an empty list when the page has no table; a book with no
/// copies is a valid end state. Rows with fewer than four cells are
/// dropped.
pub(crate) fn parse_status_table(page: &str, ctx: &ParseContext<'_>) -> Vec<BookStatus> {
    let Some(table) = TABLE_RE.captures(page) else {
        return Vec::new();
    };
    let table = table.get(1).map_or("", |m| m.as_str());

    let mut statuses = Vec::new();
    for row in ROW_RE.captures_iter(table) {
        let row = row.get(1).map_or("", |m| m.as_str());
        let cells: Vec<String> = CELL_RE
            .captures_iter(row)
            .map(|c| decode_entities(&strip_tags(&c[1])).trim().to_string())
            .collect();

        if cells.len() < 4 {
            tracing::warn!(cells = cells.len(), "dropping availability row with too few cells");
            continue;
        }

        let location = normalize_location(&cells[0], ctx.hyphen_exceptions);
        let location_identifier = match ctx.branches.and_then(|b| b.id_for(&location)) {
            Some(id) => id.to_string(),
            None => location,
        };

        let status_code = classify_status(&cells[2], &ctx.locale.status);
        let status_text = (status_code != StatusCode::Available && !cells[2].is_empty())
            .then(|| cells[2].clone());

        statuses.push(BookStatus {
            location_identifier,
            status_code,
            status_text,
            signature: (!cells[1].is_empty()).then(|| cells[1].clone()),
            notes: (!cells[3].is_empty()).then(|| clean_note(&cells[3])),
        });
    }

    statuses
}

/// Branch names often read `TOWN.Branch-Section`; the last hyphen suffix
/// is a section qualifier and gets cut, unless the suffix starts with a
/// known exception substring. Trailing free text after a line break is
/// always dropped.
fn normalize_location(text: &str, exceptions: &[String]) -> String {
    let mut name = text;
    if let Some(idx) = name.rfind('-') {
        let after = &name[idx + 1..];
        if !exceptions.iter().any(|e| after.starts_with(e.as_str())) {
            name = &name[..idx];
        }
    }
    name.split(['\r', '\n'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Exact match for the fixed vocabulary words; substring match for the
/// on-loan phrase, whose column text appends a variable due date.
fn classify_status(text: &str, vocab: &StatusVocabulary) -> StatusCode {
    if text == vocab.available {
        StatusCode::Available
    } else if text == vocab.waiting_for_retrieve {
        StatusCode::WaitingForRetrieve
    } else if text == vocab.excluded {
        StatusCode::Excluded
    } else if text.contains(&vocab.on_loan) {
        StatusCode::OnLoan
    } else {
        StatusCode::Other
    }
}

fn clean_note(text: &str) -> String {
    let mut note = clean_punctuation_spacing(text);
    for (pattern, replacement) in NOTE_REWRITES {
        note = note.replacen(pattern, replacement, 1);
    }
    if note == BARE_VOLUME_NOTE {
        note = BARE_VOLUME_EXPANSION.to_string();
    }
    note
}

#[cfg(test)]
mod tests {
    use aladi_core::{BranchRegistry, LocaleMap, LocaleSpec};

    use super::*;

    fn locale(code: &str) -> LocaleSpec {
        LocaleMap::builtin().get(code).unwrap().clone()
    }

    fn default_exceptions() -> Vec<String> {
        DEFAULT_HYPHEN_EXCEPTIONS
            .iter()
            .map(|s| (*s).to_string())
            .collect()
    }

    fn make_row(location: &str, signature: &str, status: &str, notes: &str) -> String {
        format!(
            r#"<tr class="bibItemsEntry"><td width="34%"><a href="/s">{location}</a></td><td width="18%"><a>{signature}</a></td><td width="24%">{status}</td><td width="24%">{notes}</td></tr>"#
        )
    }

    fn make_table(rows: &str) -> String {
        format!(r#"<div><table class="bibItems" border="0">{rows}</table></div>"#)
    }

    // -----------------------------------------------------------------------
    // normalize_location
    // -----------------------------------------------------------------------

    #[test]
    fn location_cut_at_last_hyphen() {
        let exceptions = default_exceptions();
        assert_eq!(
            normalize_location("SABADELL.La Serra-Infantil", &exceptions),
            "SABADELL.La Serra"
        );
    }

    #[test]
    fn location_exception_suffixes_stay_intact() {
        let exceptions = default_exceptions();
        assert_eq!(
            normalize_location("PALAU-SOLITÀ I PLEGAMANS", &exceptions),
            "PALAU-SOLITÀ I PLEGAMANS"
        );
        assert_eq!(
            normalize_location("PALAU-SOLITA I PLEGAMANS", &exceptions),
            "PALAU-SOLITA I PLEGAMANS"
        );
    }

    #[test]
    fn location_keeps_only_the_first_line() {
        let exceptions = default_exceptions();
        assert_eq!(
            normalize_location("GIRONA.Central\nConsulteu disponibilitat", &exceptions),
            "GIRONA.Central"
        );
        assert_eq!(
            normalize_location("GIRONA.Central\r\nmés text", &exceptions),
            "GIRONA.Central"
        );
    }

    #[test]
    fn location_without_hyphen_is_trimmed_only() {
        let exceptions = default_exceptions();
        assert_eq!(normalize_location("  TERRASSA.Districte 2 ", &exceptions), "TERRASSA.Districte 2");
        assert_eq!(normalize_location("", &exceptions), "");
    }

    // -----------------------------------------------------------------------
    // classify_status
    // -----------------------------------------------------------------------

    #[test]
    fn exact_vocabulary_words_classify() {
        let vocab = &locale("ca").status;
        assert_eq!(classify_status("DISPONIBLE", vocab), StatusCode::Available);
        assert_eq!(
            classify_status("PENDENT DE RECOLLIR", vocab),
            StatusCode::WaitingForRetrieve
        );
        assert_eq!(
            classify_status("EXCLÒS DE PRÉSTEC", vocab),
            StatusCode::Excluded
        );
    }

    #[test]
    fn on_loan_matches_with_any_due_date_suffix() {
        let vocab = &locale("ca").status;
        assert_eq!(classify_status("VENÇ 12-05-24", vocab), StatusCode::OnLoan);
        assert_eq!(classify_status("VENÇ 01-01-99", vocab), StatusCode::OnLoan);
    }

    #[test]
    fn unrecognized_status_is_other() {
        let vocab = &locale("ca").status;
        assert_eq!(classify_status("EN PROCÉS", vocab), StatusCode::Other);
        assert_eq!(classify_status("", vocab), StatusCode::Other);
    }

    #[test]
    fn spanish_and_english_vocabularies_classify() {
        let es = &locale("es").status;
        assert_eq!(classify_status("DISPONIBLE", es), StatusCode::Available);
        assert_eq!(classify_status("VENCE 03-11-24", es), StatusCode::OnLoan);

        let en = &locale("en").status;
        assert_eq!(classify_status("AVAILABLE", en), StatusCode::Available);
        assert_eq!(classify_status("LIB USE ONLY", en), StatusCode::Excluded);
    }

    // -----------------------------------------------------------------------
    // clean_note
    // -----------------------------------------------------------------------

    #[test]
    fn note_volume_abbreviation_variants_normalize() {
        assert_eq!(clean_note("v. 2"), "V.2");
        assert_eq!(clean_note("V; 3"), "V.3");
        assert_eq!(clean_note("V. 02"), "V.2");
        assert_eq!(clean_note("V. 7"), "V.7");
    }

    #[test]
    fn note_bare_letter_expands_to_first_volume() {
        assert_eq!(clean_note("V"), "V.1");
        assert_eq!(clean_note(" V "), "V.1");
    }

    #[test]
    fn note_unrelated_text_only_gets_spacing_cleanup() {
        assert_eq!(clean_note("Exemplar  malmès ,consulteu"), "Exemplar malmès, consulteu");
    }

    // -----------------------------------------------------------------------
    // parse_status_table
    // -----------------------------------------------------------------------

    #[test]
    fn parses_rows_into_statuses() {
        let spec = locale("ca");
        let exceptions = default_exceptions();
        let ctx = ParseContext {
            locale: &spec,
            hyphen_exceptions: &exceptions,
            branches: None,
        };

        let rows = [
            make_row("GIRONA.Central-Infantil", "JI Rod", "DISPONIBLE", ""),
            make_row("FIGUERES.Fages de Climent", "N Rod", "VENÇ 12-05-24", "v. 2"),
        ]
        .concat();
        let page = make_table(&rows);

        let statuses = parse_status_table(&page, &ctx);
        assert_eq!(statuses.len(), 2);

        assert_eq!(statuses[0].location_identifier, "GIRONA.Central");
        assert_eq!(statuses[0].status_code, StatusCode::Available);
        assert_eq!(statuses[0].status_text, None);
        assert_eq!(statuses[0].signature.as_deref(), Some("JI Rod"));
        assert_eq!(statuses[0].notes, None);

        assert_eq!(statuses[1].location_identifier, "FIGUERES.Fages de Climent");
        assert_eq!(statuses[1].status_code, StatusCode::OnLoan);
        assert_eq!(statuses[1].status_text.as_deref(), Some("VENÇ 12-05-24"));
        assert_eq!(statuses[1].notes.as_deref(), Some("V.2"));
    }

    #[test]
    fn rows_with_too_few_cells_are_dropped() {
        let spec = locale("ca");
        let exceptions = default_exceptions();
        let ctx = ParseContext {
            locale: &spec,
            hyphen_exceptions: &exceptions,
            branches: None,
        };

        let rows = format!(
            r#"<tr class="bibItemsEntry"><td>GIRONA</td><td>sig</td></tr>{}"#,
            make_row("OLOT.Marià Vayreda", "", "DISPONIBLE", "")
        );
        let page = make_table(&rows);

        let statuses = parse_status_table(&page, &ctx);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].location_identifier, "OLOT.Marià Vayreda");
        assert_eq!(statuses[0].signature, None);
    }

    #[test]
    fn missing_table_yields_empty_list() {
        let spec = locale("ca");
        let exceptions = default_exceptions();
        let ctx = ParseContext {
            locale: &spec,
            hyphen_exceptions: &exceptions,
            branches: None,
        };
        assert!(parse_status_table("<html><body>cap copia</body></html>", &ctx).is_empty());
    }

    #[test]
    fn registered_branch_names_map_to_ids() {
        let spec = locale("ca");
        let exceptions = default_exceptions();
        let registry = BranchRegistry::from_names(["FIGUERES.Fages de Climent", "GIRONA.Central"]);
        let ctx = ParseContext {
            locale: &spec,
            hyphen_exceptions: &exceptions,
            branches: Some(&registry),
        };

        let rows = [
            make_row("GIRONA.Central", "", "DISPONIBLE", ""),
            make_row("LLAGOSTERA", "", "DISPONIBLE", ""),
        ]
        .concat();
        let page = make_table(&rows);

        let statuses = parse_status_table(&page, &ctx);
        assert_eq!(statuses[0].location_identifier, "20");
        // Unmapped names keep the raw name, never dropped.
        assert_eq!(statuses[1].location_identifier, "LLAGOSTERA");
    }

    #[test]
    fn cell_text_is_stripped_decoded_and_trimmed() {
        let spec = locale("es");
        let exceptions = default_exceptions();
        let ctx = ParseContext {
            locale: &spec,
            hyphen_exceptions: &exceptions,
            branches: None,
        };

        let row = r#"<tr class="bibItemsEntry"><td> <a href="/s">MATAR&#211;</a>&nbsp;</td><td><a>JN&nbsp;Rod</a></td><td>DISPONIBLE</td><td></td></tr>"#;
        let page = make_table(row);

        let statuses = parse_status_table(&page, &ctx);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].location_identifier, "MATARÓ");
        assert_eq!(statuses[0].signature.as_deref(), Some("JN Rod"));
    }
}
