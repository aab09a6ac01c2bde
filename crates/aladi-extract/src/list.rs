//! List-page segmentation: splits a result page into per-entry fragments
//! and extracts one record per entry.

use std::sync::LazyLock;

use aladi_core::{BookListItem, BookListResults};
use regex::Regex;

use crate::status::parse_status_table;
use crate::text::{decode_entities, strip_tags};
use crate::ParseContext;

/// Opens every result entry.
const ENTRY_MARKER: &str = r#"<div class="briefcitEntryNum">"#;
/// Closes the result section after the last entry.
const SECTION_END_MARKER: &str = "<!-- Fi briefcit_cat -->";
/// Older templates end the section with a bare rule instead.
const RULE_MARKER: &str = "<hr />";

static TITULAR_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<span class="titular">\s*<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#)
        .expect("valid titular-span regex")
});
static DOUBLE_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*href="([^"]*)"[^>]*class="[^"]*"[^>]*>(.*?)</a>\s*<a[^>]*href"#)
        .expect("valid double-anchor regex")
});
static FULL_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]*href="([^"]*)"[^>]*>([^<]+)<span class="fullRecordStyle">"#)
        .expect("valid full-record regex")
});
static FRAMESET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a[^>]*href="([^"]*/frameset[^"]*)"[^>]*>([^<]+)</a>"#)
        .expect("valid frameset regex")
});
static INFO_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\+ info\s*$").expect("valid info-suffix regex"));
static IMG_COVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]*src="([^"]*portadesbd[^"]*)"[^>]*>"#).expect("valid cover regex")
});
static IMG_CONTAINER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<div class="brief_portada">[^<]*<img[^>]*src="([^"]*)"[^>]*>"#)
        .expect("valid cover-container regex")
});
static AUTHOR_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br />\s*([^<]+?)\s*<br />").expect("valid author regex"));
static AUTHOR_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br />\s*([A-Z][a-z]+,\s*[A-Z][a-z]+(?:\s*[A-Z][a-z]+)?)\s*<br />")
        .expect("valid author-name regex")
});
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})</div>").expect("valid year regex"));
static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*-\s*\d+\s+(?:de|of)\s+(\d+)").expect("valid total regex")
});
static NEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<a[^>]*href="([^"]*)"[^>]*>\s*<img[^>]*src="[^"]*/screens/img/botons/(?:seguent|siguiente|next)[^"]*""#,
    )
    .expect("valid next-button regex")
});

struct TitleMatch {
    link: String,
    raw_title: String,
}

type TitleStrategy = fn(&str) -> Option<TitleMatch>;

/// Title/link patterns, tried left to right; the first strategy yielding
/// a non-empty cleaned title wins.
const TITLE_STRATEGIES: &[(&str, TitleStrategy)] = &[
    ("titular-span", title_from_titular_span),
    ("double-anchor", title_from_double_anchor),
    ("full-record-marker", title_from_full_record_marker),
    ("frameset-link", title_from_frameset_link),
];

/// Splits a result page into entries and collects the parseable ones.
///
/// The total count comes from the browse header when the page states one
/// (`1 - 12 de 343`), otherwise it falls back to the number of extracted
/// entries.
pub(crate) fn parse_list(page: &str, ctx: &ParseContext<'_>) -> BookListResults {
    let mut items = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = page[cursor..].find(ENTRY_MARKER) {
        let start = cursor + rel;
        let search_from = start + ENTRY_MARKER.len();
        let end = page[search_from..]
            .find(ENTRY_MARKER)
            .map(|i| search_from + i)
            .or_else(|| page[start..].find(SECTION_END_MARKER).map(|i| start + i))
            .or_else(|| page[start..].find(RULE_MARKER).map(|i| start + i))
            .unwrap_or(page.len());

        let fragment = &page[start..end];
        match parse_entry(fragment, ctx) {
            Some(item) => items.push(item),
            None => tracing::warn!("discarding list entry without a resolvable title"),
        }
        cursor = end;
    }

    if items.is_empty() {
        tracing::warn!("list page yielded no entries");
    }

    let total_results = extract_total(page).unwrap_or(items.len());
    BookListResults {
        total_results,
        next_page: extract_next_page(page),
        items,
    }
}

fn parse_entry(fragment: &str, ctx: &ParseContext<'_>) -> Option<BookListItem> {
    let (title, detail_link) = extract_title(fragment)?;

    Some(BookListItem {
        title,
        image_url: extract_entry_image(fragment).unwrap_or_default(),
        detail_link,
        author: extract_author(fragment),
        year: YEAR_RE.captures(fragment).map(|c| c[1].to_string()),
        statuses: parse_status_table(fragment, ctx),
    })
}

fn extract_title(fragment: &str) -> Option<(String, String)> {
    for (name, strategy) in TITLE_STRATEGIES {
        let Some(m) = strategy(fragment) else {
            continue;
        };
        let title = clean_title(&m.raw_title);
        if title.is_empty() {
            continue;
        }
        tracing::debug!(strategy = name, "matched list-entry title pattern");
        return Some((title, m.link));
    }
    None
}

fn title_from_titular_span(fragment: &str) -> Option<TitleMatch> {
    TITULAR_SPAN_RE.captures(fragment).map(|c| TitleMatch {
        link: c[1].to_string(),
        raw_title: c[2].to_string(),
    })
}

fn title_from_double_anchor(fragment: &str) -> Option<TitleMatch> {
    DOUBLE_ANCHOR_RE.captures(fragment).map(|c| TitleMatch {
        link: c[1].to_string(),
        raw_title: c[2].to_string(),
    })
}

fn title_from_full_record_marker(fragment: &str) -> Option<TitleMatch> {
    FULL_RECORD_RE.captures(fragment).map(|c| TitleMatch {
        link: c[1].to_string(),
        raw_title: c[2].to_string(),
    })
}

fn title_from_frameset_link(fragment: &str) -> Option<TitleMatch> {
    FRAMESET_RE.captures(fragment).map(|c| TitleMatch {
        link: c[1].to_string(),
        raw_title: c[2].to_string(),
    })
}

fn clean_title(raw: &str) -> String {
    let text = decode_entities(&strip_tags(raw));
    INFO_SUFFIX_RE.replace(text.trim(), "").into_owned()
}

fn extract_entry_image(fragment: &str) -> Option<String> {
    IMG_COVER_RE
        .captures(fragment)
        .or_else(|| IMG_CONTAINER_RE.captures(fragment))
        .map(|c| c[1].to_string())
}

fn extract_author(fragment: &str) -> Option<String> {
    for re in [&AUTHOR_LINE_RE, &AUTHOR_NAME_RE] {
        if let Some(caps) = re.captures(fragment) {
            let author = decode_entities(caps[1].trim());
            if !author.is_empty() {
                return Some(author);
            }
        }
    }
    None
}

fn extract_total(page: &str) -> Option<usize> {
    TOTAL_RE.captures(page).and_then(|c| c[1].parse().ok())
}

fn extract_next_page(page: &str) -> Option<String> {
    NEXT_RE.captures(page).map(|c| c[1].to_string())
}
