//! Detail-page assembly: labeled metadata plus auxiliary link, image and
//! signature extraction for a single title.

use std::borrow::Cow;
use std::sync::LazyLock;

use aladi_core::BookInfo;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::fields::extract_by_label;
use crate::status::parse_status_table;
use crate::text::{clean_punctuation_spacing, decode_entities, normalize_title};
use crate::ParseContext;

static IMG_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]*src=["']([^"']+)["'][^>]*id="fitxa_imatge"[^>]*>"#)
        .expect("valid cover-id regex")
});
static IMG_HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)src="(https?://portadesbd\.diba\.cat[^"]*)""#).expect("valid cover-host regex")
});
static REQUEST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s+[^>]*href="([^"]*)"[^>]*>\s*<img[^>]*src="[^"]*/screens/img/botons/request[^"]*"[^>]*>"#)
        .expect("valid request-link regex")
});
static PERMALINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<a[^>]*id="recordnum"[^>]*href=["']([^"']+)["'][^>]*>"#)
        .expect("valid permalink regex")
});
static SIG_TABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<table[^>]*class="bibItems"[^>]*>.*?</table>"#)
        .expect("valid signature-table regex")
});
static SIG_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<td[^>]*width="18%"[^>]*>.*?</td>"#).expect("valid signature-cell regex")
});
static SIG_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<a[^>]*>([^<]+)</a>").expect("valid signature-link regex"));
static VOLUME_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<form[^>]*>.*?name="volume".*?</form>"#).expect("valid volume-form regex")
});
static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"action="([^"]*)""#).expect("valid action regex"));

/// A cover reference whose image query parameter is empty points at the
/// placeholder, not a real cover.
const EMPTY_COVER_PARAM: &str = "?i=&";
/// Tracking suffix the templates append to cover URLs.
const COVER_LOG_PARAM: &str = "&log=0&m=g";

/// Builds one [`BookInfo`] from a detail page. Every step is fault
/// tolerant; a missing field stays empty or absent.
///
/// When the page links to a separate all-statuses page (multi-volume
/// titles), `statuses` stays empty; otherwise the embedded availability
/// table is parsed in place.
pub(crate) fn parse_detail(page: &str, ctx: &ParseContext<'_>) -> BookInfo {
    let labels = &ctx.locale.labels;

    let all_status_link = extract_all_status_link(page);
    let statuses = if all_status_link.is_some() {
        Vec::new()
    } else {
        parse_status_table(page, ctx)
    };

    let title = normalize_title(&extract_by_label(page, &labels.title));
    if title.is_empty() {
        tracing::warn!("detail page yielded no title");
    }

    BookInfo {
        title,
        author: extract_by_label(page, &labels.author),
        publication: clean_punctuation_spacing(&extract_by_label(page, &labels.publication)),
        edition: extract_by_label(page, &labels.edition),
        description: clean_punctuation_spacing(&extract_by_label(page, &labels.description)),
        collection: clean_punctuation_spacing(&extract_by_label(page, &labels.collection)),
        summary: extract_by_label(page, &labels.summary),
        uniform_title: extract_by_label(page, &labels.uniform_title),
        isbn: extract_by_label(page, &labels.isbn).parse::<i64>().ok(),
        image_url: extract_image_url(page),
        permanent_link: extract_permanent_link(page),
        request_link: extract_request_link(page),
        all_status_link,
        signature: extract_signature(page),
        statuses,
    }
}

/// Cover URL, by the dedicated image id first, then any reference to the
/// cover host.
fn extract_image_url(page: &str) -> Option<String> {
    let url = IMG_ID_RE
        .captures(page)
        .or_else(|| IMG_HOST_RE.captures(page))
        .map(|caps| caps[1].to_string())?;

    if url.contains(EMPTY_COVER_PARAM) {
        tracing::debug!("cover reference has an empty image parameter, treating as no cover");
        return None;
    }
    Some(url.replacen(COVER_LOG_PARAM, "", 1))
}

fn extract_request_link(page: &str) -> Option<String> {
    REQUEST_RE
        .captures(page)
        .map(|caps| decode_url(&caps[1]))
}

fn extract_permanent_link(page: &str) -> Option<String> {
    PERMALINK_RE.captures(page).map(|caps| caps[1].to_string())
}

/// First non-empty shelf mark across all availability rows, not just the
/// first row.
fn extract_signature(page: &str) -> Option<String> {
    let table = SIG_TABLE_RE.find(page)?.as_str();

    for cell in SIG_CELL_RE.find_iter(table) {
        if let Some(caps) = SIG_LINK_RE.captures(cell.as_str()) {
            let signature = decode_entities(caps[1].trim());
            if !signature.is_empty() {
                return Some(signature);
            }
        }
    }
    None
}

/// Action of the form carrying the `volume` field, URL-decoded. Present
/// only on multi-volume titles.
fn extract_all_status_link(page: &str) -> Option<String> {
    let form = VOLUME_FORM_RE.find(page)?.as_str();
    ACTION_RE.captures(form).map(|caps| decode_url(&caps[1]))
}

fn decode_url(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map_or_else(|_| raw.to_string(), Cow::into_owned)
}
