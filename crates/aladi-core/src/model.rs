//! Record types produced by the extraction engine.
//!
//! ## Observed shape from live catalog captures
//!
//! ### Field labels
//! Book metadata sits in two-column tables: a `bibInfoLabel` cell holding the
//! translated label and a `bibInfoData` cell holding the value. Labels are
//! matched against the *raw* markup, so a label string may itself contain
//! entities (Catalan `Col&middot;lecci&oacute;`).
//!
//! ### Status text
//! The availability column holds either a fixed vocabulary word
//! (`DISPONIBLE`) or an on-loan phrase with a variable due date appended
//! (`VENÇ 12-05-24`), which is why on-loan classification is a substring
//! match while everything else is exact.
//!
//! ### Optional links
//! Detail pages for multi-volume titles carry a form (with a `volume` input)
//! pointing at a separate all-statuses page instead of embedding the
//! availability table. When that link is present the embedded `statuses`
//! list stays empty and the caller is expected to fetch the linked page.

use serde::{Deserialize, Serialize};

/// The kind of catalog page a capture contains. Derived per page, never
/// stored in output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// A search that matched nothing.
    NoResults,
    /// A multi-entry search-result page.
    List,
    /// A single-title page with metadata and (usually) availability.
    Detail,
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageKind::NoResults => write!(f, "no-results"),
            PageKind::List => write!(f, "list"),
            PageKind::Detail => write!(f, "detail"),
        }
    }
}

/// Normalized availability state for one copy at one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusCode {
    Available,
    OnLoan,
    Excluded,
    WaitingForRetrieve,
    Other,
}

/// One row of the availability table: a single physical copy at a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStatus {
    /// Branch name as printed on the page, or its numeric id when a branch
    /// registry mapping exists for the name.
    pub location_identifier: String,
    pub status_code: StatusCode,
    /// The raw status column text. Present only when the code is not
    /// [`StatusCode::Available`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    /// Shelf mark, verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Full metadata for one title, from a detail page.
///
/// Scalar fields default to the empty string when the page lacks the
/// corresponding labeled row; a missing field is a data-quality outcome,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInfo {
    pub title: String,
    pub author: String,
    pub publication: String,
    pub edition: String,
    pub description: String,
    pub collection: String,
    pub summary: String,
    pub uniform_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_link: Option<String>,
    /// Link to the separate all-branches availability page, when the title
    /// is split across volumes. Mutually exclusive with a non-empty
    /// `statuses` list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_status_link: Option<String>,
    /// First non-empty shelf mark found across the availability rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Embedded availability, populated only when the page carries its own
    /// status table (no `all_status_link`).
    pub statuses: Vec<BookStatus>,
}

/// One entry on a search-result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListItem {
    pub title: String,
    /// Cover image URL; empty when the entry has no cover.
    pub image_url: String,
    /// Link to the entry's detail page; empty when no link pattern matched.
    pub detail_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    pub statuses: Vec<BookStatus>,
}

/// A parsed search-result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookListResults {
    /// Total result count from the browse header when the page states one,
    /// otherwise the number of extracted entries.
    pub total_results: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    pub items: Vec<BookListItem>,
}
