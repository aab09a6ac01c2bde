use aladi_core::{
    BookInfo, BookListResults, BookStatus, BranchRegistry, LocaleMap, LocaleSpec, PageKind,
};

use crate::error::ExtractError;
use crate::status::DEFAULT_HYPHEN_EXCEPTIONS;
use crate::{classify, detail, list, status};

/// Per-call inputs threaded through the page parsers.
pub(crate) struct ParseContext<'a> {
    pub locale: &'a LocaleSpec,
    pub hyphen_exceptions: &'a [String],
    pub branches: Option<&'a BranchRegistry>,
}

/// Catalogue page extractor for one OPAC installation.
///
/// Holds the locale table plus the optional branch registry and the
/// location-suffix exception list, and resolves the locale for each call
/// from the requested language code. All extraction is offline: callers
/// pass page text they fetched (or stored) themselves.
pub struct Extractor {
    locales: LocaleMap,
    branches: Option<BranchRegistry>,
    hyphen_exceptions: Vec<String>,
}

impl Extractor {
    /// Creates an extractor over the given locale table.
    ///
    /// Starts with no branch registry and the built-in location-suffix
    /// exceptions ([`DEFAULT_HYPHEN_EXCEPTIONS`]).
    #[must_use]
    pub fn new(locales: LocaleMap) -> Self {
        Self {
            locales,
            branches: None,
            hyphen_exceptions: DEFAULT_HYPHEN_EXCEPTIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }

    /// Remaps extracted location names to stable numeric ids.
    ///
    /// Locations missing from the registry keep their extracted name.
    #[must_use]
    pub fn with_branches(mut self, branches: BranchRegistry) -> Self {
        self.branches = Some(branches);
        self
    }

    /// Replaces the location-suffix exception list.
    ///
    /// A location whose post-hyphen suffix starts with one of these strings
    /// keeps its hyphenated form instead of being truncated.
    #[must_use]
    pub fn with_hyphen_exceptions(mut self, exceptions: Vec<String>) -> Self {
        self.hyphen_exceptions = exceptions;
        self
    }

    /// Determines whether a page is a no-results notice, a result list, or
    /// a single-record detail view.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnknownLanguage`] if `language` has no locale
    /// entry.
    pub fn classify(&self, page: &str, language: &str) -> Result<PageKind, ExtractError> {
        let ctx = self.context(language)?;
        Ok(classify::page_kind(page, ctx.locale))
    }

    /// Extracts the full record from a detail page.
    ///
    /// Fields absent from the page come back empty or `None`; the embedded
    /// availability table is parsed unless the page links out to a separate
    /// holdings view.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnknownLanguage`] if `language` has no locale
    /// entry.
    pub fn parse_detail(&self, page: &str, language: &str) -> Result<BookInfo, ExtractError> {
        let ctx = self.context(language)?;
        Ok(detail::parse_detail(page, &ctx))
    }

    /// Extracts every result entry from a list page.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnknownLanguage`] if `language` has no locale
    /// entry.
    pub fn parse_list(&self, page: &str, language: &str) -> Result<BookListResults, ExtractError> {
        let ctx = self.context(language)?;
        Ok(list::parse_list(page, &ctx))
    }

    /// Extracts the per-copy availability rows from any page holding an
    /// items table.
    ///
    /// Pages without a table yield an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::UnknownLanguage`] if `language` has no locale
    /// entry.
    pub fn parse_status_table(
        &self,
        page: &str,
        language: &str,
    ) -> Result<Vec<BookStatus>, ExtractError> {
        let ctx = self.context(language)?;
        Ok(status::parse_status_table(page, &ctx))
    }

    fn context(&self, language: &str) -> Result<ParseContext<'_>, ExtractError> {
        let locale = self
            .locales
            .get(language)
            .ok_or_else(|| ExtractError::UnknownLanguage {
                language: language.to_string(),
            })?;
        Ok(ParseContext {
            locale,
            hyphen_exceptions: &self.hyphen_exceptions,
            branches: self.branches.as_ref(),
        })
    }
}
