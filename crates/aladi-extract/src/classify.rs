//! Page-kind detection from locale markers.

use aladi_core::{LocaleSpec, PageKind};

/// Picks the page kind by marker substring. The no-results check runs
/// before the list check; some locales' no-results pages also contain
/// list-marker text.
pub(crate) fn page_kind(page: &str, locale: &LocaleSpec) -> PageKind {
    if page.contains(&locale.markers.no_results) {
        return PageKind::NoResults;
    }
    if page.contains(&locale.markers.list) {
        return PageKind::List;
    }
    PageKind::Detail
}

#[cfg(test)]
mod tests {
    use aladi_core::LocaleMap;

    use super::*;

    fn locale(code: &str) -> LocaleSpec {
        LocaleMap::builtin().get(code).unwrap().clone()
    }

    #[test]
    fn no_results_marker_wins_for_every_language() {
        let map = LocaleMap::builtin();
        for code in ["ca", "es", "en"] {
            let spec = map.get(code).unwrap();
            let page = format!(
                "<body>{} ... {}</body>",
                spec.markers.no_results, spec.markers.list
            );
            assert_eq!(page_kind(&page, spec), PageKind::NoResults, "lang {code}");
        }
    }

    #[test]
    fn list_marker_selects_list() {
        let spec = locale("ca");
        assert_eq!(
            page_kind("<body>Ordenat per data</body>", &spec),
            PageKind::List
        );
    }

    #[test]
    fn no_marker_defaults_to_detail() {
        let spec = locale("en");
        assert_eq!(
            page_kind("<body>plain record page</body>", &spec),
            PageKind::Detail
        );
    }

    #[test]
    fn markers_from_another_language_do_not_match() {
        let es = locale("es");
        assert_eq!(
            page_kind("<body>NO ENTRIES FOUND</body>", &es),
            PageKind::Detail
        );
    }
}
