//! Per-language label strings, page markers, and status vocabulary.
//!
//! Every pattern in the extraction engine is parameterized on a
//! [`LocaleSpec`]. The three catalog languages ship compiled in
//! ([`LocaleMap::builtin`]); a YAML file with the same shape can replace
//! them when the vendor templates change or a new language appears.
//!
//! Label strings are matched against the raw markup, before entity
//! decoding, so some built-in labels intentionally contain entities
//! exactly as the templates emit them (`Col&middot;lecci&oacute;`).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Labels of the metadata rows on a detail page, one per scalar field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLabels {
    pub title: String,
    pub author: String,
    pub publication: String,
    pub edition: String,
    pub description: String,
    pub collection: String,
    pub summary: String,
    pub uniform_title: String,
    pub isbn: String,
}

/// Substrings that identify a page kind. A detail page has no marker of
/// its own; it is the fallback when neither of these matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMarkers {
    pub no_results: String,
    pub list: String,
}

/// Status-column vocabulary. `on_loan` is a prefix phrase (the column
/// appends a due date to it); the other three are matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusVocabulary {
    pub available: String,
    pub excluded: String,
    pub on_loan: String,
    pub waiting_for_retrieve: String,
}

/// Everything the engine needs to know about one catalog language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSpec {
    pub labels: FieldLabels,
    pub markers: PageMarkers,
    pub status: StatusVocabulary,
}

/// The full language-code → [`LocaleSpec`] table. Immutable once built.
/// An unknown code is the caller's configuration error, never silently
/// mapped to a default language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleMap {
    locales: BTreeMap<String, LocaleSpec>,
}

impl LocaleMap {
    /// The compiled-in table for the three catalog languages.
    #[must_use]
    pub fn builtin() -> Self {
        let mut locales = BTreeMap::new();
        locales.insert("ca".to_string(), catalan());
        locales.insert("es".to_string(), spanish());
        locales.insert("en".to_string(), english());
        LocaleMap { locales }
    }

    /// Load and validate a locale table from a YAML file. Defining the
    /// same language code twice is a parse error.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails
    /// validation.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocalesFileIo {
            path: path.display().to_string(),
            source: e,
        })?;

        // Value parsing rejects duplicate mapping keys; a direct map
        // deserialization would keep only the last entry.
        let value: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(ConfigError::LocalesFileParse)?;
        let map: LocaleMap =
            serde_yaml::from_value(value).map_err(ConfigError::LocalesFileParse)?;
        map.validate()?;

        Ok(map)
    }

    /// Look up the spec for a language code. `None` means the code is not
    /// configured; callers surface that as their configuration error.
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&LocaleSpec> {
        self.locales.get(language)
    }

    /// Configured language codes, in sorted order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.locales.is_empty() {
            return Err(ConfigError::Validation(
                "locale map must contain at least one language".to_string(),
            ));
        }

        for (code, spec) in &self.locales {
            if code.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "language code must be non-empty".to_string(),
                ));
            }

            let required = [
                ("labels.title", &spec.labels.title),
                ("labels.author", &spec.labels.author),
                ("labels.publication", &spec.labels.publication),
                ("labels.edition", &spec.labels.edition),
                ("labels.description", &spec.labels.description),
                ("labels.collection", &spec.labels.collection),
                ("labels.summary", &spec.labels.summary),
                ("labels.uniformTitle", &spec.labels.uniform_title),
                ("labels.isbn", &spec.labels.isbn),
                ("markers.noResults", &spec.markers.no_results),
                ("markers.list", &spec.markers.list),
                ("status.available", &spec.status.available),
                ("status.excluded", &spec.status.excluded),
                ("status.onLoan", &spec.status.on_loan),
                ("status.waitingForRetrieve", &spec.status.waiting_for_retrieve),
            ];
            for (field, value) in required {
                if value.trim().is_empty() {
                    return Err(ConfigError::Validation(format!(
                        "locale '{code}': {field} must be non-empty"
                    )));
                }
            }
        }

        Ok(())
    }
}

fn catalan() -> LocaleSpec {
    LocaleSpec {
        labels: FieldLabels {
            title: "Títol".to_string(),
            author: "Autor/Artista".to_string(),
            publication: "Publicació".to_string(),
            edition: "Edici&oacute;".to_string(),
            description: "Descripci&oacute;".to_string(),
            collection: "Col&middot;lecci&oacute;".to_string(),
            summary: "Sinopsi".to_string(),
            uniform_title: "Títol uniforme".to_string(),
            isbn: "ISBN".to_string(),
        },
        markers: PageMarkers {
            no_results: "NO HI HA RESULTATS".to_string(),
            list: "Ordenat per".to_string(),
        },
        status: StatusVocabulary {
            available: "DISPONIBLE".to_string(),
            excluded: "EXCLÒS DE PRÉSTEC".to_string(),
            on_loan: "VENÇ".to_string(),
            waiting_for_retrieve: "PENDENT DE RECOLLIR".to_string(),
        },
    }
}

fn spanish() -> LocaleSpec {
    LocaleSpec {
        labels: FieldLabels {
            title: "Título".to_string(),
            author: "Autor/Artista".to_string(),
            publication: "Publicación".to_string(),
            edition: "Edición".to_string(),
            description: "Descripción".to_string(),
            collection: "Colección".to_string(),
            summary: "Sumario".to_string(),
            uniform_title: "Título uniforme".to_string(),
            isbn: "ISBN".to_string(),
        },
        markers: PageMarkers {
            no_results: "NO HAY RESULTADOS".to_string(),
            list: "Ordenado por".to_string(),
        },
        status: StatusVocabulary {
            available: "DISPONIBLE".to_string(),
            excluded: "EXCLUIDO DE PRÉSTAMO".to_string(),
            on_loan: "VENCE".to_string(),
            waiting_for_retrieve: "PENDIENTE DE RECOGER".to_string(),
        },
    }
}

fn english() -> LocaleSpec {
    LocaleSpec {
        labels: FieldLabels {
            title: "Title".to_string(),
            author: "Author/Artist".to_string(),
            publication: "Publication".to_string(),
            edition: "Edition".to_string(),
            description: "Description".to_string(),
            collection: "Series".to_string(),
            summary: "Summary".to_string(),
            uniform_title: "Uniform title".to_string(),
            isbn: "ISBN".to_string(),
        },
        markers: PageMarkers {
            no_results: "NO ENTRIES FOUND".to_string(),
            list: "Sorted by".to_string(),
        },
        status: StatusVocabulary {
            available: "AVAILABLE".to_string(),
            excluded: "LIB USE ONLY".to_string(),
            on_loan: "DUE".to_string(),
            waiting_for_retrieve: "ON HOLDSHELF".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_the_three_catalog_languages() {
        let map = LocaleMap::builtin();
        let langs: Vec<&str> = map.languages().collect();
        assert_eq!(langs, vec!["ca", "en", "es"]);
    }

    #[test]
    fn builtin_passes_its_own_validation() {
        assert!(LocaleMap::builtin().validate().is_ok());
    }

    #[test]
    fn unknown_language_is_none() {
        let map = LocaleMap::builtin();
        assert!(map.get("fr").is_none());
        assert!(map.get("").is_none());
    }

    #[test]
    fn catalan_collection_label_keeps_its_entities() {
        // Label matching happens against raw markup, so the entity form is
        // the correct one.
        let map = LocaleMap::builtin();
        let ca = map.get("ca").unwrap();
        assert_eq!(ca.labels.collection, "Col&middot;lecci&oacute;");
    }

    #[test]
    fn yaml_round_trip_preserves_the_builtin_map() {
        let map = LocaleMap::builtin();
        let yaml = serde_yaml::to_string(&map).unwrap();
        let back: LocaleMap = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn validation_rejects_empty_marker() {
        let yaml = r#"
locales:
  ca:
    labels:
      title: "Títol"
      author: "Autor/Artista"
      publication: "Publicació"
      edition: "Edició"
      description: "Descripció"
      collection: "Col·lecció"
      summary: "Sinopsi"
      uniformTitle: "Títol uniforme"
      isbn: "ISBN"
    markers:
      noResults: ""
      list: "Ordenat per"
    status:
      available: "DISPONIBLE"
      excluded: "EXCLÒS DE PRÉSTEC"
      onLoan: "VENÇ"
      waitingForRetrieve: "PENDENT DE RECOLLIR"
"#;
        let map: LocaleMap = serde_yaml::from_str(yaml).unwrap();
        let err = map.validate().unwrap_err();
        assert!(err.to_string().contains("markers.noResults"));
    }

    #[test]
    fn validation_rejects_empty_map() {
        let map = LocaleMap {
            locales: BTreeMap::new(),
        };
        let err = map.validate().unwrap_err();
        assert!(err.to_string().contains("at least one language"));
    }

    #[test]
    fn duplicate_language_code_is_a_parse_error() {
        // Both entries are complete and valid on their own; the repeated
        // key is the only defect.
        let yaml = r#"
locales:
  ca:
    labels:
      title: "Primer"
      author: "Autor/Artista"
      publication: "Publicació"
      edition: "Edició"
      description: "Descripció"
      collection: "Col·lecció"
      summary: "Sinopsi"
      uniformTitle: "Títol uniforme"
      isbn: "ISBN"
    markers:
      noResults: "NO HI HA RESULTATS"
      list: "Ordenat per"
    status:
      available: "DISPONIBLE"
      excluded: "EXCLÒS DE PRÉSTEC"
      onLoan: "VENÇ"
      waitingForRetrieve: "PENDENT DE RECOLLIR"
  ca:
    labels:
      title: "Segon"
      author: "Autor/Artista"
      publication: "Publicació"
      edition: "Edició"
      description: "Descripció"
      collection: "Col·lecció"
      summary: "Sinopsi"
      uniformTitle: "Títol uniforme"
      isbn: "ISBN"
    markers:
      noResults: "NO HI HA RESULTATS"
      list: "Ordenat per"
    status:
      available: "DISPONIBLE"
      excluded: "EXCLÒS DE PRÉSTEC"
      onLoan: "VENÇ"
      waitingForRetrieve: "PENDENT DE RECOLLIR"
"#;
        let dir = std::env::temp_dir().join(format!("aladi-locales-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("locales.yaml");
        std::fs::write(&path, yaml).unwrap();

        let err = LocaleMap::from_yaml_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::LocalesFileParse(_)));
        assert!(err.to_string().contains("duplicate entry"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn load_locales_from_shipped_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("locales.yaml");
        assert!(path.exists(), "locales.yaml missing at {path:?}");
        let map = LocaleMap::from_yaml_file(&path).expect("shipped locales.yaml must load");
        assert_eq!(map, LocaleMap::builtin());
    }
}
