//! Shared types for the catalog extraction pipeline: the record model,
//! per-language locale tables, and the branch-id registry.

pub mod branches;
pub mod locales;
pub mod model;

use thiserror::Error;

pub use branches::{BranchRegistry, ID_NAME_FILE, NAME_ID_FILE};
pub use locales::{FieldLabels, LocaleMap, LocaleSpec, PageMarkers, StatusVocabulary};
pub use model::{BookInfo, BookListItem, BookListResults, BookStatus, PageKind, StatusCode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read locales file at {path}: {source}")]
    LocalesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse locales file: {0}")]
    LocalesFileParse(#[from] serde_yaml::Error),

    #[error("failed to access branches file at {path}: {source}")]
    BranchesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("branches file JSON error: {0}")]
    BranchesFileParse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
