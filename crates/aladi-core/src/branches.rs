//! Stable numeric identifiers for library branches.
//!
//! Branch names are harvested from the location column of status tables.
//! The registry assigns each distinct name an identifier in steps of ten
//! (10, 20, 30, ...) over the case-insensitively sorted name list, so a
//! later insertion between two names has room without renumbering, and
//! publishes the assignment as a pair of JSON artifacts (name-keyed and
//! id-keyed).

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::ConfigError;

/// File name of the name → id artifact.
pub const NAME_ID_FILE: &str = "libraries.name-id.json";
/// File name of the id → name artifact.
pub const ID_NAME_FILE: &str = "libraries.id-name.json";

const ID_STEP: u32 = 10;

/// An immutable branch-name → id assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRegistry {
    // Sorted case-insensitively; position determines the id.
    names: Vec<String>,
}

impl BranchRegistry {
    /// Build a registry from an arbitrary stream of branch names.
    ///
    /// Names are deduplicated exactly (case variants stay distinct) and
    /// sorted case-insensitively, with the exact form as tie-breaker so
    /// the assignment is deterministic.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let mut names: Vec<String> = distinct.into_iter().collect();
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        BranchRegistry { names }
    }

    /// Load a registry from a previously saved name → id artifact.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_name_id_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BranchesFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let map: BTreeMap<String, u32> =
            serde_json::from_str(&content).map_err(ConfigError::BranchesFileParse)?;

        let mut pairs: Vec<(u32, String)> = map.into_iter().map(|(n, id)| (id, n)).collect();
        pairs.sort();
        Ok(BranchRegistry {
            names: pairs.into_iter().map(|(_, n)| n).collect(),
        })
    }

    /// The id assigned to `name`, if the name is registered.
    #[must_use]
    pub fn id_for(&self, name: &str) -> Option<u32> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| (i as u32 + 1) * ID_STEP)
    }

    /// The name assigned to `id`, if the id is in range.
    #[must_use]
    pub fn name_for(&self, id: u32) -> Option<&str> {
        if id == 0 || id % ID_STEP != 0 {
            return None;
        }
        self.names
            .get((id / ID_STEP) as usize - 1)
            .map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in id order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// The name → id assignment as a map.
    #[must_use]
    pub fn name_to_id(&self) -> BTreeMap<String, u32> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), (i as u32 + 1) * ID_STEP))
            .collect()
    }

    /// The id → name assignment as a map. Numeric keys keep the artifact
    /// ordered by id when serialized.
    #[must_use]
    pub fn id_to_name(&self) -> BTreeMap<u32, String> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| ((i as u32 + 1) * ID_STEP, n.clone()))
            .collect()
    }

    /// Write both JSON artifacts into `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if either file cannot be serialized or written.
    pub fn save_artifacts(&self, dir: &Path) -> Result<(), ConfigError> {
        let write = |file: &str, json: String| -> Result<(), ConfigError> {
            let path = dir.join(file);
            std::fs::write(&path, json).map_err(|e| ConfigError::BranchesFileIo {
                path: path.display().to_string(),
                source: e,
            })
        };

        let name_id = serde_json::to_string_pretty(&self.name_to_id())
            .map_err(ConfigError::BranchesFileParse)?;
        write(NAME_ID_FILE, name_id)?;

        let id_name = serde_json::to_string_pretty(&self.id_to_name())
            .map_err(ConfigError::BranchesFileParse)?;
        write(ID_NAME_FILE, id_name)?;

        Ok(())
    }
}
