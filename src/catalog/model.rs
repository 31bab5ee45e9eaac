//! Record shapes for the remote catalog and the normalized package index.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Deserialize)]
/// One entry of the formula listing.
pub struct FormulaRecord {
    pub name: String,
    #[serde(default, rename = "desc", alias = "description")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
/// One entry of the cask listing. Casks are keyed by `token`.
pub struct CaskRecord {
    pub token: String,
    #[serde(default, rename = "desc", alias = "description")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A package name with its description. Origin (formula or cask) is not kept.
pub struct PackageEntry {
    pub name: String,
    pub description: String,
}

impl From<FormulaRecord> for PackageEntry {
    fn from(record: FormulaRecord) -> Self {
        Self {
            name: record.name,
            description: record.description.unwrap_or_default(),
        }
    }
}

impl From<CaskRecord> for PackageEntry {
    fn from(record: CaskRecord) -> Self {
        Self {
            name: record.token,
            description: record.description.unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
/// Name → description mapping built once per refresh.
///
/// Serializes as a plain JSON object, which is also the on-disk cache format.
/// Names iterate in sorted order so ranking ties resolve deterministically.
pub struct PackageIndex {
    entries: BTreeMap<String, String>,
}

impl PackageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; an existing entry with the same name is replaced.
    pub fn insert(&mut self, entry: PackageEntry) {
        self.entries.insert(entry.name, entry.description);
    }

    pub fn extend<I, E>(&mut self, entries: I)
    where
        I: IntoIterator<Item = E>,
        E: Into<PackageEntry>,
    {
        for entry in entries {
            self.insert(entry.into());
        }
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// All package names, in index order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for PackageIndex {
    fn from(pairs: [(&str, &str); N]) -> Self {
        let mut index = PackageIndex::new();
        for (name, description) in pairs {
            index.insert(PackageEntry {
                name: name.to_string(),
                description: description.to_string(),
            });
        }
        index
    }
}
