//! Load error registry

use serde::Serialize;
use std::collections::BTreeMap;

/// Load failures keyed by artifact file name.
///
/// Filled while the store loads its models at startup and only read
/// afterwards. A later record for the same file replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LoadErrorRegistry {
    entries: BTreeMap<String, String>,
}

impl LoadErrorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the failure detail for a file
    pub fn record(&mut self, file_name: impl Into<String>, detail: impl Into<String>) {
        self.entries.insert(file_name.into(), detail.into());
    }

    pub fn get(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.entries.contains_key(file_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Failures in file name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, detail)| (name.as_str(), detail.as_str()))
    }
}
