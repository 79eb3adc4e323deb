//! Section map: extracted-text-by-topic representation of one filing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from section identifier (e.g. `item_1a`, `cybersecurity`) to section
/// text. Produced by the external extraction stage; immutable input to the
/// scoring core. Absent or empty values for any key are valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap(BTreeMap<String, String>);

impl SectionMap {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Build a section map from a parsed JSON record, keeping string-valued
    /// entries only. Extraction output carries metadata fields (`company`,
    /// `year`, `cik`) alongside sections; non-string values are skipped.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let mut map = BTreeMap::new();
        if let Some(object) = value.as_object() {
            for (key, val) in object {
                if let Some(text) = val.as_str() {
                    map.insert(key.clone(), text.to_string());
                }
            }
        }
        Self(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.0.insert(key.into(), text.into());
    }

    /// Section text if the section is present and non-empty.
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|t| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for SectionMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for SectionMap {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}
