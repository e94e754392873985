//! Pattern map result type

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Prefix of every pattern map key (`class_0`, `class_1`, ...)
pub const KEY_PREFIX: &str = "class_";

/// Key for the pattern at `index`
pub fn field_key(index: usize) -> String {
    format!("{}{}", KEY_PREFIX, index)
}

/// Flat field map produced from OCR text.
///
/// Holds exactly one entry per configured pattern, in declaration order.
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMap {
    entries: Vec<(String, Option<String>)>,
}

impl PatternMap {
    pub(crate) fn new(entries: Vec<(String, Option<String>)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `None` when the key does not exist, `Some(None)` when the pattern
    /// did not match
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_deref())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    /// Number of patterns that matched
    pub fn matched(&self) -> usize {
        self.entries.iter().filter(|(_, value)| value.is_some()).count()
    }
}

impl Serialize for PatternMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
