//! Pattern set loading and matching
//!
//! The pattern list is a versioned JSON artifact:
//!
//! ```json
//! {
//!   "version": 1,
//!   "patterns": [
//!     { "pattern": "\\d{2}\\.\\d{2}\\.\\d{4}", "description": "Document date" },
//!     "plain patterns are accepted too"
//!   ]
//! }
//! ```
//!
//! Its length and order define the shape of every [`PatternMap`].

use std::path::Path;

use regex::Regex;
use serde::Deserialize;

use super::map::{field_key, PatternMap};
use crate::config::{ConfigError, PatternConfig};

const BUILTIN_PATTERNS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/patterns.json"));

#[derive(Debug, Deserialize)]
struct PatternFile {
    version: u32,
    patterns: Vec<PatternEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PatternEntry {
    Plain(String),
    Detailed {
        pattern: String,
        #[serde(default)]
        description: Option<String>,
    },
}

impl PatternEntry {
    fn into_parts(self) -> (String, Option<String>) {
        match self {
            PatternEntry::Plain(pattern) => (pattern, None),
            PatternEntry::Detailed {
                pattern,
                description,
            } => (pattern, description),
        }
    }
}

/// A compiled field pattern
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub key: String,
    pub regex: Regex,
    pub description: Option<String>,
}

/// Ordered, compiled pattern list
#[derive(Debug, Clone)]
pub struct PatternSet {
    version: u32,
    patterns: Vec<FieldPattern>,
}

impl PatternSet {
    /// Load the configured artifact, or the built-in one when none is set
    pub fn load(config: &PatternConfig) -> Result<Self, ConfigError> {
        match config.path.as_deref() {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Pattern list shipped with the crate
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN_PATTERNS)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::PatternFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let file: PatternFile =
            serde_json::from_str(content).map_err(|e| ConfigError::PatternFormat(e.to_string()))?;

        let patterns = file
            .patterns
            .into_iter()
            .map(PatternEntry::into_parts)
            .collect::<Vec<_>>();

        let mut set = Self::compile(patterns.iter().map(|(pattern, _)| pattern.as_str()))?;
        set.version = file.version;
        for (compiled, (_, description)) in set.patterns.iter_mut().zip(patterns) {
            compiled.description = description;
        }
        Ok(set)
    }

    /// Compile a plain list of pattern strings.
    ///
    /// An empty list or an invalid expression is rejected.
    pub fn compile<'a, I>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let patterns = patterns
            .into_iter()
            .enumerate()
            .map(|(index, pattern)| {
                Regex::new(pattern)
                    .map(|regex| FieldPattern {
                        key: field_key(index),
                        regex,
                        description: None,
                    })
                    .map_err(|source| ConfigError::InvalidPattern {
                        index,
                        pattern: pattern.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if patterns.is_empty() {
            return Err(ConfigError::PatternFormat(
                "pattern list is empty".to_string(),
            ));
        }

        Ok(Self {
            version: 0,
            patterns,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    /// Map raw OCR text onto the configured fields.
    ///
    /// Each pattern is searched independently over the whole text and keeps
    /// its first match, with line breaks replaced by `-`. Patterns without a
    /// match map to `None`.
    pub fn map(&self, text: &str) -> PatternMap {
        let entries = self
            .patterns
            .iter()
            .map(|field| {
                let value = field
                    .regex
                    .find(text)
                    .map(|found| found.as_str().replace('\n', "-"));
                (field.key.clone(), value)
            })
            .collect();

        PatternMap::new(entries)
    }
}
