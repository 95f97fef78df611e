use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use crate::error::{CodecError, Result};

/// Immutable dictionary of known tokens and their bit patterns.
///
/// Patterns are arbitrary-length strings of `0`/`1`. The table is built once
/// and shared by reference with every [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    patterns: HashMap<String, String>,
}

impl SymbolTable {
    /// An empty table. Every string then encodes as hex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from token/pattern pairs, validating each pattern.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut patterns = HashMap::new();
        for (token, pattern) in entries {
            let token = token.into();
            let pattern = pattern.into();
            if !is_bit_pattern(&pattern) {
                return Err(CodecError::InvalidPattern { token, pattern });
            }
            patterns.insert(token, pattern);
        }
        Ok(Self { patterns })
    }

    /// Parse a table from a JSON object of `"token": "bits"` entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: BTreeMap<String, String> = serde_json::from_str(json)?;
        Self::from_entries(entries)
    }

    /// Load a table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|err| CodecError::LoadFailed(format!("{}: {err}", path.display())))?;
        let table = Self::from_json_str(&content)?;
        debug!(?path, entries = table.len(), "loaded symbol table");
        Ok(table)
    }

    /// The pattern for a token, if known.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.patterns.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.patterns.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

fn is_bit_pattern(pattern: &str) -> bool {
    !pattern.is_empty() && pattern.bytes().all(|b| b == b'0' || b == b'1')
}
