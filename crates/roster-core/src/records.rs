//! Static character lookup table.
//!
//! Loaded once at startup and shared read-only with the popup controller.
//! Extending the roster only means adding entries to the JSON data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::RosterError;

const BUILTIN_JSON: &str = include_str!("../data/characters.json");

/// Authored information about one character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CharacterRecord {
    /// Trusted rich-text description; may contain formatting markup.
    #[serde(default)]
    pub description: Option<String>,
}

/// Read-only mapping from exact character name to its record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterTable {
    records: HashMap<String, CharacterRecord>,
}

impl CharacterTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, record)` pairs. Later duplicates win.
    pub fn from_records<I, S>(records: I) -> Self
    where
        I: IntoIterator<Item = (S, CharacterRecord)>,
        S: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(name, record)| (name.into(), record))
                .collect(),
        }
    }

    /// Parse a JSON object keyed by character name.
    ///
    /// ```json
    /// { "Kyoko Kirigiri": { "description": "Ultime <strong>Détective</strong>." } }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, RosterError> {
        let records: HashMap<String, CharacterRecord> =
            serde_json::from_str(json).map_err(|err| RosterError::Records(err.to_string()))?;
        Ok(Self { records })
    }

    /// The table bundled with the crate.
    pub fn builtin() -> Result<Self, RosterError> {
        Self::from_json(BUILTIN_JSON)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CharacterRecord> {
        self.records.get(name)
    }

    /// Description for `name`, when a record exists and carries one.
    #[must_use]
    pub fn description(&self, name: &str) -> Option<&str> {
        self.get(name)?.description.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
