use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DuesError, Result};
use crate::store;

pub const MAPPINGS_FILE: &str = "mappings.json";

/// A learned association from recurring transaction details text to a member
/// name, used to auto-fill future imports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub details: String,
    pub member: String,
}

/// Persisted details → member mappings.
///
/// Entries are kept in insertion order; lookups scan in that order and the
/// first case-insensitive substring match wins. Keys are unique by exact
/// trimmed string and are never overwritten automatically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingStore {
    pub entries: Vec<MappingEntry>,
}

impl MappingStore {
    pub fn load(path: &Path) -> Result<Self> {
        store::load_json(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        store::save_json(path, self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn contains_key(&self, details: &str) -> bool {
        self.entries.iter().any(|e| e.details == details)
    }

    /// First member whose mapping key is a case-insensitive substring of the
    /// given details text, scanning in insertion order.
    pub fn lookup(&self, details: &str) -> Option<&str> {
        let haystack = details.to_lowercase();
        self.entries
            .iter()
            .find(|e| haystack.contains(&e.details.to_lowercase()))
            .map(|e| e.member.as_str())
    }

    /// Record a new mapping if the trimmed key is unseen. Returns true when
    /// an entry was added. Exact-key duplicates are only a lookup
    /// inefficiency, so existing keys are left untouched.
    pub fn learn(&mut self, details: &str, member: &str) -> bool {
        let key = details.trim();
        if key.is_empty() || self.contains_key(key) {
            return false;
        }
        self.entries.push(MappingEntry {
            details: key.to_string(),
            member: member.trim().to_string(),
        });
        true
    }

    /// Manual seeding via the CLI; unlike `learn`, an existing key is an
    /// error so the operator notices the clash.
    pub fn add(&mut self, details: &str, member: &str) -> Result<()> {
        let key = details.trim();
        if key.is_empty() {
            return Err(DuesError::Other("mapping key must not be empty".into()));
        }
        if self.contains_key(key) {
            return Err(DuesError::DuplicateMapping(key.to_string()));
        }
        self.entries.push(MappingEntry {
            details: key.to_string(),
            member: member.trim().to_string(),
        });
        Ok(())
    }
}
