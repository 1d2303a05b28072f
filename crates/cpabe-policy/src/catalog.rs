//! Selectable attribute catalog.
//!
//! The attributes offered as checkboxes when building a policy or a key.

use std::collections::BTreeMap;

use crate::error::FormatError;
use crate::predicate::Predicate;

/// Entries offered when no catalog is configured.
pub const DEFAULT_ENTRIES: &[&str] = &[
    "department:engineering",
    "department:marketing",
    "department:finance",
    "department:hr",
    "role:admin",
    "role:manager",
    "role:developer",
    "role:designer",
    "role:accountant",
    "clearance:top_secret",
    "clearance:secret",
    "clearance:confidential",
    "location:hq",
    "location:remote",
];

/// An ordered list of selectable predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCatalog {
    entries: Vec<Predicate>,
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES
                .iter()
                .filter_map(|entry| Predicate::from_token(entry).ok())
                .collect(),
        }
    }
}

impl AttributeCatalog {
    /// Builds a catalog from entries in either separator. Repeats are dropped.
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self, FormatError> {
        let mut decoded: Vec<Predicate> = Vec::with_capacity(entries.len());
        for entry in entries {
            let predicate = Predicate::from_token(entry.as_ref())?;
            if !decoded.contains(&predicate) {
                decoded.push(predicate);
            }
        }
        Ok(Self { entries: decoded })
    }

    /// Looks up an entry by token in either separator.
    pub fn get(&self, token: &str) -> Option<&Predicate> {
        let wanted = Predicate::from_token(token).ok()?;
        self.entries.iter().find(|p| **p == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by category, categories sorted.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&Predicate>> {
        let mut grouped: BTreeMap<&str, Vec<&Predicate>> = BTreeMap::new();
        for predicate in &self.entries {
            grouped
                .entry(predicate.category())
                .or_default()
                .push(predicate);
        }
        grouped
    }
}

impl<'a> IntoIterator for &'a AttributeCatalog {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
