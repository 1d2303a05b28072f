//! Attribute sets for private-key generation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PolicyError, Result};
use crate::normalizer::{SpacePolicy, normalize_with};
use crate::predicate::Predicate;

/// The attributes a private key will carry.
///
/// Semantically a set; insertion order is kept for display. Built from
/// checkbox selections and typed entries, then discarded once the key
/// generation request is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Predicate>", into = "Vec<Predicate>")]
pub struct KeyAttributeSet {
    attributes: Vec<Predicate>,
}

impl KeyAttributeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate.
    ///
    /// A predicate already present is rejected with
    /// [`PolicyError::DuplicateAttribute`] and the set is left unchanged.
    pub fn insert(&mut self, predicate: Predicate) -> Result<()> {
        if self.contains(&predicate) {
            debug!(attribute = %predicate, "duplicate attribute ignored");
            return Err(PolicyError::DuplicateAttribute {
                token: predicate.to_string(),
            });
        }
        self.attributes.push(predicate);
        Ok(())
    }

    /// Normalizes a typed entry and adds it.
    ///
    /// Returns the canonical predicate that was added.
    pub fn insert_text(&mut self, input: &str, policy: SpacePolicy) -> Result<Predicate> {
        let predicate = normalize_with(input, policy)?;
        self.insert(predicate.clone())?;
        Ok(predicate)
    }

    /// Checkbox semantics: adds the predicate if absent, removes it if present.
    ///
    /// Returns whether the predicate is in the set afterwards.
    pub fn toggle(&mut self, predicate: Predicate) -> bool {
        if self.remove(&predicate) {
            false
        } else {
            self.attributes.push(predicate);
            true
        }
    }

    /// Removes a predicate. Returns whether it was present.
    pub fn remove(&mut self, predicate: &Predicate) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|p| p != predicate);
        self.attributes.len() != before
    }

    pub fn contains(&self, predicate: &Predicate) -> bool {
        self.attributes.contains(predicate)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Predicates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.attributes.iter()
    }

    /// Canonical tokens in insertion order.
    pub fn to_tokens(&self) -> Vec<String> {
        self.attributes.iter().map(ToString::to_string).collect()
    }
}

impl TryFrom<Vec<Predicate>> for KeyAttributeSet {
    type Error = PolicyError;

    fn try_from(predicates: Vec<Predicate>) -> Result<Self> {
        let mut set = Self::new();
        for predicate in predicates {
            set.insert(predicate)?;
        }
        Ok(set)
    }
}

impl From<KeyAttributeSet> for Vec<Predicate> {
    fn from(set: KeyAttributeSet) -> Self {
        set.attributes
    }
}

impl<'a> IntoIterator for &'a KeyAttributeSet {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}
