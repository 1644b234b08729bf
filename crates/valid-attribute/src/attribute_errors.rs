//! The error collection a subject exposes after a validity check.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Collection of validation messages keyed by attribute name.
///
/// Messages for one attribute keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeErrors {
    #[serde(flatten)]
    pub fields: HashMap<String, Vec<String>>,
}

impl AttributeErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Build a collection holding a single message.
    pub fn single(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(attribute, message);
        errors
    }

    /// Add a message for an attribute.
    pub fn add(&mut self, attribute: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(attribute.into())
            .or_default()
            .push(message.into());
    }

    /// Merge another collection into this one.
    pub fn merge(&mut self, other: AttributeErrors) {
        for (attribute, messages) in other.fields {
            self.fields.entry(attribute).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|m| m.is_empty())
    }

    /// Total number of messages across all attributes.
    pub fn len(&self) -> usize {
        self.fields.values().map(|m| m.len()).sum()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Messages for an attribute, if any were recorded.
    pub fn get(&self, attribute: &str) -> Option<&[String]> {
        self.fields
            .get(attribute)
            .filter(|m| !m.is_empty())
            .map(|m| m.as_slice())
    }

    /// Messages for an attribute joined into one line.
    ///
    /// Absent and empty entries both yield `None`.
    pub fn messages_for(&self, attribute: &str) -> Option<String> {
        self.get(attribute).map(|m| m.join(", "))
    }

    /// `Ok` if no messages were recorded, `Err(self)` otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (attribute, message) in iter {
            errors.add(attribute, message);
        }
        errors
    }
}

impl fmt::Display for AttributeErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {} error(s)", self.len())
    }
}

impl std::error::Error for AttributeErrors {}
