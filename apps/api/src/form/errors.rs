//! Per-field validation messages.
//!
//! A field that is absent from the map currently passes validation.

use std::collections::BTreeMap;

use serde::Serialize;

/// A named form field.
pub trait FormField: Copy + Ord {
    /// Wire name of the field (matches the serde name).
    fn name(&self) -> &'static str;
}

/// Mapping from field to a human-readable message, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors<F: FormField> {
    entries: BTreeMap<F, String>,
}

impl<F: FormField> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<F: FormField> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the outcome of validating one field: a message sets the error,
    /// `None` clears it.
    pub fn record(&mut self, field: F, outcome: Option<String>) {
        match outcome {
            Some(message) => {
                self.entries.insert(field, message);
            }
            None => {
                self.entries.remove(&field);
            }
        }
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, field: F) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.entries.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// Field-name keyed copy, used when the errors leave the typed world
    /// (HTTP error bodies).
    pub fn to_name_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(field, msg)| (field.name().to_string(), msg.to_string()))
            .collect()
    }
}

impl<F: FormField> FromIterator<(F, String)> for FieldErrors<F> {
    fn from_iter<I: IntoIterator<Item = (F, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Result of validating a whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidation<F: FormField> {
    pub errors: FieldErrors<F>,
    pub is_valid: bool,
}

impl<F: FormField> FormValidation<F> {
    pub fn from_errors(errors: FieldErrors<F>) -> Self {
        let is_valid = errors.is_empty();
        Self { errors, is_valid }
    }
}
