//! Slot values extracted from conversation.
//!
//! A slot is one named piece of booking criteria (origin, check-in date,
//! party size). Each domain defines a fixed, ordered set of slot names;
//! values arrive incrementally from the extraction oracle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single extracted slot value.
///
/// Slots are either free text (cities, date ranges) or a count
/// (passengers, guests). Unset slots are simply absent from `SlotValues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    /// Free-text value, e.g. "Delhi" or "2025-09-12 to 2025-09-15".
    Text(String),
    /// Numeric value, e.g. number of passengers.
    Count(u32),
}

impl SlotValue {
    /// Creates a text slot value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns true for empty text values (treated as unset candidates).
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Count(_) => false,
        }
    }
}

impl fmt::Display for SlotValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Count(n) => write!(f, "{}", n),
        }
    }
}

/// The slot map of one booking context.
///
/// Keys are slot names from the domain's `DomainSpec`; a missing key means
/// the slot has not been provided yet. A BTreeMap keeps serialized output
/// stable for prompts and snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotValues(BTreeMap<String, SlotValue>);

impl SlotValues {
    /// Creates an empty slot map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of a slot, if set.
    pub fn get(&self, name: &str) -> Option<&SlotValue> {
        self.0.get(name)
    }

    /// Sets a slot value, overwriting any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: SlotValue) {
        self.0.insert(name.into(), value);
    }

    /// Returns true if the slot has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the names of `required` slots that are still unset, in order.
    pub fn missing<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        required
            .into_iter()
            .filter(|name| !self.contains(name))
            .collect()
    }

    /// Returns true if every required slot has a value.
    pub fn is_complete<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
        self.missing(required).is_empty()
    }

    /// Iterates over all set slots.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of set slots.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no slot is set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SlotValue)> for SlotValues {
    fn from_iter<T: IntoIterator<Item = (String, SlotValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
