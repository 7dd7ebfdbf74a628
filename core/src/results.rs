//! Parsed flag and argument results.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::value::{Typed, Value};

/// One parsed value plus whether it came from the registered default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    pub value: Value,
    /// `true` when the user supplied nothing and the default was filled in.
    pub is_default: bool,
}

/// Name → value mapping produced by one parse.
///
/// Flags are keyed by their long name, arguments by their name. A fresh map
/// is built for every dispatch.
///
/// # Examples
///
/// ```
/// use command_shell_core::{ResultMap, Typed};
///
/// let mut results = ResultMap::new();
/// results.insert("count", 3i32.into_value(), false);
/// assert_eq!(results.get::<i32>("count").unwrap(), 3);
/// assert!(results.get::<String>("count").is_err());
/// assert!(results.get::<i32>("missing").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultMap {
    entries: BTreeMap<String, ResultEntry>,
}

impl ResultMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: Value, is_default: bool) {
        self.entries
            .insert(name.into(), ResultEntry { value, is_default });
    }

    pub fn entry(&self, name: &str) -> Option<&ResultEntry> {
        self.entries.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).map(|entry| &entry.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns `true` if `name` holds its default value (or is absent).
    pub fn is_default(&self, name: &str) -> bool {
        self.entries.get(name).is_none_or(|entry| entry.is_default)
    }

    /// Returns the typed value for `name`.
    ///
    /// # Errors
    ///
    /// [`Error::NotRegistered`] if `name` has no entry,
    /// [`Error::KindMismatch`] if it holds a different kind than `T`.
    pub fn get<T: Typed>(&self, name: &str) -> Result<T> {
        let value = self
            .value(name)
            .ok_or_else(|| Error::NotRegistered(name.to_string()))?;
        T::from_value(value).ok_or_else(|| Error::KindMismatch {
            name: name.to_string(),
            expected: T::kind(),
            found: value.kind(),
        })
    }

    /// Merges a base map parsed in an outer scope.
    ///
    /// Defaulted entries here are replaced by explicitly supplied base
    /// entries of the same name. Explicit entries here, and base names this
    /// map does not hold, are left alone.
    pub fn apply_base(&mut self, base: &ResultMap) {
        for (name, entry) in &base.entries {
            if entry.is_default {
                continue;
            }
            if let Some(own) = self.entries.get_mut(name)
                && own.is_default
            {
                *own = entry.clone();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}
