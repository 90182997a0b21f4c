//! Argument context shared by templates.
//!
//! [`Args`] maps argument names to JSON values. Merging is deterministic:
//! sources are applied in order and later keys replace earlier ones.
//! Iteration is sorted by key so rendered audit records are stable.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Argument names mapped to values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Args(BTreeMap<String, Value>);

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a fresh context from `sources`, later sources winning.
    pub fn merged<'a>(sources: impl IntoIterator<Item = &'a Args>) -> Self {
        let mut out = Self::new();
        for source in sources {
            out.merge(source);
        }
        out
    }

    /// Merge `other` into `self`; keys present in `other` win.
    pub fn merge(&mut self, other: &Args) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    /// Fluent variant of [`Args::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Pull out the named keys.
    ///
    /// Returns the found subset together with the names that were absent,
    /// in first-seen order and without duplicates. Never mutates `self`.
    /// With no keys the whole context is returned.
    pub fn extract<S: AsRef<str>>(&self, keys: &[S]) -> (Args, Vec<String>) {
        if keys.is_empty() {
            return (self.clone(), Vec::new());
        }

        let mut found = Args::new();
        let mut missing: Vec<String> = Vec::new();
        for key in keys {
            let key = key.as_ref();
            match self.0.get(key) {
                Some(v) => {
                    found.0.insert(key.to_string(), v.clone());
                }
                None if !missing.iter().any(|m| m == key) => missing.push(key.to_string()),
                None => {}
            }
        }
        (found, missing)
    }

    /// Like [`Args::extract`] but without the whole-context fallback: no keys
    /// yields an empty subset.
    pub fn subset<S: AsRef<str>>(&self, keys: &[S]) -> Args {
        if keys.is_empty() {
            return Args::new();
        }
        self.extract(keys).0
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Value>> for Args {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.0) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{}"),
        }
    }
}
