//! Rendered build steps and the set of files touched by Apply.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{args::Args, declaration::Strategy};

/// Immutable record of one executed build step.
///
/// Created once by the Build Engine, consumed in order by the Apply Engine,
/// and persisted as an audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub strategy: Strategy,
    pub decl: String,
    pub element: String,
    pub raw_alias: String,
    pub alias: String,
    /// Effective argument context the step rendered with.
    pub args: Args,
    /// Subset of `args` propagated to later steps.
    pub forwarded_args: Args,
    pub raw_path: String,
    pub raw_template: String,
    pub path: PathBuf,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_comparing_lines: Vec<String>,
}

impl State {
    /// `decl.element`, used in logs and file names.
    pub fn step_name(&self) -> String {
        format!("{}.{}", self.decl, self.element)
    }
}

/// Deduplicated, ordered set of written paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ModifiedFiles(BTreeSet<PathBuf>);

impl ModifiedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the path was already recorded.
    pub fn insert(&mut self, path: impl Into<PathBuf>) -> bool {
        self.0.insert(path.into())
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.0.contains(path.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ModifiedFiles {
    type Item = &'a PathBuf;
    type IntoIter = std::collections::btree_set::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
