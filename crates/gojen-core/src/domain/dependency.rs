//! Declaration inter-dependencies.
//!
//! Independent of the Sequence graph: it only records which declarations a
//! declaration builds on. A cycle here is a programmer error, caught when the
//! offending declaration is registered.

use std::collections::BTreeMap;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Directed graph `declaration -> dependencies`.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    edges: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with its dependencies.
    ///
    /// # Panics
    ///
    /// If the new edges close a cycle.
    pub fn insert(&mut self, name: &str, dependencies: &[String]) {
        if let Err(err) = self.try_insert(name, dependencies) {
            panic!("{err}");
        }
    }

    /// Like [`DependencyGraph::insert`] but reports the cycle instead, leaving
    /// the graph unchanged.
    pub fn try_insert(&mut self, name: &str, dependencies: &[String]) -> Result<(), DomainError> {
        let previous = self.edges.insert(name.to_string(), dependencies.to_vec());

        if let Some(path) = self.cycle_from(name) {
            match previous {
                Some(old) => self.edges.insert(name.to_string(), old),
                None => self.edges.remove(name),
            };
            return Err(DomainError::DependencyCycle { path });
        }
        Ok(())
    }

    pub fn dependencies(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Check the whole graph.
    pub fn check(&self) -> Result<(), DomainError> {
        let mut marks = BTreeMap::new();
        for name in self.edges.keys() {
            let mut stack = Vec::new();
            if let Some(path) = self.visit(name, &mut marks, &mut stack) {
                return Err(DomainError::DependencyCycle { path });
            }
        }
        Ok(())
    }

    fn cycle_from(&self, start: &str) -> Option<Vec<String>> {
        let mut marks = BTreeMap::new();
        let mut stack = Vec::new();
        self.visit(start, &mut marks, &mut stack)
    }

    fn visit<'a>(
        &'a self,
        name: &'a str,
        marks: &mut BTreeMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
    ) -> Option<Vec<String>> {
        match marks.get(name) {
            Some(Mark::Done) => return None,
            Some(Mark::InProgress) => {
                let from = stack.iter().position(|n| *n == name).unwrap_or(0);
                let mut path: Vec<String> = stack[from..].iter().map(|s| s.to_string()).collect();
                path.push(name.to_string());
                return Some(path);
            }
            None => {}
        }

        marks.insert(name, Mark::InProgress);
        stack.push(name);
        for dep in self.dependencies(name) {
            if let Some(path) = self.visit(dep, marks, stack) {
                return Some(path);
            }
        }
        stack.pop();
        marks.insert(name, Mark::Done);
        None
    }
}
