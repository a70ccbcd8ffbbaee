//! Dependency Index Module
//!
//! Multimap from dependency names to the cache keys registered against them.

use std::collections::{HashMap, HashSet};

// == Dependency Index ==
/// Bidirectional dependency bookkeeping.
///
/// The index never expires on its own: the store unlinks a key whenever that
/// key leaves the cache, so links live exactly as long as the data they
/// describe.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    /// dependency name -> dependent keys
    dependents: HashMap<String, HashSet<String>>,
    /// key -> dependency names it was registered with
    links: HashMap<String, HashSet<String>>,
}

impl DependencyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Records that `key` depends on each name in `dependencies`.
    ///
    /// Any links previously registered for `key` are replaced.
    pub fn register<S: AsRef<str>>(&mut self, key: &str, dependencies: &[S]) {
        self.unlink(key);

        let names: HashSet<String> = dependencies
            .iter()
            .map(|d| d.as_ref().to_string())
            .collect();
        if names.is_empty() {
            return;
        }

        for name in &names {
            self.dependents
                .entry(name.clone())
                .or_default()
                .insert(key.to_string());
        }
        self.links.insert(key.to_string(), names);
    }

    // == Unlink ==
    /// Drops every link held by `key`. Unknown keys are ignored.
    pub fn unlink(&mut self, key: &str) {
        let Some(names) = self.links.remove(key) else {
            return;
        };

        for name in names {
            if let Some(keys) = self.dependents.get_mut(&name) {
                keys.remove(key);
                if keys.is_empty() {
                    self.dependents.remove(&name);
                }
            }
        }
    }

    // == Dependents ==
    /// Returns the keys registered against `dependency`, sorted for stable
    /// processing order.
    pub fn dependents_of(&self, dependency: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .dependents
            .get(dependency)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Returns the dependency names registered for `key`, sorted.
    pub fn dependencies_of(&self, key: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .links
            .get(key)
            .map(|names| names.iter().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub fn clear(&mut self) {
        self.dependents.clear();
        self.links.clear();
    }
}
