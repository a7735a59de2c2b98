//! Dependency assertions over analyzed graphs.
//!
//! A `DependencyConstraint` declares an expected package graph and tests
//! whether an analyzed graph matches it exactly: the same package set,
//! and per package the same afferent and efferent name sets. A mismatch
//! is the normal `false` result, not an error.

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::DependencyGraph;

#[derive(Debug, Clone, Default)]
struct ExpectedPackage {
    afferents: BTreeSet<String>,
    efferents: BTreeSet<String>,
}

/// An expected package graph for assertions, typically built in tests:
///
/// ```
/// use classdep::constraint::DependencyConstraint;
///
/// let mut constraint = DependencyConstraint::new();
/// constraint.add_package("com.app.web");
/// constraint.add_package("com.app.util");
/// constraint.depends_upon("com.app.web", "com.app.util");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DependencyConstraint {
    packages: BTreeMap<String, ExpectedPackage>,
}

impl DependencyConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of an analyzed graph; matching it against the same graph
    /// returns `true`.
    pub fn from_graph(graph: &DependencyGraph) -> Self {
        let mut constraint = Self::new();
        for package in graph.packages() {
            constraint.add_package(&package.name);
            for efferent in &package.efferents {
                constraint.depends_upon(&package.name, efferent);
            }
        }
        constraint
    }

    /// Declares a package with, so far, no expected edges.
    pub fn add_package(&mut self, name: &str) {
        self.packages.entry(name.to_string()).or_default();
    }

    /// Declares that `a` depends upon `b`, recording `a`'s efferent and
    /// `b`'s afferent.
    pub fn depends_upon(&mut self, a: &str, b: &str) {
        self.packages
            .entry(a.to_string())
            .or_default()
            .efferents
            .insert(b.to_string());
        self.packages
            .entry(b.to_string())
            .or_default()
            .afferents
            .insert(a.to_string());
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Whether the analyzed graph matches this constraint exactly.
    pub fn matches(&self, graph: &DependencyGraph) -> bool {
        if self.packages.len() != graph.package_count() {
            return false;
        }
        self.packages.iter().all(|(name, expected)| {
            graph.package(name).is_some_and(|actual| {
                actual.afferents == expected.afferents && actual.efferents == expected.efferents
            })
        })
    }
}
