//! Design-quality metrics and cycle detection over the package graph.
//!
//! Afferent/efferent coupling, abstractness, instability, and distance
//! from the main sequence, plus DFS-based package cycle detection.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::graph::{DependencyGraph, JavaPackage};

/// Computed metrics for one package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageMetrics {
    pub name: String,
    pub class_count: usize,
    pub abstract_class_count: usize,
    pub concrete_class_count: usize,
    /// Number of packages that depend on this one (Ca).
    pub afferent_coupling: usize,
    /// Number of packages this one depends on (Ce).
    pub efferent_coupling: usize,
    /// Ratio of abstract types to total types, in `[0, 1]`.
    pub abstractness: f64,
    /// `Ce·v / (Ce·v + Ca)` with `v` the package's own volatility.
    pub instability: f64,
    /// `|A + I - 1|`, the deviation from the main sequence.
    pub distance: f64,
    pub contains_cycle: bool,
}

/// Runs cycle detection, then computes metrics for every package in name
/// order.
pub fn compute(graph: &mut DependencyGraph) -> Vec<PackageMetrics> {
    detect_cycles(graph);
    graph
        .packages()
        .map(|package| package_metrics(graph, package))
        .collect()
}

/// Metrics for a single package. `contains_cycle` reflects whatever
/// [`detect_cycles`] has marked so far.
pub fn package_metrics(graph: &DependencyGraph, package: &JavaPackage) -> PackageMetrics {
    let (abstract_class_count, concrete_class_count) = graph.class_counts(package);
    let class_count = abstract_class_count + concrete_class_count;
    let afferent_coupling = package.afferent_coupling();
    let efferent_coupling = package.efferent_coupling();

    let abstractness = if class_count == 0 {
        0.0
    } else {
        abstract_class_count as f64 / class_count as f64
    };

    let weighted_efferents = efferent_coupling * package.volatility.weight();
    let denominator = weighted_efferents + afferent_coupling;
    let instability = if denominator == 0 {
        0.0
    } else {
        weighted_efferents as f64 / denominator as f64
    };

    let distance = (abstractness + instability - 1.0).abs();

    PackageMetrics {
        name: package.name.clone(),
        class_count,
        abstract_class_count,
        concrete_class_count,
        afferent_coupling,
        efferent_coupling,
        abstractness,
        instability,
        distance,
        contains_cycle: package.contains_cycle,
    }
}

/// Marks `contains_cycle` on every package that lies on a directed cycle
/// of efferent edges.
///
/// Each package serves as a DFS origin with its own visiting stack; a
/// back edge marks the stack from the back-edge target onward. Running
/// one traversal per origin makes the marking exact: a package is marked
/// iff it lies on a simple cycle.
pub fn detect_cycles(graph: &mut DependencyGraph) {
    let names: Vec<String> = graph.packages().map(|p| p.name.clone()).collect();
    let mut cyclic: BTreeSet<String> = BTreeSet::new();
    for origin in &names {
        mark_cycles_from(graph, origin, &mut cyclic);
    }
    for name in cyclic {
        graph.get_or_create_package(&name).contains_cycle = true;
    }
}

/// Iterative DFS from one origin; marks stack suffixes closed by back
/// edges. Each node is expanded at most once per origin, so a single
/// traversal is O(V + E).
fn mark_cycles_from(graph: &DependencyGraph, origin: &str, cyclic: &mut BTreeSet<String>) {
    let Some(root) = graph.package(origin) else {
        return;
    };

    let mut visited: BTreeSet<&str> = BTreeSet::new();
    let mut path: Vec<&str> = Vec::new();
    let mut on_path: BTreeSet<&str> = BTreeSet::new();
    let mut work: Vec<std::collections::btree_set::Iter<'_, String>> = Vec::new();

    visited.insert(&root.name);
    path.push(&root.name);
    on_path.insert(&root.name);
    work.push(root.efferents.iter());

    loop {
        // the yielded name borrows from the graph, not the work stack, so
        // the stack stays free to grow and shrink
        let next = match work.last_mut() {
            Some(successors) => successors.next().map(String::as_str),
            None => break,
        };
        match next {
            Some(next) => {
                if on_path.contains(next) {
                    if let Some(start) = path.iter().position(|name| *name == next) {
                        for member in &path[start..] {
                            cyclic.insert((*member).to_string());
                        }
                    }
                } else if !visited.contains(next) {
                    if let Some(package) = graph.package(next) {
                        visited.insert(&package.name);
                        path.push(&package.name);
                        on_path.insert(&package.name);
                        work.push(package.efferents.iter());
                    }
                }
            }
            None => {
                work.pop();
                if let Some(done) = path.pop() {
                    on_path.remove(done);
                }
            }
        }
    }
}

/// Every simple cycle through `origin`, in lexicographic path order. Each
/// cycle is reported as the path from `origin` up to (but not including)
/// the closing edge back to `origin`.
pub fn collect_all_cycles(graph: &DependencyGraph, origin: &str) -> Vec<Vec<String>> {
    let mut cycles = Vec::new();
    let Some(root) = graph.package(origin) else {
        return cycles;
    };
    let mut path: Vec<&str> = vec![root.name.as_str()];
    explore_cycles(graph, origin, root, &mut path, &mut cycles);
    cycles
}

fn explore_cycles<'g>(
    graph: &'g DependencyGraph,
    origin: &str,
    package: &'g JavaPackage,
    path: &mut Vec<&'g str>,
    cycles: &mut Vec<Vec<String>>,
) {
    for next in &package.efferents {
        if next.as_str() == origin {
            cycles.push(path.iter().map(|name| name.to_string()).collect());
        } else if !path.contains(&next.as_str()) {
            if let Some(successor) = graph.package(next) {
                path.push(successor.name.as_str());
                explore_cycles(graph, origin, successor, path, cycles);
                path.pop();
            }
        }
    }
}
