//! The package/class dependency model.
//!
//! Packages and classes are canonicalized by name in graph-owned tables;
//! afferent/efferent edges and package membership are sets of names, kept
//! symmetric by construction. Name keys avoid back-references between
//! packages, so the graph needs no interior mutability or reference
//! counting.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::{Error, Result};

/// Sentinel name for the unnamed package.
pub const UNNAMED_PACKAGE: &str = "Default";

/// Source-file sentinel used before a `SourceFile` attribute is seen.
pub const UNKNOWN_SOURCE_FILE: &str = "Unknown";

/// Whether a package's efferent edges count toward its instability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Volatility {
    /// The package is not expected to change; it contributes no
    /// instability weight.
    Stable,
    #[default]
    Volatile,
}

impl Volatility {
    pub fn weight(self) -> usize {
        match self {
            Volatility::Stable => 0,
            Volatility::Volatile => 1,
        }
    }
}

/// A parsed class or interface.
#[derive(Debug, Clone, Serialize)]
pub struct JavaClass {
    pub name: String,
    pub package_name: String,
    pub is_abstract: bool,
    pub source_file: String,
    pub imported_packages: BTreeSet<String>,
}

impl JavaClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package_name: "default".to_string(),
            is_abstract: false,
            source_file: UNKNOWN_SOURCE_FILE.to_string(),
            imported_packages: BTreeSet::new(),
        }
    }

    /// Records an imported package. A class never depends on its own
    /// package.
    pub fn add_imported_package(&mut self, package: impl Into<String>) {
        let package = package.into();
        if package != self.package_name {
            self.imported_packages.insert(package);
        }
    }
}

impl PartialEq for JavaClass {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for JavaClass {}

/// A package and its dependency edges, identified by dotted name.
#[derive(Debug, Clone, Serialize)]
pub struct JavaPackage {
    pub name: String,
    /// Names of the classes whose declared package is this one.
    pub classes: BTreeSet<String>,
    /// Names of the packages that depend on this one.
    pub afferents: BTreeSet<String>,
    /// Names of the packages this one depends on.
    pub efferents: BTreeSet<String>,
    pub volatility: Volatility,
    pub contains_cycle: bool,
}

impl JavaPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: BTreeSet::new(),
            afferents: BTreeSet::new(),
            efferents: BTreeSet::new(),
            volatility: Volatility::default(),
            contains_cycle: false,
        }
    }

    pub fn afferent_coupling(&self) -> usize {
        self.afferents.len()
    }

    pub fn efferent_coupling(&self) -> usize {
        self.efferents.len()
    }
}

impl PartialEq for JavaPackage {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for JavaPackage {}

/// Sort key for package listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PackageSort {
    #[default]
    Name,
}

/// The canonical set of packages and classes discovered during a session.
///
/// Entities are created on first name lookup and live for the session;
/// edges accumulate monotonically.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    packages: BTreeMap<String, JavaPackage>,
    classes: BTreeMap<String, JavaClass>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical package for `name`, created on first lookup.
    pub fn get_or_create_package(&mut self, name: &str) -> &mut JavaPackage {
        self.packages
            .entry(name.to_string())
            .or_insert_with(|| JavaPackage::new(name))
    }

    pub fn package(&self, name: &str) -> Option<&JavaPackage> {
        self.packages.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&JavaClass> {
        self.classes.get(name)
    }

    /// Packages in name order.
    pub fn packages(&self) -> impl Iterator<Item = &JavaPackage> {
        self.packages.values()
    }

    /// Packages ordered by the requested sort key.
    pub fn packages_sorted(&self, sort: PackageSort) -> Vec<&JavaPackage> {
        match sort {
            PackageSort::Name => self.packages.values().collect(),
        }
    }

    pub fn classes(&self) -> impl Iterator<Item = &JavaClass> {
        self.classes.values()
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Ingest one parsed class: canonicalize it by name, join its home
    /// package, and insert one edge per imported package.
    pub fn add_class(&mut self, parsed: JavaClass) -> &JavaClass {
        let home = parsed.package_name.clone();
        self.get_or_create_package(&home)
            .classes
            .insert(parsed.name.clone());
        for import in &parsed.imported_packages {
            self.add_edge(&home, import);
        }

        let class = self
            .classes
            .entry(parsed.name.clone())
            .or_insert_with(|| JavaClass::new(parsed.name.clone()));
        class.package_name = home;
        class.is_abstract = parsed.is_abstract;
        class.source_file = parsed.source_file;
        class.imported_packages.extend(parsed.imported_packages);
        class
    }

    /// Inserts `home → dependency`, maintaining both directions
    /// idempotently. Self-edges are ignored.
    pub fn add_edge(&mut self, home: &str, dependency: &str) {
        if home == dependency {
            return;
        }
        self.get_or_create_package(dependency)
            .afferents
            .insert(home.to_string());
        self.get_or_create_package(home)
            .efferents
            .insert(dependency.to_string());
    }

    /// Marks a package's volatility, creating it if necessary.
    pub fn set_volatility(&mut self, name: &str, volatility: Volatility) {
        self.get_or_create_package(name).volatility = volatility;
    }

    /// Abstract and concrete class counts for a package.
    pub fn class_counts(&self, package: &JavaPackage) -> (usize, usize) {
        let mut abstract_count = 0;
        let mut concrete_count = 0;
        for class_name in &package.classes {
            if let Some(class) = self.classes.get(class_name) {
                if class.is_abstract {
                    abstract_count += 1;
                } else {
                    concrete_count += 1;
                }
            }
        }
        (abstract_count, concrete_count)
    }

    /// Total directed edge count.
    pub fn edge_count(&self) -> usize {
        self.packages.values().map(|p| p.efferents.len()).sum()
    }

    /// Verifies edge symmetry and the no-self-edge rule. A failure here
    /// is fatal and indicates a graph bug.
    pub fn check_invariants(&self) -> Result<()> {
        for package in self.packages.values() {
            if package.efferents.contains(&package.name)
                || package.afferents.contains(&package.name)
            {
                return Err(Error::InvariantViolation(format!(
                    "self edge on package {}",
                    package.name
                )));
            }
            for efferent in &package.efferents {
                let symmetric = self
                    .packages
                    .get(efferent)
                    .is_some_and(|other| other.afferents.contains(&package.name));
                if !symmetric {
                    return Err(Error::InvariantViolation(format!(
                        "missing afferent back-edge {} -> {}",
                        package.name, efferent
                    )));
                }
            }
            for afferent in &package.afferents {
                let symmetric = self
                    .packages
                    .get(afferent)
                    .is_some_and(|other| other.efferents.contains(&package.name));
                if !symmetric {
                    return Err(Error::InvariantViolation(format!(
                        "missing efferent forward-edge {} -> {}",
                        afferent, package.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Collapses packages into user-declared components. One-shot; runs
    /// after ingestion and before metrics.
    ///
    /// Classes retain identity with a rewritten package name; edges that
    /// would become self-edges under the rewrite are dropped; afferent
    /// and efferent sets are rebuilt from the rewritten classes.
    pub fn merge_components(&mut self, components: &[String]) {
        if components.is_empty() {
            return;
        }
        let mut merged = DependencyGraph::new();
        for (_, mut class) in std::mem::take(&mut self.classes) {
            class.package_name = component_of(&class.package_name, components);
            class.imported_packages = class
                .imported_packages
                .iter()
                .map(|import| component_of(import, components))
                .filter(|import| *import != class.package_name)
                .collect();
            merged.add_class(class);
        }
        *self = merged;
    }
}

fn component_of(package: &str, components: &[String]) -> String {
    components
        .iter()
        .find(|component| package.starts_with(component.as_str()))
        .cloned()
        .unwrap_or_else(|| package.to_string())
}
