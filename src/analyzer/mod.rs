//! Analysis orchestration.
//!
//! One `Analyzer` drives one session: collect class files from the
//! registered roots, parse each in collector order, feed successes into
//! the dependency graph, optionally merge packages into user-declared
//! components, then compute metrics and cycles. Per-class failures are
//! logged and skipped; the session carries on.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::core::Result;
use crate::filter::PackageFilter;
use crate::graph::{DependencyGraph, JavaClass};
use crate::io::collector::FileCollector;
use crate::metrics::{self, PackageMetrics};
use crate::parser::ClassFileParser;

/// Observer notified after each successfully parsed class, inline and in
/// collector order.
pub trait ParseListener {
    fn on_parsed_class(&mut self, class: &JavaClass);
}

pub struct Analyzer {
    filter: PackageFilter,
    components: Vec<String>,
    collector: FileCollector,
    listeners: Vec<Box<dyn ParseListener>>,
    graph: DependencyGraph,
}

impl Analyzer {
    pub fn new(filter: PackageFilter) -> Self {
        Self {
            filter,
            components: Vec::new(),
            collector: FileCollector::new(),
            listeners: Vec::new(),
            graph: DependencyGraph::new(),
        }
    }

    /// Registers a directory or archive root.
    pub fn add_root(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        self.collector.add_root(path)
    }

    /// Component prefixes to merge packages into after ingestion.
    pub fn set_components(&mut self, components: Vec<String>) {
        self.components = components;
    }

    pub fn accept_inner_classes(&mut self, accept: bool) {
        self.collector.accept_inner_classes(accept);
    }

    pub fn add_listener(&mut self, listener: Box<dyn ParseListener>) {
        self.listeners.push(listener);
    }

    /// Runs the session and returns per-package metrics in name order.
    pub fn analyze(&mut self) -> Result<Vec<PackageMetrics>> {
        let parser = ClassFileParser::new(self.filter.clone());
        let sources = self.collector.collect()?;
        info!(files = sources.len(), "analyzing class files");

        let mut parsed_count = 0usize;
        for source in &sources {
            let bytes = match source.read() {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(class = %source.display_name(), error = %e, "skipping unreadable class file");
                    continue;
                }
            };
            match parser.parse(&bytes) {
                Ok(class) => {
                    for listener in &mut self.listeners {
                        listener.on_parsed_class(&class);
                    }
                    self.graph.add_class(class);
                    parsed_count += 1;
                }
                Err(e) => {
                    warn!(class = %source.display_name(), error = %e, "skipping unparseable class file");
                }
            }
        }
        debug!(
            classes = parsed_count,
            packages = self.graph.package_count(),
            "dependency graph populated"
        );

        if !self.components.is_empty() {
            self.graph.merge_components(&self.components);
        }

        Ok(metrics::compute(&mut self.graph))
    }

    /// The graph built by [`analyze`](Self::analyze).
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Mutable access, e.g. to tune package volatility before metrics.
    pub fn graph_mut(&mut self) -> &mut DependencyGraph {
        &mut self.graph
    }
}
