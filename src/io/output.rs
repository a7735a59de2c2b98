//! Report assembly and writer selection.

use std::io::Write;

use serde::Serialize;

use crate::graph::DependencyGraph;
use crate::io::writers::{JsonWriter, TextWriter};
use crate::metrics::{self, PackageMetrics};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// One package's slice of the report.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub name: String,
    pub abstract_classes: Vec<String>,
    pub concrete_classes: Vec<String>,
    pub depends_upon: Vec<String>,
    pub used_by: Vec<String>,
    pub metrics: PackageMetrics,
    /// Simple cycles through this package, present only when it lies on
    /// one.
    pub cycles: Vec<Vec<String>>,
}

/// Assembles the report model from an analyzed graph, in package name
/// order.
pub fn build_report(graph: &DependencyGraph, metrics: &[PackageMetrics]) -> Vec<PackageReport> {
    metrics
        .iter()
        .filter_map(|package_metrics| {
            let package = graph.package(&package_metrics.name)?;
            let mut abstract_classes = Vec::new();
            let mut concrete_classes = Vec::new();
            for class_name in &package.classes {
                if let Some(class) = graph.class(class_name) {
                    if class.is_abstract {
                        abstract_classes.push(class.name.clone());
                    } else {
                        concrete_classes.push(class.name.clone());
                    }
                }
            }
            let cycles = if package.contains_cycle {
                metrics::collect_all_cycles(graph, &package.name)
            } else {
                Vec::new()
            };
            Some(PackageReport {
                name: package.name.clone(),
                abstract_classes,
                concrete_classes,
                depends_upon: package.efferents.iter().cloned().collect(),
                used_by: package.afferents.iter().cloned().collect(),
                metrics: package_metrics.clone(),
                cycles,
            })
        })
        .collect()
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &[PackageReport]) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, out: Box<dyn Write>) -> Box<dyn ReportWriter> {
    match format {
        OutputFormat::Text => Box::new(TextWriter::new(out)),
        OutputFormat::Json => Box::new(JsonWriter::new(out)),
    }
}
