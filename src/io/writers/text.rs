use std::io::Write;

use crate::io::output::{PackageReport, ReportWriter};

pub struct TextWriter<W: Write> {
    writer: W,
}

impl<W: Write> TextWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_package(&mut self, package: &PackageReport) -> anyhow::Result<()> {
        let out = &mut self.writer;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out, "- Package: {}", package.name)?;
        writeln!(out, "{}", "-".repeat(60))?;
        writeln!(out)?;

        let metrics = &package.metrics;
        writeln!(out, "Stats:")?;
        writeln!(out, "    Total Classes: {}", metrics.class_count)?;
        writeln!(out, "    Concrete Classes: {}", metrics.concrete_class_count)?;
        writeln!(out, "    Abstract Classes: {}", metrics.abstract_class_count)?;
        writeln!(out)?;
        writeln!(out, "    Ca: {}", metrics.afferent_coupling)?;
        writeln!(out, "    Ce: {}", metrics.efferent_coupling)?;
        writeln!(out)?;
        writeln!(out, "    A: {:.2}", metrics.abstractness)?;
        writeln!(out, "    I: {:.2}", metrics.instability)?;
        writeln!(out, "    D: {:.2}", metrics.distance)?;
        writeln!(out)?;

        if !package.abstract_classes.is_empty() {
            writeln!(out, "Abstract Classes:")?;
            for class in &package.abstract_classes {
                writeln!(out, "    {class}")?;
            }
            writeln!(out)?;
        }
        if !package.concrete_classes.is_empty() {
            writeln!(out, "Concrete Classes:")?;
            for class in &package.concrete_classes {
                writeln!(out, "    {class}")?;
            }
            writeln!(out)?;
        }
        if !package.depends_upon.is_empty() {
            writeln!(out, "Depends Upon:")?;
            for name in &package.depends_upon {
                writeln!(out, "    {name}")?;
            }
            writeln!(out)?;
        }
        if !package.used_by.is_empty() {
            writeln!(out, "Used By:")?;
            for name in &package.used_by {
                writeln!(out, "    {name}")?;
            }
            writeln!(out)?;
        }
        if !package.cycles.is_empty() {
            writeln!(out, "Cycles:")?;
            for cycle in &package.cycles {
                writeln!(out, "    {}", cycle.join(" -> "))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl<W: Write> ReportWriter for TextWriter<W> {
    fn write_report(&mut self, report: &[PackageReport]) -> anyhow::Result<()> {
        for package in report {
            self.write_package(package)?;
        }

        let cyclic = report.iter().filter(|p| p.metrics.contains_cycle).count();
        writeln!(self.writer, "Summary:")?;
        writeln!(self.writer, "    Packages: {}", report.len())?;
        writeln!(self.writer, "    Packages in cycles: {cyclic}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::PackageMetrics;

    fn sample_report() -> Vec<PackageReport> {
        vec![PackageReport {
            name: "com.example".to_string(),
            abstract_classes: vec!["com.example.Shape".to_string()],
            concrete_classes: vec!["com.example.Circle".to_string()],
            depends_upon: vec!["com.example.util".to_string()],
            used_by: vec![],
            metrics: PackageMetrics {
                name: "com.example".to_string(),
                class_count: 2,
                abstract_class_count: 1,
                concrete_class_count: 1,
                afferent_coupling: 0,
                efferent_coupling: 1,
                abstractness: 0.5,
                instability: 1.0,
                distance: 0.5,
                contains_cycle: false,
            },
            cycles: vec![],
        }]
    }

    #[test]
    fn renders_package_sections_and_summary() {
        let mut out = Vec::new();
        TextWriter::new(&mut out)
            .write_report(&sample_report())
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("- Package: com.example"));
        assert!(text.contains("Total Classes: 2"));
        assert!(text.contains("A: 0.50"));
        assert!(text.contains("Depends Upon:\n    com.example.util"));
        assert!(text.contains("Packages: 1"));
    }
}
