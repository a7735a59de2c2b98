pub mod collector;
pub mod output;
pub mod writers;

pub use collector::{ClassSource, FileCollector};
pub use output::{build_report, create_writer, OutputFormat, PackageReport, ReportWriter};
