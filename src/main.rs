//! classdep CLI entry point.
//!
//! Handles argument parsing, configuration loading, and top-level error
//! reporting; the analysis itself lives in the library.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use classdep::cli::{parse_args, Commands, OutputFormat};
use classdep::config::PropertyConfig;
use classdep::io::output::create_writer;
use classdep::observability::init_tracing;
use classdep::{build_report, Analyzer, PackageFilter};

fn main() -> Result<()> {
    init_tracing();

    let cli = parse_args();
    match cli.command {
        Commands::Analyze {
            paths,
            components,
            format,
            output,
            filter_file,
            no_inner_classes,
        } => run_analyze(paths, components, format, output, filter_file, no_inner_classes),
    }
}

fn run_analyze(
    paths: Vec<PathBuf>,
    components: Option<Vec<String>>,
    format: OutputFormat,
    output: Option<PathBuf>,
    filter_file: Option<PathBuf>,
    no_inner_classes: bool,
) -> Result<()> {
    let config = match &filter_file {
        Some(path) => PropertyConfig::from_file(path)?,
        None => PropertyConfig::load_default(),
    };
    let filter = PackageFilter::from_prefixes(config.filtered_packages());

    let mut analyzer = Analyzer::new(filter);
    for path in paths {
        analyzer.add_root(path)?;
    }
    if no_inner_classes {
        analyzer.accept_inner_classes(false);
    }
    if let Some(components) = components.or_else(|| config.components()) {
        analyzer.set_components(components);
    }

    let metrics = analyzer.analyze()?;
    let report = build_report(analyzer.graph(), &metrics);

    let out: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    create_writer(format.into(), out).write_report(&report)?;
    Ok(())
}
