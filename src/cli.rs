use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "classdep")]
#[command(about = "Package dependency and design-quality metrics for JVM class files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze class files and report per-package metrics
    Analyze {
        /// Directories or archives (.jar, .zip, .war) to analyze
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Comma-separated component prefixes to merge packages into
        #[arg(long, value_delimiter = ',')]
        components: Option<Vec<String>>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Property file with package filters and component definitions
        #[arg(long)]
        filter_file: Option<PathBuf>,

        /// Skip inner classes (names containing `$`)
        #[arg(long)]
        no_inner_classes: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => crate::io::output::OutputFormat::Text,
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
