//! # classdep
//!
//! A package dependency analyzer for JVM class files that computes the
//! classic design-quality metrics: afferent coupling (Ca), efferent
//! coupling (Ce), abstractness (A), instability (I), and distance from
//! the main sequence (D), plus package dependency cycle detection.
//!
//! Given directories or archives of compiled class files, classdep
//! parses every class at the byte level (no JVM required), aggregates
//! classes into packages, resolves inter-package references from super
//! classes, interfaces, field and method descriptors, constant-pool
//! class entries, and runtime-visible annotations, and reports
//! per-package metrics and cycles.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use classdep::{Analyzer, PackageFilter};
//!
//! let filter = PackageFilter::from_prefixes(["java.", "javax."]);
//! let mut analyzer = Analyzer::new(filter);
//! analyzer.add_root("target/classes").unwrap();
//!
//! for metrics in analyzer.analyze().unwrap() {
//!     println!(
//!         "{}: Ca={} Ce={} D={:.2}",
//!         metrics.name, metrics.afferent_coupling, metrics.efferent_coupling, metrics.distance
//!     );
//! }
//! ```
//!
//! ## Dependency Assertions
//!
//! Package dependencies can be locked down in tests with a
//! [`DependencyConstraint`]:
//!
//! ```rust,no_run
//! use classdep::{Analyzer, DependencyConstraint, PackageFilter};
//!
//! let mut analyzer = Analyzer::new(PackageFilter::from_defaults());
//! analyzer.add_root("build/classes").unwrap();
//! analyzer.analyze().unwrap();
//!
//! let mut constraint = DependencyConstraint::new();
//! constraint.add_package("com.app.web");
//! constraint.add_package("com.app.util");
//! constraint.depends_upon("com.app.web", "com.app.util");
//!
//! assert!(constraint.matches(analyzer.graph()));
//! ```
//!
//! ## Core Modules
//!
//! - **[`parser`]** - Bit-exact class-file reader (constant pool,
//!   descriptors, annotations, modified UTF-8)
//! - **[`graph`]** - Canonical package/class model with symmetric
//!   afferent/efferent edges and component merging
//! - **[`metrics`]** - Ca/Ce/A/I/D and DFS-based cycle detection
//! - **[`analyzer`]** - Session orchestration and listener dispatch
//! - **[`constraint`]** - Dependency assertions for tests
//! - **[`filter`]** - Package-name prefix filtering
//! - **[`config`]** - `classdep.properties` loading
//! - **[`io`]** - Root collection (directories and archives) and report
//!   writers

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constraint;
pub mod core;
pub mod filter;
pub mod graph;
pub mod io;
pub mod metrics;
pub mod observability;
pub mod parser;

// Re-export commonly used types
pub use crate::analyzer::{Analyzer, ParseListener};
pub use crate::config::PropertyConfig;
pub use crate::constraint::DependencyConstraint;
pub use crate::core::{Error, Result};
pub use crate::filter::PackageFilter;
pub use crate::graph::{DependencyGraph, JavaClass, JavaPackage, Volatility};
pub use crate::io::output::{build_report, create_writer, OutputFormat};
pub use crate::metrics::{collect_all_cycles, detect_cycles, PackageMetrics};
pub use crate::parser::{ClassFileParser, ParseError};
