//! Shared error types for the analysis session.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal error type for classdep operations.
///
/// Per-class parse failures are deliberately not represented here: the
/// analyzer logs them and keeps going. Everything in this enum aborts the
/// session.
#[derive(Debug, Error)]
pub enum Error {
    /// A registered root is neither a directory nor a recognized archive.
    #[error("invalid directory or archive: {0}")]
    InvalidRoot(PathBuf),

    /// Unreadable property file, unopenable archive, malformed component
    /// list.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An edge mutation broke afferent/efferent symmetry. Must never occur
    /// under correct graph code.
    #[error("graph invariant violated: {0}")]
    InvariantViolation(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Archive errors
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
