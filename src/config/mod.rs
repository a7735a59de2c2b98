//! Property-file configuration.
//!
//! `classdep.properties` is a plain `key=value` file; `#` starts a
//! comment. Any key whose value is the literal token `filtered`
//! contributes the key as a package-filter prefix, and the reserved
//! `components` key holds a comma-separated list of component prefixes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::{Error, Result};

/// Name of the property file searched for in the user's home directory.
pub const DEFAULT_PROPERTY_FILE: &str = "classdep.properties";

/// Property text compiled into the binary, used when no file is found.
const EMBEDDED_DEFAULTS: &str = include_str!("classdep.properties");

/// Parsed property file, preserving declaration order.
#[derive(Debug, Clone, Default)]
pub struct PropertyConfig {
    properties: Vec<(String, String)>,
}

impl PropertyConfig {
    /// Load from the default search path: `<home>/classdep.properties` if
    /// it exists, else the embedded defaults.
    pub fn load_default() -> Self {
        if let Some(path) = home_property_file() {
            match Self::from_file(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "loaded properties");
                    return config;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "falling back to embedded defaults");
                }
            }
        }
        Self::parse(EMBEDDED_DEFAULTS)
    }

    /// Load from an explicit property file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Configuration(format!("cannot read property file {}: {e}", path.display()))
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse property text. Lines without `=` are ignored with a warning.
    pub fn parse(contents: &str) -> Self {
        let mut properties = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) => {
                    properties.push((key.trim().to_string(), value.trim().to_string()));
                }
                None => warn!(line, "ignoring malformed property line"),
            }
        }
        Self { properties }
    }

    /// Keys whose value is the literal `filtered`, in file order.
    pub fn filtered_packages(&self) -> Vec<String> {
        self.properties
            .iter()
            .filter(|(_, value)| value.as_str() == "filtered")
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// The component prefixes declared by the `components` key, if any.
    pub fn components(&self) -> Option<Vec<String>> {
        self.properties
            .iter()
            .find(|(key, _)| key.as_str() == "components")
            .map(|(_, value)| {
                value
                    .split(',')
                    .map(|component| component.trim().to_string())
                    .filter(|component| !component.is_empty())
                    .collect()
            })
    }
}

fn home_property_file() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_PROPERTY_FILE))
        .filter(|path| path.is_file())
}
