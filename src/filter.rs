//! Package-name prefix filtering.

use std::path::Path;

use crate::config::PropertyConfig;
use crate::core::Result;

/// Filters imported package names by prefix.
///
/// The default filter carries the prefixes declared in the
/// `classdep.properties` file in the user's home directory, falling back
/// to the defaults compiled into the binary. A rejected package never
/// enters the dependency graph.
#[derive(Debug, Clone, Default)]
pub struct PackageFilter {
    prefixes: Vec<String>,
}

impl PackageFilter {
    /// An empty filter that accepts every package.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Filter built from the default property-file search.
    pub fn from_defaults() -> Self {
        Self::from_prefixes(PropertyConfig::load_default().filtered_packages())
    }

    /// Filter built from the property file at `path`.
    pub fn from_property_file(path: &Path) -> Result<Self> {
        let config = PropertyConfig::from_file(path)?;
        Ok(Self::from_prefixes(config.filtered_packages()))
    }

    /// Filter built from an explicit prefix list.
    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = Self::default();
        for prefix in prefixes {
            filter.add_prefix(prefix.into());
        }
        filter
    }

    /// The configured prefixes, in declaration order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Adds one prefix. A trailing `*` is stripped; matching is always
    /// prefix-based, so `com.foo` and `com.foo*` behave identically.
    /// Empty entries are discarded.
    pub fn add_prefix(&mut self, prefix: impl Into<String>) {
        let mut prefix = prefix.into();
        if prefix.ends_with('*') {
            prefix.pop();
        }
        if !prefix.is_empty() {
            self.prefixes.push(prefix);
        }
    }

    /// Returns `true` if `package_name` should be kept.
    pub fn accept(&self, package_name: &str) -> bool {
        !self
            .prefixes
            .iter()
            .any(|prefix| package_name.starts_with(prefix.as_str()))
    }
}
