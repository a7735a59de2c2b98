//! Class-file collection from directories and archives.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::{Error, Result};

const ARCHIVE_EXTENSIONS: [&str; 3] = [".jar", ".zip", ".war"];
const CLASS_EXTENSION: &str = ".class";

/// A collected class file, read on demand so no handle outlives a single
/// class's parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassSource {
    File(PathBuf),
    ArchiveEntry { archive: PathBuf, entry: String },
}

impl ClassSource {
    /// Logical name: the file path, or `archive!entry` for archives.
    pub fn display_name(&self) -> String {
        match self {
            ClassSource::File(path) => path.display().to_string(),
            ClassSource::ArchiveEntry { archive, entry } => {
                format!("{}!{}", archive.display(), entry)
            }
        }
    }

    /// Reads the class bytes. The underlying handle is closed before
    /// returning, on both success and failure.
    pub fn read(&self) -> Result<Vec<u8>> {
        match self {
            ClassSource::File(path) => Ok(std::fs::read(path)?),
            ClassSource::ArchiveEntry { archive, entry } => {
                let file = File::open(archive)?;
                let mut zip = zip::ZipArchive::new(file)?;
                let mut entry = zip.by_name(entry)?;
                let mut bytes = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}

/// Collects `.class` files from registered roots: directory trees or
/// `.jar`/`.zip`/`.war` archives.
#[derive(Debug)]
pub struct FileCollector {
    roots: Vec<PathBuf>,
    accept_inner_classes: bool,
}

impl Default for FileCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl FileCollector {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            accept_inner_classes: true,
        }
    }

    /// Determines whether inner classes (a `$` after the first character
    /// of the base name) are collected. Default: yes.
    pub fn accept_inner_classes(&mut self, accept: bool) {
        self.accept_inner_classes = accept;
    }

    /// Registers a root. Fails unless it is a directory or a recognized
    /// archive file.
    pub fn add_root(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if path.is_dir() || is_archive(&path) {
            self.roots.push(path);
            Ok(())
        } else {
            Err(Error::InvalidRoot(path))
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Collects every accepted class file across all roots, deduplicated
    /// by logical name and sorted. A root that cannot be opened at all is
    /// a configuration error.
    pub fn collect(&self) -> Result<Vec<ClassSource>> {
        let mut sources: BTreeMap<String, ClassSource> = BTreeMap::new();
        for root in &self.roots {
            if root.is_dir() {
                self.collect_directory(root, &mut sources);
            } else {
                self.collect_archive(root, &mut sources)?;
            }
        }
        debug!(count = sources.len(), "collected class files");
        Ok(sources.into_values().collect())
    }

    fn collect_directory(&self, root: &Path, out: &mut BTreeMap<String, ClassSource>) {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %root.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if !self.accept_class_file_name(&file_name) {
                continue;
            }
            let source = ClassSource::File(entry.path().to_path_buf());
            out.insert(source.display_name(), source);
        }
    }

    fn collect_archive(&self, root: &Path, out: &mut BTreeMap<String, ClassSource>) -> Result<()> {
        let file = File::open(root).map_err(|e| {
            Error::Configuration(format!("cannot open archive {}: {e}", root.display()))
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            Error::Configuration(format!("cannot read archive {}: {e}", root.display()))
        })?;
        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            if !entry.is_file() {
                continue;
            }
            let entry_name = entry.name().to_string();
            let base_name = entry_name.rsplit('/').next().unwrap_or(&entry_name);
            if !self.accept_class_file_name(base_name) {
                continue;
            }
            let source = ClassSource::ArchiveEntry {
                archive: root.to_path_buf(),
                entry: entry_name,
            };
            out.insert(source.display_name(), source);
        }
        Ok(())
    }

    /// Class-file name acceptance: a `.class` suffix, and unless inner
    /// classes are accepted, no `$` after the first character.
    fn accept_class_file_name(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        if !lowered.ends_with(CLASS_EXTENSION) {
            return false;
        }
        if !self.accept_inner_classes {
            if let Some(position) = lowered.find('$') {
                if position > 0 {
                    return false;
                }
            }
        }
        true
    }
}

fn is_archive(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    ARCHIVE_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}
