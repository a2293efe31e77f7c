//! Filesystem walker for enumerating the files of a directory
//!
//! The walk order determines leaf order, and leaf order determines every hash
//! in the tree, so it must be reproducible: entries are visited depth first,
//! sorted by file name within each directory.

use crate::error::ApiError;
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A regular file found by the walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Relative, `/`-separated path used as the leaf name
    pub name: String,
    /// Full path on disk
    pub path: PathBuf,
    pub size: u64,
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Whether to follow symbolic links (default: false, links are skipped)
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Path components to skip entirely (e.g. ".git")
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkConfig) -> Self {
        Self { root, config }
    }

    /// Walk the filesystem and collect every regular file, in walk order
    pub fn walk(&self) -> Result<Vec<FileEntry>, ApiError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name();

        let iter = walker
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry));

        for entry in iter {
            let entry = entry.map_err(|e| {
                ApiError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to walk directory: {}", e),
                ))
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                warn!(path = %entry.path().display(), "Ignoring special file");
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                ApiError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to read metadata for {:?}: {}", entry.path(), e),
                ))
            })?;

            let name = path::relative_name(&self.root, entry.path())?;
            entries.push(FileEntry {
                name,
                path: entry.path().to_path_buf(),
                size: metadata.len(),
            });
        }

        debug!(file_count = entries.len(), "Walked filesystem");
        Ok(entries)
    }

    /// Check if an entry matches an ignore pattern by path component
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        self.config
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.as_str() == name)
    }
}
