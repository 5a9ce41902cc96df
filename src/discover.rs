//! Config file discovery
//!
//! Walks a directory tree and returns files whose names match the
//! configured globs.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// What `find` looks for and where it does not look.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverSettings {
    /// Globs matched against file names
    pub patterns: Vec<String>,
    /// Maximum depth below the root directory
    pub max_depth: usize,
    /// Directory names that are never entered
    pub skip_dirs: Vec<String>,
}

/// Errors for discovery
#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

fn build_globs(patterns: &[String]) -> Result<GlobSet, DiscoverError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Find matching files below `root`, sorted by path.
pub fn discover(root: &Path, settings: &DiscoverSettings) -> Result<Vec<PathBuf>, DiscoverError> {
    if !root.is_dir() {
        return Err(DiscoverError::NotADirectory(root.to_path_buf()));
    }
    let globs = build_globs(&settings.patterns)?;
    let skipped = |entry: &DirEntry| {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && settings
                .skip_dirs
                .iter()
                .any(|dir| entry.file_name().to_string_lossy() == dir.as_str())
    };

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .max_depth(settings.max_depth)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter()
        .filter_entry(|e| !skipped(e))
    {
        let entry = entry?;
        if entry.file_type().is_file() && globs.is_match(entry.file_name()) {
            tracing::debug!(path = %entry.path().display(), "found config file");
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}
