//! File selection for a rewrite run.
//!
//! A selector is either a recursive tree walk (extension filter plus a
//! directory denylist) or an explicit list of paths. Enumeration order is
//! deterministic: file-name order inside every directory for trees, the given
//! order for explicit lists.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::config::MendConfig;
use crate::errors::MendError;
use crate::pass::PassKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelector {
    Tree {
        root: PathBuf,
        extensions: Vec<String>,
        exclude_dirs: Vec<String>,
    },
    Explicit(Vec<PathBuf>),
}

impl FileSelector {
    pub fn tree(root: impl Into<PathBuf>, extensions: Vec<String>, exclude_dirs: Vec<String>) -> Self {
        FileSelector::Tree {
            root: root.into(),
            extensions,
            exclude_dirs,
        }
    }

    /// The selector a pass uses under `config`. The repair pass takes its
    /// explicit target list when one is configured; relative targets resolve
    /// against the configured root.
    pub fn for_pass(kind: PassKind, config: &MendConfig) -> Self {
        let root = config.root();
        if kind == PassKind::Repair && !config.repair.targets.is_empty() {
            return FileSelector::Explicit(
                config
                    .repair
                    .targets
                    .iter()
                    .map(|t| if t.is_absolute() { t.clone() } else { root.join(t) })
                    .collect(),
            );
        }
        FileSelector::tree(
            root,
            config.selector.extensions.clone(),
            config.selector.exclude_dirs.clone(),
        )
    }

    /// Enumerates candidate files. Fails only when a tree root cannot be read.
    pub fn select(&self) -> Result<Vec<PathBuf>, MendError> {
        match self {
            FileSelector::Explicit(paths) => {
                debug!("Using {} explicitly listed file(s).", paths.len());
                Ok(paths.clone())
            }
            FileSelector::Tree {
                root,
                extensions,
                exclude_dirs,
            } => walk_tree(root, extensions, exclude_dirs),
        }
    }
}

fn is_excluded_dir(entry: &DirEntry, exclude_dirs: &[String]) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && exclude_dirs
            .iter()
            .any(|d| entry.file_name().to_string_lossy() == d.as_str())
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| e.as_str() == ext)
        })
        .unwrap_or(false)
}

fn walk_tree(root: &Path, extensions: &[String], exclude_dirs: &[String]) -> Result<Vec<PathBuf>, MendError> {
    let metadata = std::fs::metadata(root).map_err(|source| MendError::SelectorRoot {
        root: root.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(MendError::SelectorRoot {
            root: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, exclude_dirs));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let message = e.to_string();
                return Err(MendError::SelectorRoot {
                    root: root.to_path_buf(),
                    source: e.into_io_error().unwrap_or_else(|| std::io::Error::other(message)),
                });
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    debug!("Selected {} file(s) under {}.", files.len(), root.display());
    Ok(files)
}
