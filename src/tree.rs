//! Recursive file listing for the q2lint checks.
//!
//! Walks a source tree in a deterministic (name-sorted) order and yields the
//! regular files it contains. Version control metadata, bytecode caches,
//! packaging metadata and vendored node modules are pruned before the walk
//! descends into them. Symlinks are not followed.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never descended into.
const PRUNED_DIRS: [&str; 4] = [".git", "__pycache__", "node_modules", "*.egg-info"];

#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] globset::Error),
}

impl From<walkdir::Error> for WalkError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf);
        match (err.into_io_error(), path) {
            (Some(e), Some(path)) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                WalkError::PermissionDenied(path)
            }
            (Some(e), _) => WalkError::Io(e),
            (None, _) => WalkError::Io(std::io::Error::other("filesystem loop detected")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path usable for opening the file.
    pub path: PathBuf,
    /// Path relative to the walk root.
    pub relative_path: PathBuf,
}

/// A file's bytes, classified as text or opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    /// Not valid UTF-8. Treated as binary and never checked or rewritten.
    Opaque,
}

impl FileContent {
    pub fn classify(bytes: Vec<u8>) -> Self {
        match String::from_utf8(bytes) {
            Ok(text) => FileContent::Text(text),
            Err(_) => FileContent::Opaque,
        }
    }

    pub fn read(path: &Path) -> std::io::Result<Self> {
        Ok(Self::classify(std::fs::read(path)?))
    }
}

#[derive(Debug, Default)]
pub struct Listing {
    pub files: Vec<FileEntry>,
    /// Entries that could not be read. The walk continues past them.
    pub errors: Vec<WalkError>,
}

fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, WalkError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern.as_ref())?);
    }
    Ok(builder.build()?)
}

fn is_pruned(entry: &DirEntry, pruned: &GlobSet) -> bool {
    entry.depth() > 0 && entry.file_type().is_dir() && pruned.is_match(entry.file_name())
}

/// List every regular file below `root`.
///
/// `exclude` holds glob patterns matched against paths relative to `root`;
/// a matching directory is pruned, a matching file is skipped.
pub fn list_files<S: AsRef<str>>(root: &Path, exclude: &[S]) -> Result<Listing, WalkError> {
    if let Err(e) = std::fs::metadata(root) {
        return Err(if e.kind() == std::io::ErrorKind::PermissionDenied {
            WalkError::PermissionDenied(root.to_path_buf())
        } else {
            WalkError::Io(e)
        });
    }

    let pruned = build_globset(&PRUNED_DIRS)?;
    let excluded = build_globset(exclude)?;

    let is_excluded = |entry: &DirEntry| {
        entry
            .path()
            .strip_prefix(root)
            .map(|relative| entry.depth() > 0 && excluded.is_match(relative))
            .unwrap_or(false)
    };

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, &pruned) && !is_excluded(entry));

    let mut listing = Listing::default();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                listing.errors.push(e.into());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative_path = match entry.path().strip_prefix(root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => continue,
        };

        listing.files.push(FileEntry {
            path: entry.path().to_path_buf(),
            relative_path,
        });
    }

    Ok(listing)
}
