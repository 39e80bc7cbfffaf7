//! In-place rewrite of copyright notices to end in the current year.
//!
//! Every notice of the form `(c) YYYY, QIIME 2` or `(c) YYYY-YYYY, QIIME 2`
//! becomes `(c) YYYY-<current>, QIIME 2`, keeping the original start year.
//! Running the rewrite twice in the same year changes nothing the second
//! time.

use crate::tree::{FileContent, WalkError, list_files};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Walk error: {0}")]
    Walk(#[from] WalkError),
}

impl RewriteError {
    fn from_io(path: &Path, e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            RewriteError::PermissionDenied(path.to_path_buf())
        } else {
            RewriteError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RewriteOptions {
    pub dry_run: bool,
}

#[derive(Debug, Default)]
pub struct RewriteResult {
    /// Paths relative to the root of files whose notices changed.
    pub files_updated: Vec<PathBuf>,
    /// Files that changed but could not be written back.
    pub failures: Vec<RewriteError>,
}

fn notice_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\(c\) (?P<start>[0-9]{4})(?:-(?P<end>[0-9]{4}))?(?P<marker>, QIIME 2)")
            .expect("copyright notice regex must compile")
    })
}

/// Rewrite every copyright notice in `text` to end in `current_year`.
///
/// Notices whose start year lies after `current_year` are left alone.
pub fn bump_years(text: &str, current_year: i32) -> Cow<'_, str> {
    notice_re().replace_all(text, |caps: &Captures<'_>| {
        let start = &caps["start"];
        let marker = &caps["marker"];
        match start.parse::<i32>() {
            Ok(year) if year == current_year => format!("(c) {current_year}{marker}"),
            Ok(year) if year < current_year => format!("(c) {start}-{current_year}{marker}"),
            _ => caps[0].to_string(),
        }
    })
}

/// Rewrite copyright notices in every text file below `root`.
///
/// Files are only written when their content changes. Binary files and
/// unreadable files are skipped.
pub fn bump_copyright_years(
    root: &Path,
    current_year: i32,
    options: RewriteOptions,
) -> Result<RewriteResult, RewriteError> {
    let listing = list_files::<&str>(root, &[])?;
    for err in &listing.errors {
        warn!("Skipping unreadable entry: {err}");
    }

    let mut result = RewriteResult::default();

    for file in listing.files {
        let text = match FileContent::read(&file.path) {
            Ok(FileContent::Text(text)) => text,
            Err(e) => {
                warn!("Skipping unreadable file {}: {e}", file.path.display());
                continue;
            }
            Ok(FileContent::Opaque) => {
                debug!("Skipping binary file {}", file.path.display());
                continue;
            }
        };

        let bumped = bump_years(&text, current_year);
        if bumped == text.as_str() {
            continue;
        }

        info!("Updating copyright years in {}", file.relative_path.display());

        if !options.dry_run
            && let Err(e) = write_atomically(&file.path, bumped.as_bytes())
        {
            result.failures.push(e);
            continue;
        }

        result.files_updated.push(file.relative_path);
    }

    Ok(result)
}

/// Replace the file at `path` with `content`, keeping its permissions.
///
/// Writes to a temporary file in the same directory, fsyncs it, then renames
/// it into place.
fn write_atomically(path: &Path, content: &[u8]) -> Result<(), RewriteError> {
    let permissions = std::fs::metadata(path)
        .map_err(|e| RewriteError::from_io(path, e))?
        .permissions();

    let parent = path.parent().unwrap_or(Path::new("."));

    let mut temp_file =
        tempfile::NamedTempFile::new_in(parent).map_err(|e| RewriteError::from_io(parent, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| RewriteError::from_io(path, e))?;

    temp_file
        .as_file()
        .set_permissions(permissions)
        .map_err(|e| RewriteError::from_io(path, e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| RewriteError::from_io(path, e))?;

    temp_file
        .persist(path)
        .map_err(|e| RewriteError::from_io(path, e.error))?;

    Ok(())
}
