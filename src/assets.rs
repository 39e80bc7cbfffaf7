//! Rebuilding bundled web assets and checking them against version control.
//!
//! Every `package.json` below the top level of the tree marks a package whose
//! generated bundle is committed. The package is installed and built, then
//! the bundle is diffed against the tracked copy. The build itself is
//! delegated to external tools through [`AssetBuilder`].

use crate::tree::FileEntry;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, warn};

const PACKAGE_MANIFEST: &str = "package.json";

/// Exit status of `git diff --quiet` when the compared paths differ.
const GIT_DIFF_CHANGED: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Install,
    Build,
    Diff,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    InSync,
    Drifted,
    ToolError { step: BuildStep, detail: String },
}

pub trait AssetBuilder {
    fn build_and_check(&self, package_dir: &Path) -> BuildOutcome;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub path: PathBuf,
    pub relative_path: PathBuf,
}

/// Packages found in a file listing, excluding a manifest at the root itself.
pub fn find_packages(files: &[FileEntry]) -> Vec<Package> {
    files
        .iter()
        .filter(|f| f.relative_path.file_name() == Some(std::ffi::OsStr::new(PACKAGE_MANIFEST)))
        .filter(|f| f.relative_path.components().count() > 1)
        .filter_map(|f| {
            Some(Package {
                path: f.path.parent()?.to_path_buf(),
                relative_path: f.relative_path.parent()?.to_path_buf(),
            })
        })
        .collect()
}

/// Error message for a package, or `None` when its bundle is in sync.
pub fn outcome_message(package: &Package, outcome: &BuildOutcome) -> Option<String> {
    let path = package.relative_path.display();
    match outcome {
        BuildOutcome::InSync => None,
        BuildOutcome::Drifted => Some(format!("Bundle is out of sync for {path}")),
        BuildOutcome::ToolError { step, detail } => {
            warn!("{step:?} step failed for {path}: {detail}");
            Some(match step {
                BuildStep::Install => format!("npm install failed for {path}"),
                BuildStep::Build => format!("npm build error on {path}"),
                BuildStep::Diff => format!("git diff failed on {path}"),
            })
        }
    }
}

/// Builds packages with `npm` and diffs `*/bundle.js` with `git`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NpmBuilder;

fn run_step(dir: &Path, program: &str, args: &[&str]) -> std::io::Result<ExitStatus> {
    debug!("Running {program} {} in {}", args.join(" "), dir.display());
    Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::null())
        .status()
}

fn describe(result: std::io::Result<ExitStatus>) -> Result<ExitStatus, String> {
    result.map_err(|e| e.to_string())
}

/// Failure of an install or build step, or `None` when the next step may run.
fn step_failure(
    step: BuildStep,
    program: &str,
    result: std::io::Result<ExitStatus>,
) -> Option<BuildOutcome> {
    match describe(result) {
        Ok(status) if status.success() => None,
        Ok(status) => Some(BuildOutcome::ToolError {
            step,
            detail: format!("{program} exited with {status}"),
        }),
        Err(detail) => Some(BuildOutcome::ToolError { step, detail }),
    }
}

/// Outcome of `git diff --quiet`: clean, changed, or the diff itself failed.
fn diff_outcome(result: std::io::Result<ExitStatus>) -> BuildOutcome {
    match describe(result) {
        Ok(status) if status.success() => BuildOutcome::InSync,
        Ok(status) if status.code() == Some(GIT_DIFF_CHANGED) => BuildOutcome::Drifted,
        Ok(status) => BuildOutcome::ToolError {
            step: BuildStep::Diff,
            detail: format!("git exited with {status}"),
        },
        Err(detail) => BuildOutcome::ToolError {
            step: BuildStep::Diff,
            detail,
        },
    }
}

impl AssetBuilder for NpmBuilder {
    fn build_and_check(&self, package_dir: &Path) -> BuildOutcome {
        let steps: [(BuildStep, &str, &[&str]); 2] = [
            (
                BuildStep::Install,
                "npm",
                &["i", "--silent", "--progress", "false"],
            ),
            (BuildStep::Build, "npm", &["run", "build", "--", "--bail"]),
        ];

        for (step, program, args) in steps {
            let result = run_step(package_dir, program, args);
            if let Some(failure) = step_failure(step, program, result) {
                return failure;
            }
        }

        diff_outcome(run_step(
            package_dir,
            "git",
            &["diff", "--quiet", "--", "*/bundle.js"],
        ))
    }
}
