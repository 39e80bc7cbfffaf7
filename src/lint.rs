use crate::assets::{AssetBuilder, find_packages, outcome_message};
use crate::descriptor::{DESCRIPTOR_NAME, check_descriptor};
use crate::header::{REFERENCE_HEADER, REFERENCE_LICENSE, check_header, check_license};
use crate::template::{Template, TemplateError, Verdict, YearPolicy};
use crate::tree::{FileContent, FileEntry, WalkError, list_files};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

const LICENSE_FILENAME: &str = "LICENSE";

/// Generated files that never carry the header.
const UNCHECKED_FILENAMES: [&str; 2] = ["_version.py", "versioneer.py"];

/// Top-level build output directory, never checked.
const BUILD_DIR: &str = "build";

#[derive(Debug, thiserror::Error)]
pub enum LintError {
    #[error("Reference template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] WalkError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
    pub install_requires_check: bool,
    pub year_policy: YearPolicy,
    pub build_assets: bool,
    pub exclude: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Report {
    pub errors: Vec<String>,
    pub files_checked: usize,
    pub packages_built: usize,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// All collected errors, separated by blank lines.
    pub fn render(&self) -> String {
        self.errors.join("\n\n")
    }
}

/// Check a source tree: LICENSE, source headers, setup.py policy and bundled
/// assets.
///
/// Every problem found is collected into the returned [`Report`]; the scan
/// never stops at the first failure. An `Err` is only returned when the check
/// cannot run at all (broken reference template, unreadable root, invalid
/// exclude pattern).
pub fn lint_tree(
    root: &Path,
    options: &LintOptions,
    builder: &dyn AssetBuilder,
) -> Result<Report, LintError> {
    let license_template = Template::parse(REFERENCE_LICENSE)?;
    let license_matcher = license_template.matcher(&options.year_policy)?;
    let header_template = Template::parse(REFERENCE_HEADER)?;
    let header_matcher = header_template.matcher(&options.year_policy)?;

    let mut report = Report::default();

    match std::fs::read_to_string(root.join(LICENSE_FILENAME)) {
        Ok(text) => {
            if let Verdict::Invalid(mismatch) = check_license(&text, &license_matcher) {
                report
                    .errors
                    .push(format!("Invalid LICENSE file: {mismatch}"));
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            report.errors.push("Missing LICENSE file".to_string());
        }
        Err(e) => {
            report.errors.push(format!("Invalid LICENSE file: {e}"));
        }
    }

    let listing = list_files(root, options.exclude.as_slice())?;
    for err in &listing.errors {
        report.errors.push(format!("Unreadable path: {err}"));
    }

    for file in listing.files.iter().filter(|f| is_header_candidate(f)) {
        let path = file.relative_path.display();

        let text = match FileContent::read(&file.path) {
            Ok(FileContent::Text(text)) => text,
            Ok(FileContent::Opaque) => {
                debug!("Skipping binary file {path}");
                continue;
            }
            Err(e) => {
                report.errors.push(format!("Unreadable file: {path}: {e}"));
                continue;
            }
        };

        report.files_checked += 1;

        if let Verdict::Invalid(mismatch) = check_header(&text, &header_matcher) {
            report
                .errors
                .push(format!("Invalid header: {path}: {mismatch}"));
        }

        if file.relative_path.file_name() == Some(OsStr::new(DESCRIPTOR_NAME)) {
            for violation in check_descriptor(&text, options.install_requires_check) {
                report.errors.push(format!("{path}: {violation}"));
            }
        }
    }

    info!("Checked headers of {} files", report.files_checked);

    if options.build_assets {
        for package in find_packages(&listing.files) {
            info!("Building assets in {}", package.relative_path.display());
            let outcome = builder.build_and_check(&package.path);
            report.packages_built += 1;
            if let Some(message) = outcome_message(&package, &outcome) {
                report.errors.push(message);
            }
        }
    }

    Ok(report)
}

fn is_header_candidate(file: &FileEntry) -> bool {
    let relative = &file.relative_path;

    if relative.extension() != Some(OsStr::new("py")) {
        return false;
    }
    if relative.starts_with(BUILD_DIR) {
        return false;
    }
    match relative.file_name().and_then(OsStr::to_str) {
        Some(name) => !UNCHECKED_FILENAMES.contains(&name),
        None => false,
    }
}
