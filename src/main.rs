mod assets;
mod cli;
mod config;
mod descriptor;
mod header;
mod lint;
mod template;
mod tree;
mod util;
mod year_bump;

use assets::NpmBuilder;
use cli::{Cli, LogLevel};
use config::LintConfig;
use lint::{LintOptions, Report, lint_tree};
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::path::PathBuf;
use std::process::ExitCode;
use template::YearPolicy;
use tracing::{Event, Level, Subscriber, error, info};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;
use util::clock;
use year_bump::{RewriteOptions, bump_copyright_years};

struct LintExitCode;

impl LintExitCode {
    /// Exit code used when one or more checks failed.
    fn checks_failed() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used when the checks could not run (I/O errors, bad config, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    // Change working directory if -C was specified
    if let Some(directory) = &cli.directory
        && let Err(e) = std::env::set_current_dir(directory)
    {
        error!(
            "Failed to change directory to {}: {}",
            directory.display(),
            e
        );
        return LintExitCode::any_error();
    }

    match run(&cli, PathBuf::from(".")) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            error!("{err}");
            LintExitCode::any_error()
        }
    }
}

fn lint_options(cli: &Cli, config: LintConfig, current_year: i32) -> LintOptions {
    let year_policy = match cli.license_date.clone().or(config.license_date) {
        Some(years) => YearPolicy::Exact(years),
        None => YearPolicy::Tolerant { current_year },
    };

    LintOptions {
        install_requires_check: !cli.disable_install_requires_check
            && config.install_requires_check.unwrap_or(true),
        year_policy,
        build_assets: !cli.skip_asset_build && !config.skip_asset_build.unwrap_or(false),
        exclude: config.exclude,
    }
}

fn run(cli: &Cli, root: PathBuf) -> anyhow::Result<ExitCode> {
    let config = LintConfig::load(&root)?;
    let current_year = clock::current_year();

    let mut rewrite_errors = Vec::new();

    if cli.update_copyright_year {
        let result = bump_copyright_years(
            &root,
            current_year,
            RewriteOptions {
                dry_run: cli.dry_run,
            },
        )?;

        if cli.dry_run {
            info!("DRY RUN - no files were modified");
        }

        info!(
            "Updated copyright years in {} files",
            result.files_updated.len()
        );
        for path in &result.files_updated {
            info!("  {}", path.display());
        }

        rewrite_errors.extend(
            result
                .failures
                .iter()
                .map(|e| format!("Failed to update copyright years: {e}")),
        );
    }

    let options = lint_options(cli, config, current_year);
    let mut report = lint_tree(&root, &options, &NpmBuilder)?;
    if !rewrite_errors.is_empty() {
        rewrite_errors.append(&mut report.errors);
        report.errors = rewrite_errors;
    }

    if report.is_clean() {
        info!(
            "All checks passed ({} files, {} asset packages)",
            report.files_checked, report.packages_built
        );
        return Ok(ExitCode::SUCCESS);
    }

    print_report(&report);

    error!("{} check(s) failed", report.errors.len());
    Ok(LintExitCode::checks_failed())
}

fn print_report(report: &Report) {
    if stderr().is_terminal() {
        eprintln!("\n\x1b[91m{}\x1b[0m\n", report.render());
    } else {
        eprintln!("\n{}\n", report.render());
    }
}

fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = EmojiFormatter { stderr_is_terminal };

    // Explicit flags win over RUST_LOG; RUST_LOG wins over the default.
    let explicit_level = match (log_level, verbose) {
        (Some(level), _) => Some(level.as_filter()),
        (None, 0) => None,
        (None, 1) => Some("info"),
        (None, _) => Some("debug"),
    };

    let filter = match explicit_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct EmojiFormatter {
    stderr_is_terminal: bool,
}


impl<S, N> FormatEvent<S, N> for EmojiFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::DEBUG => write!(writer, "🔍 ")?,
                Level::INFO => write!(writer, "ℹ️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌️ ")?,
                _ => {}
            }
        } else {
            match *event.metadata().level() {
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => {}
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
