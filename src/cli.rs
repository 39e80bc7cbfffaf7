mod help_text;

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// License and copyright header checker for QIIME 2 source trees
#[derive(Parser, Debug)]
#[command(
    name = "q2lint",
    version,
    about,
    long_about = help_text::ROOT_LONG_ABOUT
)]
pub struct Cli {
    /// Run as if started in DIRECTORY instead of the current directory
    #[arg(short = 'C', value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Do not report a non-empty `install_requires` in setup.py
    #[arg(long)]
    pub disable_install_requires_check: bool,

    /// Exact copyright years expected in LICENSE and headers (e.g. 2016-2024)
    ///
    /// Without this, any range ending in the current year is accepted.
    #[arg(long, value_name = "RANGE")]
    pub license_date: Option<String>,

    /// Bump copyright notices in the tree to the current year before checking
    #[arg(long)]
    pub update_copyright_year: bool,

    /// With --update-copyright-year, report files that would change without writing
    #[arg(long, requires = "update_copyright_year")]
    pub dry_run: bool,

    /// Do not rebuild and diff bundled web assets
    #[arg(long)]
    pub skip_asset_build: bool,

    /// Increase log verbosity (-v for info, -vv for debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "log_level")]
    pub verbose: u8,

    /// Set the log level explicitly. Takes precedence over RUST_LOG.
    #[arg(long, value_name = "LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dry_run_requires_update_copyright_year() {
        let result = Cli::try_parse_from(["q2lint", "--dry-run"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from(["q2lint", "--update-copyright-year", "--dry-run"]).unwrap();
        assert!(cli.dry_run);
        assert!(cli.update_copyright_year);
    }

    #[test]
    fn verbose_is_counted() {
        let cli = Cli::try_parse_from(["q2lint", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_level, None);
    }

    #[test]
    fn log_level_parses() {
        let cli = Cli::try_parse_from(["q2lint", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(LogLevel::Debug.as_filter(), "debug");
    }
}
