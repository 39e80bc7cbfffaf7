//! Optional per-tree settings read from `.q2lint.toml`.
//!
//! Every key is optional. Command line flags take precedence over values
//! from the file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".q2lint.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(std::io::Error),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("TOML parse error in {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LintConfig {
    /// Whether a non-empty `install_requires` in setup.py is an error.
    pub install_requires_check: Option<bool>,
    /// Exact year text expected in place of the tolerant year range.
    pub license_date: Option<String>,
    pub skip_asset_build: Option<bool>,
    /// Glob patterns, relative to the tree root, left out of the scan.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl LintConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file from `root`, or defaults when there is none.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(CONFIG_FILENAME);

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(ConfigError::PermissionDenied(path));
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::from_toml(&content, &path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();

        let config = LintConfig::load(temp.path()).unwrap();

        assert_eq!(config, LintConfig::default());
    }

    #[test]
    fn test_parse_all_keys() {
        let content = r#"
install_requires_check = false
license_date = "2016-2024"
skip_asset_build = true
exclude = ["docs", "vendor/*"]
"#;

        let config = LintConfig::from_toml(content, Path::new(CONFIG_FILENAME)).unwrap();

        assert_eq!(config.install_requires_check, Some(false));
        assert_eq!(config.license_date.as_deref(), Some("2016-2024"));
        assert_eq!(config.skip_asset_build, Some(true));
        assert_eq!(config.exclude, vec!["docs", "vendor/*"]);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = LintConfig::from_toml("colour = \"red\"\n", Path::new(CONFIG_FILENAME));

        assert!(matches!(result, Err(ConfigError::TomlParse { .. })));
    }

    #[test]
    fn test_load_from_tree() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "skip_asset_build = true\n",
        )
        .unwrap();

        let config = LintConfig::load(temp.path()).unwrap();

        assert_eq!(config.skip_asset_build, Some(true));
        assert!(config.exclude.is_empty());
    }
}
