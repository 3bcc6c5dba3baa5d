//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.compile_reports.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".compile_reports.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report filename convention.
    #[serde(default)]
    pub naming: NamingConfig,

    /// Output document settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Tokens framing the bundle name in `<subject>__<bundle>_report.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Text preceding the bundle name.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Text following the bundle name, before the extension.
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            suffix: default_suffix(),
        }
    }
}

fn default_separator() -> String {
    "__".to_string()
}

fn default_suffix() -> String {
    "_report".to_string()
}

/// Output document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spaces per indentation level in the compiled JSON.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_indent() -> usize {
    4
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default(default_path: &Path) -> Result<Option<Self>> {
        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref separator) = args.separator {
            self.naming.separator = separator.clone();
        }
        if let Some(ref suffix) = args.suffix {
            self.naming.suffix = suffix.clone();
        }

        if let Some(indent) = args.indent {
            self.output.indent = indent;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.naming.separator, "__");
        assert_eq!(config.naming.suffix, "_report");
        assert_eq!(config.output.indent, 4);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[naming]
separator = "--"

[output]
indent = 2
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.naming.separator, "--");
        assert_eq!(config.naming.suffix, "_report");
        assert_eq!(config.output.indent, 2);
    }

    #[test]
    fn test_merge_only_explicit_args() {
        let mut config: Config = toml::from_str("[output]\nindent = 2\n").unwrap();
        let args = Args::parse_from([
            "compile_reports",
            "--results",
            "results.json",
            "--cleaning_reports",
            "s1__AF_L_report.json",
            "--out_report",
            "out.json",
            "--suffix",
            "_clean",
        ]);

        config.merge_with_args(&args);

        assert_eq!(config.output.indent, 2);
        assert_eq!(config.naming.separator, "__");
        assert_eq!(config.naming.suffix, "_clean");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[naming]\nsuffix = \"_inliers\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.naming.suffix, "_inliers");
    }

    #[test]
    fn test_load_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_default(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[output]\nindent = \"four\"\n").unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[naming]"));
        assert!(toml_str.contains("[output]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.output.indent, 4);
    }
}
