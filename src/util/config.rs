//! Configuration file support for ccvars.
//!
//! ccvars reads two configuration file locations:
//! - Global: `~/.ccvars/config.toml` - User-wide defaults
//! - Project: `<source root>/.ccvars/config.toml` - Source-tree specific settings
//!
//! Project config takes precedence over global config. A project file may
//! also point `[source] root` at the real top of the tree, relative to the
//! directory holding `.ccvars/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::configuration::TargetOs;

/// ccvars configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source tree settings
    pub source: SourceConfig,

    /// Default build target
    pub target: TargetConfig,

    /// Extra unsupported flags, keyed by compiler version
    pub unsupported: BTreeMap<String, UnsupportedFlagsConfig>,
}

/// Source tree settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Top of the source tree (defaults to the current directory)
    pub root: Option<PathBuf>,
}

/// Default build target settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target OS (android, fuchsia, linux, darwin, windows)
    pub os: Option<String>,
}

/// Flags one compiler version does not accept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnsupportedFlagsConfig {
    /// Compile flags removed by exact match
    pub cflags: Vec<String>,

    /// Compile flag prefixes; every flag starting with one is removed
    pub cflag_prefixes: Vec<String>,

    /// Link flags removed by exact match
    pub lldflags: Vec<String>,

    /// Link flag prefixes
    pub lldflag_prefixes: Vec<String>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Unsupported-flag sections for the same compiler version are unioned.
    pub fn merge(&mut self, other: Config) {
        if other.source.root.is_some() {
            self.source.root = other.source.root;
        }
        if other.target.os.is_some() {
            self.target.os = other.target.os;
        }

        for (version, section) in other.unsupported {
            let entry = self.unsupported.entry(version).or_default();
            entry.cflags.extend(section.cflags);
            entry.cflag_prefixes.extend(section.cflag_prefixes);
            entry.lldflags.extend(section.lldflags);
            entry.lldflag_prefixes.extend(section.lldflag_prefixes);
        }
    }

    /// Parse the configured target OS.
    pub fn target_os(&self) -> Result<Option<TargetOs>> {
        self.target
            .os
            .as_deref()
            .map(|s| s.parse::<TargetOs>().map_err(anyhow::Error::msg))
            .transpose()
            .context("invalid `target.os` in config")
    }
}

/// Get the global ccvars config directory (~/.ccvars).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".ccvars"))
}

/// Get the global config path (~/.ccvars/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.ccvars/config.toml).
pub fn project_config_path(source_root: &Path) -> PathBuf {
    source_root.join(".ccvars").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.source.root.is_none());
        assert!(config.target.os.is_none());
        assert!(config.unsupported.is_empty());
        assert_eq!(config.target_os().unwrap(), None);
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[source]
root = "/src/aosp"

[target]
os = "fuchsia"

[unsupported."clang-r365631"]
cflags = ["-Wno-extended-offsetof"]
cflag_prefixes = ["-finline-limit="]
lldflags = ["-Wl,--fix-cortex-a8"]
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.source.root, Some(PathBuf::from("/src/aosp")));
        assert_eq!(config.target_os().unwrap(), Some(TargetOs::Fuchsia));

        let section = &config.unsupported["clang-r365631"];
        assert_eq!(section.cflags, vec!["-Wno-extended-offsetof"]);
        assert_eq!(section.cflag_prefixes, vec!["-finline-limit="]);
        assert_eq!(section.lldflags, vec!["-Wl,--fix-cortex-a8"]);
        assert!(section.lldflag_prefixes.is_empty());
    }

    #[test]
    fn test_config_bad_target() {
        let mut config = Config::default();
        config.target.os = Some("plan9".to_string());
        assert!(config.target_os().is_err());
    }

    #[test]
    fn test_load_or_default_on_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[source\nroot = ").unwrap();

        let config = Config::load_or_default(&config_path);
        assert!(config.source.root.is_none());
    }

    #[test]
    fn test_merge_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[target]
os = "linux"

[unsupported."clang-r353983c"]
cflags = ["-fglobal-only"]
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[target]
os = "android"

[unsupported."clang-r353983c"]
cflags = ["-fproject-only"]
"#,
        )
        .unwrap();

        let mut config = Config::load(&global_path).unwrap();
        config.merge(Config::load(&project_path).unwrap());

        // Project target wins
        assert_eq!(config.target_os().unwrap(), Some(TargetOs::Android));
        // Unsupported flags from both files are kept
        assert_eq!(
            config.unsupported["clang-r353983c"].cflags,
            vec!["-fglobal-only", "-fproject-only"]
        );
    }
}
