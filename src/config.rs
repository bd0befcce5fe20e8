//! Configuration schema for amdsense.
//!
//! A configuration file describes the workspace layout: how module paths map
//! to directories, how the module declaration call is spelled, and which file
//! names identify helpers and stores.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::extract::ModuleDeclaration;

/// Default config file names searched in the workspace root.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["amdsense.yaml", ".amdsense.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub version: String,
    /// Shape of the module declaration call (default: `sap.ui.define`)
    #[serde(default)]
    pub module_declaration: ModuleDeclaration,
    /// Module path prefix to directory (relative to the workspace root)
    #[serde(default)]
    pub resource_roots: BTreeMap<String, String>,
    #[serde(default)]
    pub word_roles: WordRolesConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub visibility: VisibilityConfig,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Locate a config file for a workspace.
    ///
    /// Looks in the workspace root first, then in the per-user config directory.
    pub fn discover<P: AsRef<Path>>(workspace_root: P) -> Option<PathBuf> {
        let root = workspace_root.as_ref();
        let local = DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file());
        if local.is_some() {
            return local;
        }

        directories::ProjectDirs::from("", "", "amdsense")
            .map(|dirs| dirs.config_dir().join(DEFAULT_CONFIG_NAMES[0]))
            .filter(|path| path.is_file())
    }

    /// Load the explicit config, or a discovered one, or the defaults.
    pub fn load(explicit: Option<&Path>, workspace_root: &Path) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => Self::discover(workspace_root),
        };

        let config = match &path {
            Some(p) => Self::parse_file(p)
                .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e))?,
            None => Self::default(),
        };
        validate(&config)?;
        Ok((config, path))
    }
}

/// Suffixes that give a word its role.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordRolesConfig {
    #[serde(default = "default_store_suffix")]
    pub store_suffix: String,
    #[serde(default = "default_helper_suffix")]
    pub helper_suffix: String,
}

fn default_store_suffix() -> String {
    "Store".to_string()
}

fn default_helper_suffix() -> String {
    "Helper".to_string()
}

impl Default for WordRolesConfig {
    fn default() -> Self {
        Self {
            store_suffix: default_store_suffix(),
            helper_suffix: default_helper_suffix(),
        }
    }
}

/// Workspace scan for helper and store files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    #[serde(default = "default_helper_glob")]
    pub helper_glob: String,
    #[serde(default = "default_store_glob")]
    pub store_glob: String,
    /// Glob patterns for paths to skip (e.g., "**/node_modules/**")
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
    /// Maximum files kept per role (default: 1000)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

fn default_helper_glob() -> String {
    "**/*[hH]elper.js".to_string()
}

fn default_store_glob() -> String {
    "**/*[sS]tore.js".to_string()
}

fn default_excluded_paths() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_max_files() -> usize {
    1000
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            helper_glob: default_helper_glob(),
            store_glob: default_store_glob(),
            excluded_paths: default_excluded_paths(),
            max_files: default_max_files(),
        }
    }
}

/// Member visibility settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct VisibilityConfig {
    /// Member names never offered, in addition to the lifecycle hooks
    #[serde(default)]
    pub ignored_members: Vec<String>,
}

/// Validate a config for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    let declaration = &config.module_declaration;
    for (field, value) in [
        ("namespace", &declaration.namespace),
        ("member", &declaration.member),
        ("method", &declaration.method),
    ] {
        if value.trim().is_empty() {
            anyhow::bail!("module_declaration.{} must not be empty", field);
        }
    }

    if config.word_roles.store_suffix.is_empty() || config.word_roles.helper_suffix.is_empty() {
        anyhow::bail!("word role suffixes must not be empty");
    }
    if config.word_roles.store_suffix == config.word_roles.helper_suffix {
        anyhow::bail!(
            "store and helper suffixes must differ (both {:?})",
            config.word_roles.store_suffix
        );
    }

    for pattern in [&config.discovery.helper_glob, &config.discovery.store_glob]
        .into_iter()
        .chain(&config.discovery.excluded_paths)
    {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid discovery pattern {:?}: {}", pattern, e))?;
    }

    if config.discovery.max_files == 0 {
        anyhow::bail!("discovery.max_files must be at least 1");
    }

    Ok(())
}
