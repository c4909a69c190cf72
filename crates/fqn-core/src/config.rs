//! Configuration: rewrite policy, resolution inputs, workspace filters.
//!
//! Values are layered from several sources and every resolved value records
//! where it came from.
//!
//! Precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (`FQN_SCOPE`, `FQN_RENAME_ALIASED`)
//! 3. Project config (`<workspace>/.fqn/config.toml`)
//! 4. Defaults
//!
//! ```toml
//! [rewrite]
//! scope = "namespace"
//! rename_aliased = false
//!
//! [resolve]
//! reference_namespaces = ["System", "System.Linq"]
//!
//! [workspace]
//! exclude = ["**/bin/**", "**/obj/**"]
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::workspace::WorkspaceConfig;

// ============================================================================
// Constants
// ============================================================================

/// Directory holding fqn's project configuration.
pub const CONFIG_DIR: &str = ".fqn";

/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Namespaces from referenced assemblies that resolve without a declaration
/// in the project sources.
pub const DEFAULT_REFERENCE_NAMESPACES: &[&str] = &[
    "System",
    "System.Collections",
    "System.Collections.Concurrent",
    "System.Collections.Generic",
    "System.ComponentModel",
    "System.Diagnostics",
    "System.Globalization",
    "System.IO",
    "System.Linq",
    "System.Net",
    "System.Net.Http",
    "System.Reflection",
    "System.Runtime.CompilerServices",
    "System.Text",
    "System.Text.Json",
    "System.Text.RegularExpressions",
    "System.Threading",
    "System.Threading.Tasks",
];

/// Paths never loaded into a solution.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/bin/**", "**/obj/**", "**/.git/**", "**/.fqn/**"];

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A value from the environment or the CLI is not recognised.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

// ============================================================================
// Policies and Options
// ============================================================================

/// Which directives a whole-file rewrite classifies, removes, and re-inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScopePolicy {
    /// Only directives owned by namespace declarations. Compilation-unit
    /// directives stay where they are, and a file without a namespace
    /// declaration is left unchanged.
    #[default]
    Namespace,
    /// Every directive in the file. The canonical block is written into each
    /// outermost namespace, or into the compilation unit when there is none.
    File,
}

impl ScopePolicy {
    /// Parse a policy name as written in config files and flags.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "namespace" => Some(ScopePolicy::Namespace),
            "file" => Some(ScopePolicy::File),
            _ => None,
        }
    }
}

impl fmt::Display for ScopePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopePolicy::Namespace => write!(f, "namespace"),
            ScopePolicy::File => write!(f, "file"),
        }
    }
}

/// Options consumed by the rewrite pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewriteOptions {
    /// Scope policy for whole-file rewrites.
    pub scope: ScopePolicy,
    /// Also rename the target path of aliased directives.
    pub rename_aliased: bool,
}

// ============================================================================
// Config File Schema
// ============================================================================

/// Contents of `.fqn/config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub rewrite: RewriteSection,
    pub resolve: ResolveSection,
    pub workspace: WorkspaceSection,
}

/// `[rewrite]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RewriteSection {
    pub scope: Option<ScopePolicy>,
    pub rename_aliased: Option<bool>,
}

/// `[resolve]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolveSection {
    pub reference_namespaces: Option<Vec<String>>,
}

/// `[workspace]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceSection {
    pub exclude: Option<Vec<String>>,
}

impl FileConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `.fqn/config.toml` under the workspace root, if present.
    pub fn load_from_workspace(workspace_root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = workspace_root.join(CONFIG_DIR).join(CONFIG_FILE);
        if path.exists() {
            Self::load(&path).map(Some)
        } else {
            Ok(None)
        }
    }
}

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From `.fqn/config.toml`.
    ProjectConfig = 1,
    /// From environment variable.
    EnvVar = 2,
    /// From CLI flag (highest precedence).
    CliFlag = 3,
}

/// A configuration value with its source.
#[derive(Debug, Clone)]
pub struct ConfigValue<T> {
    /// The actual value.
    pub value: T,
    /// Where the value came from.
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    /// Create a new config value with the given source.
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub scope: Option<ScopePolicy>,
    pub rename_aliased: Option<bool>,
    /// Extra reference namespaces, added to the resolved list.
    pub reference_namespaces: Vec<String>,
    /// Extra exclude globs, added to the resolved list.
    pub exclude: Vec<String>,
}

// ============================================================================
// Configuration Resolution
// ============================================================================

/// Resolved configuration with precedence information.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub scope: ConfigValue<ScopePolicy>,
    pub rename_aliased: ConfigValue<bool>,
    pub reference_namespaces: ConfigValue<Vec<String>>,
    pub exclude: ConfigValue<Vec<String>>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            scope: ConfigValue::new(ScopePolicy::default(), ConfigSource::Default),
            rename_aliased: ConfigValue::new(false, ConfigSource::Default),
            reference_namespaces: ConfigValue::new(
                DEFAULT_REFERENCE_NAMESPACES
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                ConfigSource::Default,
            ),
            exclude: ConfigValue::new(
                DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
                ConfigSource::Default,
            ),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from all sources using the process environment.
    pub fn resolve(workspace_root: &Path, cli: &CliOverrides) -> Result<Self, ConfigError> {
        Self::resolve_with_env(workspace_root, cli, |key| std::env::var(key).ok())
    }

    /// Resolve configuration with an explicit environment lookup.
    pub fn resolve_with_env(
        workspace_root: &Path,
        cli: &CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = ResolvedConfig::default();

        if let Some(file) = FileConfig::load_from_workspace(workspace_root)? {
            config.apply_file_config(file);
        }
        config.apply_env_vars(env)?;
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn apply_file_config(&mut self, file: FileConfig) {
        let source = ConfigSource::ProjectConfig;
        if let Some(scope) = file.rewrite.scope {
            self.scope = self.scope.clone().merge(ConfigValue::new(scope, source));
        }
        if let Some(rename) = file.rewrite.rename_aliased {
            self.rename_aliased = self
                .rename_aliased
                .clone()
                .merge(ConfigValue::new(rename, source));
        }
        if let Some(namespaces) = file.resolve.reference_namespaces {
            self.reference_namespaces = self
                .reference_namespaces
                .clone()
                .merge(ConfigValue::new(namespaces, source));
        }
        if let Some(exclude) = file.workspace.exclude {
            self.exclude = self.exclude.clone().merge(ConfigValue::new(exclude, source));
        }
    }

    fn apply_env_vars(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(raw) = env("FQN_SCOPE") {
            let scope = ScopePolicy::parse(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "FQN_SCOPE".to_string(),
                value: raw.clone(),
            })?;
            self.scope = self
                .scope
                .clone()
                .merge(ConfigValue::new(scope, ConfigSource::EnvVar));
        }

        if let Some(raw) = env("FQN_RENAME_ALIASED") {
            let rename = parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "FQN_RENAME_ALIASED".to_string(),
                value: raw.clone(),
            })?;
            self.rename_aliased = self
                .rename_aliased
                .clone()
                .merge(ConfigValue::new(rename, ConfigSource::EnvVar));
        }

        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        let source = ConfigSource::CliFlag;
        if let Some(scope) = cli.scope {
            self.scope = self.scope.clone().merge(ConfigValue::new(scope, source));
        }
        if let Some(rename) = cli.rename_aliased {
            self.rename_aliased = self
                .rename_aliased
                .clone()
                .merge(ConfigValue::new(rename, source));
        }
        if !cli.reference_namespaces.is_empty() {
            let mut namespaces = self.reference_namespaces.value.clone();
            for ns in &cli.reference_namespaces {
                if !namespaces.contains(ns) {
                    namespaces.push(ns.clone());
                }
            }
            self.reference_namespaces = ConfigValue::new(namespaces, source);
        }
        if !cli.exclude.is_empty() {
            let mut exclude = self.exclude.value.clone();
            exclude.extend(cli.exclude.iter().cloned());
            self.exclude = ConfigValue::new(exclude, source);
        }
    }

    /// Options for the rewrite pipeline.
    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            scope: self.scope.value,
            rename_aliased: self.rename_aliased.value,
        }
    }

    /// Filters for loading a solution from disk.
    pub fn workspace_config(&self) -> WorkspaceConfig {
        WorkspaceConfig {
            exclude: self.exclude.value.clone(),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
