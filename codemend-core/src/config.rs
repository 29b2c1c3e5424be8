//! Configuration management for `codemend-core`.
//!
//! Every exclusion list and every piece of text the passes insert lives here
//! rather than inside rule bodies. The built-in defaults are embedded from
//! `config/default_config.yaml`; a user YAML file of the same shape is merged
//! over them with [`merge_config`].
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::MendError;

/// Name of the project-local configuration file picked up by discovery.
pub const LOCAL_CONFIG_FILE: &str = "codemend.yaml";

/// Settings for the recursive tree selector.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Root directory to scan. `None` means the current directory.
    pub root: Option<PathBuf>,
    /// File extensions (without the dot) considered text sources.
    pub extensions: Vec<String>,
    /// Directory names skipped wherever they occur in the tree.
    pub exclude_dirs: Vec<String>,
}

/// Settings for the debug-log normalization pass.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct DebugLogConfig {
    /// Path suffixes never touched by this pass.
    pub exclude_files: Vec<String>,
    /// Import line inserted after the import block.
    pub logger_import: String,
    /// Field declaration inserted after the first class brace. `{class}` is
    /// replaced with the class name.
    pub logger_field: String,
    /// Characters marking a print as a decorative console banner.
    pub banner_markers: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct ErrorCastConfig {
    pub catch_variable: String,
    pub error_type: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct OptionalAccessConfig {
    /// Receiver roots assumed to always be defined (`this`, `console`).
    pub always_defined: Vec<String>,
    /// Namespaces whose method calls are never guarded.
    pub builtin_namespaces: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Explicit file list for the corrective pass. Empty falls back to the tree.
    pub targets: Vec<PathBuf>,
}

/// Top-level configuration structure for codemend.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct MendConfig {
    pub selector: SelectorConfig,
    pub debug_log: DebugLogConfig,
    pub error_cast: ErrorCastConfig,
    pub optional_access: OptionalAccessConfig,
    pub repair: RepairConfig,
}

impl MendConfig {
    /// Loads the embedded default configuration.
    pub fn load_default() -> Result<Self> {
        debug!("Loading default configuration from embedded string...");
        let default_yaml = include_str!("../config/default_config.yaml");
        let config: MendConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default configuration")?;
        Ok(config)
    }

    /// Loads a user configuration file. The result is partial; merge it over
    /// the defaults before use.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: MendConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Builds the effective configuration: defaults, then the explicit file if
    /// given, otherwise the first discovered candidate file.
    pub fn load_effective(explicit: Option<&Path>) -> Result<Self> {
        let defaults = Self::load_default()?;
        let user = match explicit {
            Some(path) => Some(Self::load_from_file(path)?),
            None => match config_candidate_paths().into_iter().find(|p| p.is_file()) {
                Some(found) => Some(Self::load_from_file(&found)?),
                None => None,
            },
        };
        let merged = merge_config(defaults, user);
        merged.validate()?;
        Ok(merged)
    }

    /// Root the tree selector scans.
    pub fn root(&self) -> PathBuf {
        self.selector.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Checks that the merged configuration can drive every pass.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.selector.extensions.is_empty() {
            errors.push("`selector.extensions` must list at least one extension.".to_string());
        }
        if self.selector.extensions.iter().any(|e| e.starts_with('.')) {
            errors.push("`selector.extensions` entries must not start with a dot.".to_string());
        }
        if self.debug_log.logger_import.trim().is_empty() {
            errors.push("`debug_log.logger_import` is empty.".to_string());
        }
        if !self.debug_log.logger_field.contains("logger") {
            errors.push("`debug_log.logger_field` must declare a `logger` field.".to_string());
        }
        if self.error_cast.catch_variable.is_empty()
            || !self
                .error_cast
                .catch_variable
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        {
            errors.push(format!(
                "`error_cast.catch_variable` '{}' is not an identifier.",
                self.error_cast.catch_variable
            ));
        }
        if self.error_cast.error_type.trim().is_empty() {
            errors.push("`error_cast.error_type` is empty.".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(MendError::Config(format!("Configuration validation failed:\n{}", errors.join("\n"))).into())
        }
    }
}

/// Candidate locations for a configuration file, most specific first.
pub fn config_candidate_paths() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("codemend").join("config.yaml"));
    }
    candidates
}

fn pick<T>(default: T, user: T, is_set: impl Fn(&T) -> bool) -> T {
    if is_set(&user) {
        user
    } else {
        default
    }
}

/// Merges a user configuration over the defaults. A user value wins whenever
/// it is present and non-empty.
pub fn merge_config(default_config: MendConfig, user_config: Option<MendConfig>) -> MendConfig {
    let Some(user) = user_config else {
        debug!("No user configuration supplied; using defaults.");
        return default_config;
    };
    debug!("Merging user configuration over defaults.");

    let non_empty_vec = |v: &Vec<String>| !v.is_empty();
    let non_empty_str = |s: &String| !s.trim().is_empty();

    MendConfig {
        selector: SelectorConfig {
            root: user.selector.root.or(default_config.selector.root),
            extensions: pick(
                default_config.selector.extensions,
                user.selector.extensions,
                non_empty_vec,
            ),
            exclude_dirs: pick(
                default_config.selector.exclude_dirs,
                user.selector.exclude_dirs,
                non_empty_vec,
            ),
        },
        debug_log: DebugLogConfig {
            exclude_files: pick(
                default_config.debug_log.exclude_files,
                user.debug_log.exclude_files,
                non_empty_vec,
            ),
            logger_import: pick(
                default_config.debug_log.logger_import,
                user.debug_log.logger_import,
                non_empty_str,
            ),
            logger_field: pick(
                default_config.debug_log.logger_field,
                user.debug_log.logger_field,
                non_empty_str,
            ),
            banner_markers: pick(
                default_config.debug_log.banner_markers,
                user.debug_log.banner_markers,
                non_empty_vec,
            ),
        },
        error_cast: ErrorCastConfig {
            catch_variable: pick(
                default_config.error_cast.catch_variable,
                user.error_cast.catch_variable,
                non_empty_str,
            ),
            error_type: pick(
                default_config.error_cast.error_type,
                user.error_cast.error_type,
                non_empty_str,
            ),
        },
        optional_access: OptionalAccessConfig {
            always_defined: pick(
                default_config.optional_access.always_defined,
                user.optional_access.always_defined,
                non_empty_vec,
            ),
            builtin_namespaces: pick(
                default_config.optional_access.builtin_namespaces,
                user.optional_access.builtin_namespaces,
                non_empty_vec,
            ),
        },
        repair: RepairConfig {
            targets: if user.repair.targets.is_empty() {
                default_config.repair.targets
            } else {
                user.repair.targets
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MendConfig::load_default().unwrap();
        config.validate().unwrap();
        assert_eq!(config.selector.extensions, vec!["ts", "tsx"]);
        assert!(config.optional_access.builtin_namespaces.iter().any(|n| n == "Math"));
        assert_eq!(config.error_cast.catch_variable, "error");
    }

    #[test]
    fn user_values_override_only_what_they_set() {
        let defaults = MendConfig::load_default().unwrap();
        let user = MendConfig {
            selector: SelectorConfig {
                extensions: vec!["js".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let merged = merge_config(defaults.clone(), Some(user));
        assert_eq!(merged.selector.extensions, vec!["js"]);
        assert_eq!(merged.selector.exclude_dirs, defaults.selector.exclude_dirs);
        assert_eq!(merged.debug_log.logger_import, defaults.debug_log.logger_import);
    }

    #[test]
    fn validation_rejects_dotted_extensions() {
        let mut config = MendConfig::load_default().unwrap();
        config.selector.extensions = vec![".ts".to_string()];
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("must not start with a dot"));
    }
}
