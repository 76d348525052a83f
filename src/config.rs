//! Configuration for osprey.
//!
//! A configuration names where controllers live, which directories to skip
//! and the annotation conventions of the analyzed framework.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File names searched for in the working directory, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["osprey.yaml", ".osprey.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Glob patterns selecting controller files, relative to the workspace root.
    #[serde(default = "default_controller_globs")]
    pub controller_globs: Vec<String>,
    /// Directory names never descended into during discovery.
    #[serde(default = "default_excluded_dirs")]
    pub excluded_dirs: Vec<String>,
    /// Roots for non-relative module specifiers (tsconfig `baseUrl` style).
    #[serde(default)]
    pub module_roots: Vec<PathBuf>,
    /// Files processed between cooperative yields during discovery.
    #[serde(default = "default_batch_size")]
    pub discovery_batch_size: usize,
    /// Deepest nesting level the payload synthesizer expands.
    #[serde(default = "default_max_depth")]
    pub payload_max_depth: usize,
    #[serde(default)]
    pub conventions: Conventions,
}

/// Annotation and naming conventions of the analyzed framework.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Conventions {
    /// Class annotation marking a request group.
    pub group_annotation: String,
    /// Class-name suffix used when no class carries the group annotation.
    pub group_suffix: String,
    pub body_annotation: String,
    pub path_param_annotation: String,
    pub query_param_annotation: String,
    /// Class annotation marking a storage entity.
    pub entity_annotation: String,
    /// Path fragment identifying storage-entity files.
    pub entity_file_marker: String,
    /// Path segment of the third-party dependency store.
    pub dependency_store: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            group_annotation: "Controller".to_string(),
            group_suffix: "Controller".to_string(),
            body_annotation: "Body".to_string(),
            path_param_annotation: "Param".to_string(),
            query_param_annotation: "Query".to_string(),
            entity_annotation: "Entity".to_string(),
            entity_file_marker: ".entity.".to_string(),
            dependency_store: "node_modules".to_string(),
        }
    }
}

fn default_controller_globs() -> Vec<String> {
    vec!["**/*.controller.ts".to_string()]
}

fn default_excluded_dirs() -> Vec<String> {
    vec!["node_modules".to_string(), "dist".to_string()]
}

fn default_batch_size() -> usize {
    5
}

fn default_max_depth() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            controller_globs: default_controller_globs(),
            excluded_dirs: default_excluded_dirs(),
            module_roots: Vec::new(),
            discovery_batch_size: default_batch_size(),
            payload_max_depth: default_max_depth(),
            conventions: Conventions::default(),
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    ///
    /// Relative module roots are anchored at the file's directory.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        if let Some(dir) = path.parent() {
            config.anchor_module_roots(dir);
        }
        Ok(config)
    }

    /// Make relative module roots absolute against `base`.
    pub fn anchor_module_roots(&mut self, base: &Path) {
        for root in &mut self.module_roots {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
    }

    /// Whether a directory name is skipped during discovery.
    pub fn is_dir_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|d| d == name)
    }
}

/// Path of the per-user configuration file, if the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "osprey", "osprey")
        .map(|dirs| dirs.config_dir().join("osprey.yaml"))
}

/// Locate a configuration file for `dir`.
///
/// Looks in `dir` first, then the user configuration directory.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
        .or_else(|| user_config_path().filter(|p| p.is_file()))
}

/// Validate a configuration for correctness.
pub fn validate(config: &Config) -> anyhow::Result<()> {
    if config.controller_globs.is_empty() {
        anyhow::bail!("controller_globs must name at least one pattern");
    }

    for pattern in &config.controller_globs {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid controller glob {:?}: {}", pattern, e))?;
    }

    if config.discovery_batch_size == 0 {
        anyhow::bail!("discovery_batch_size must be at least 1");
    }

    if config.payload_max_depth > 16 {
        anyhow::bail!(
            "payload_max_depth {} is too deep (maximum 16)",
            config.payload_max_depth
        );
    }

    let c = &config.conventions;
    for (field, value) in [
        ("group_annotation", &c.group_annotation),
        ("group_suffix", &c.group_suffix),
        ("body_annotation", &c.body_annotation),
        ("path_param_annotation", &c.path_param_annotation),
        ("query_param_annotation", &c.query_param_annotation),
        ("entity_annotation", &c.entity_annotation),
        ("entity_file_marker", &c.entity_file_marker),
        ("dependency_store", &c.dependency_store),
    ] {
        if value.trim().is_empty() {
            anyhow::bail!("conventions.{} must not be empty", field);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.controller_globs, vec!["**/*.controller.ts"]);
        assert!(config.is_dir_excluded("node_modules"));
        assert!(config.is_dir_excluded("dist"));
        assert!(!config.is_dir_excluded("src"));
        assert_eq!(config.discovery_batch_size, 5);
        assert_eq!(config.payload_max_depth, 3);
        assert_eq!(config.conventions.entity_file_marker, ".entity.");
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str(
            "discovery_batch_size: 10\nconventions:\n  group_annotation: Resource\n",
        )
        .unwrap();
        assert_eq!(config.discovery_batch_size, 10);
        assert_eq!(config.conventions.group_annotation, "Resource");
        assert_eq!(config.conventions.body_annotation, "Body");
        assert_eq!(config.payload_max_depth, 3);
    }

    #[test]
    fn test_parse_file_anchors_module_roots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osprey.yaml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "module_roots:\n  - src\n  - /abs/lib").unwrap();

        let config = Config::parse_file(&path).unwrap();
        assert_eq!(config.module_roots[0], dir.path().join("src"));
        assert_eq!(config.module_roots[1], PathBuf::from("/abs/lib"));
    }

    #[test]
    fn test_discover_prefers_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".osprey.yaml"), "{}").unwrap();
        assert_eq!(discover(dir.path()), Some(dir.path().join(".osprey.yaml")));

        fs::write(dir.path().join("osprey.yaml"), "{}").unwrap();
        assert_eq!(discover(dir.path()), Some(dir.path().join("osprey.yaml")));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.controller_globs = vec!["src/[".to_string()];
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.discovery_batch_size = 0;
        assert!(validate(&config).is_err());

        let mut config = Config::default();
        config.conventions.body_annotation = " ".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_naming_markers() {
        let mut config = Config::default();
        config.conventions.group_suffix = String::new();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("group_suffix"));

        let mut config = Config::default();
        config.conventions.entity_file_marker = " ".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("entity_file_marker"));
    }
}
