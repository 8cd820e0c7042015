//! Configuration module for qbdoc
//!
//! This module provides configuration structures and loading mechanisms.
//! Configuration can be loaded from TOML files and/or environment variables.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use crate::feature::FeatureKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.qbdoc/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".qbdoc").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Query parameter key names, one per capability
    #[serde(default)]
    pub parameters: ParameterKeys,

    /// Documentation comment annotations
    #[serde(default)]
    pub annotations: AnnotationsConfig,

    /// Parameter synthesis behaviour
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// PSR-4 roots used to locate controller classes on disk
    #[serde(default)]
    pub autoload: Vec<AutoloadRoot>,
}

/// Query parameter keys (`query-builder.parameters.*` in a Laravel app)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterKeys {
    #[serde(default = "default_include_key")]
    pub include: String,

    #[serde(default = "default_filter_key")]
    pub filter: String,

    #[serde(default = "default_sort_key")]
    pub sort: String,

    #[serde(default = "default_fields_key")]
    pub fields: String,
}

impl ParameterKeys {
    /// The configured key for a capability
    pub fn key_for(&self, kind: FeatureKind) -> &str {
        match kind {
            FeatureKind::Include => &self.include,
            FeatureKind::Filter => &self.filter,
            FeatureKind::Sort => &self.sort,
            FeatureKind::Field => &self.fields,
        }
    }
}

impl Default for ParameterKeys {
    fn default() -> Self {
        Self {
            include: default_include_key(),
            filter: default_filter_key(),
            sort: default_sort_key(),
            fields: default_fields_key(),
        }
    }
}

/// Configuration for documentation comment overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationsConfig {
    /// Tag carrying per-parameter overrides
    #[serde(default = "default_annotation_tag")]
    pub tag: String,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            tag: default_annotation_tag(),
        }
    }
}

/// Configuration for parameter synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Emit a parameter for values the inference engine could not resolve
    #[serde(default = "default_emit_unsupported")]
    pub emit_unsupported: bool,

    /// Randomise the order of include examples
    #[serde(default = "default_true")]
    pub shuffle_includes: bool,

    /// Seed for generated examples; entropy-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            emit_unsupported: default_emit_unsupported(),
            shuffle_includes: default_true(),
            seed: None,
        }
    }
}

/// A PSR-4 namespace prefix mapped onto a source directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoloadRoot {
    /// Namespace prefix, e.g. `App\`
    pub prefix: String,

    /// Directory holding the classes under that prefix
    pub path: PathBuf,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        for kind in FeatureKind::ALL {
            if self.parameters.key_for(kind).trim().is_empty() {
                return Err(Error::config(format!(
                    "Query parameter key for {kind} must not be empty"
                )));
            }
        }

        if !self.annotations.tag.starts_with('@') || self.annotations.tag.len() < 2 {
            return Err(Error::config(format!(
                "Invalid annotation tag '{}'. Must start with '@'",
                self.annotations.tag
            )));
        }

        if let Some(root) = self.autoload.iter().find(|r| r.prefix.trim().is_empty()) {
            return Err(Error::config(format!(
                "Autoload root {} has an empty namespace prefix",
                root.path.display()
            )));
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::serialization(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string).map_err(|e| Error::io(path.display().to_string(), e))?;

        Ok(())
    }
}
