//! Library interface for the qbdoc CLI
//!
//! This module exposes the command implementations for integration testing
//! while keeping argument parsing in main.rs.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{anyhow, Context, Result};
use qbdoc_core::config::Config;
use qbdoc_core::feature::{features, Feature};
use qbdoc_core::hooks::HookRegistry;
use qbdoc_core::openapi::Operation;
use qbdoc_core::route::RouteInfo;
use qbdoc_php::{load_file, Extension, MemoryLoader, Psr4Loader};
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Load and validate configuration
///
/// Without an explicit path the global config file is used; a missing
/// file falls back to defaults.
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load(config_path).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Document `Controller@method` actions resolved through PSR-4 roots
///
/// Returns a JSON object mapping each action to its operation.
pub fn document_routes(config: &Config, base_dir: &Path, actions: &[String]) -> Result<Value> {
    if config.autoload.is_empty() {
        return Err(anyhow!(
            "No [[autoload]] roots configured; cannot locate controller classes"
        ));
    }

    info!("Documenting {} route(s)", actions.len());
    let loader = Psr4Loader::new(base_dir, config.autoload.clone());
    let mut extension = Extension::new(config, Box::new(loader), HookRegistry::new());

    let mut operations = Map::new();
    for action in actions {
        let operation = extension
            .document(&RouteInfo::new(action.as_str()))
            .with_context(|| format!("Failed to document {action}"))?;
        debug!("{action}: {} parameter(s)", operation.parameters.len());
        operations.insert(action.clone(), serde_json::to_value(&operation)?);
    }

    Ok(Value::Object(operations))
}

/// Document one handler in a single PHP file
///
/// Back references are resolved against the same file. When `class` is
/// omitted the first class the file declares is used.
pub fn inspect_file(
    config: &Config,
    file: &Path,
    method: &str,
    class: Option<&str>,
) -> Result<Operation> {
    let unit = load_file(file).with_context(|| format!("Failed to load {}", file.display()))?;

    let class = match class {
        Some(class) => class.trim_start_matches('\\').to_string(),
        None => unit
            .declared_classes()
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("{} declares no class", file.display()))?,
    };
    info!("Inspecting {class}@{method} in {}", file.display());

    let loader = MemoryLoader::new().with_unit(&class, unit.source());
    let mut extension = Extension::new(config, Box::new(loader), HookRegistry::new());

    let mut operation = Operation::new(format!("{class}@{method}"));
    extension
        .handle_unit(&mut operation, &unit, &class, method)
        .with_context(|| format!("Failed to document {class}@{method}"))?;
    Ok(operation)
}

/// The four capability descriptors under the configured keys
pub fn describe_features(config: &Config) -> Vec<Feature> {
    features(&config.parameters)
}
