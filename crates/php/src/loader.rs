//! Declaring-unit loaders
//!
//! The inference engine never touches the filesystem itself. It asks a
//! `UnitLoader` for the unit declaring a type and parses nothing else.

use crate::unit::SourceUnit;
use qbdoc_core::config::AutoloadRoot;
use qbdoc_core::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads and parses the source unit declaring a type
///
/// Implementations re-parse on every call; callers that need caching wrap
/// a loader rather than relying on it.
pub trait UnitLoader {
    fn load_declaring_unit(&self, type_name: &str) -> Result<SourceUnit>;
}

fn normalize_type_name(type_name: &str) -> &str {
    type_name.trim_start_matches('\\')
}

/// Resolves classes to files through PSR-4 namespace prefixes
#[derive(Debug, Clone)]
pub struct Psr4Loader {
    base_dir: PathBuf,
    roots: Vec<AutoloadRoot>,
}

impl Psr4Loader {
    /// Create a loader; relative root paths are resolved against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>, roots: Vec<AutoloadRoot>) -> Self {
        Self {
            base_dir: base_dir.into(),
            roots,
        }
    }

    /// Candidate file for a class, using the longest matching prefix
    pub fn resolve_path(&self, type_name: &str) -> Option<PathBuf> {
        let type_name = normalize_type_name(type_name);
        let root = self
            .roots
            .iter()
            .filter(|root| type_name.starts_with(normalize_type_name(&root.prefix)))
            .max_by_key(|root| normalize_type_name(&root.prefix).len())?;

        let relative = type_name[normalize_type_name(&root.prefix).len()..]
            .trim_start_matches('\\')
            .replace('\\', "/");
        if relative.is_empty() {
            return None;
        }

        Some(
            self.base_dir
                .join(&root.path)
                .join(format!("{relative}.php")),
        )
    }
}

impl UnitLoader for Psr4Loader {
    fn load_declaring_unit(&self, type_name: &str) -> Result<SourceUnit> {
        let path = self
            .resolve_path(type_name)
            .filter(|path| path.is_file())
            .ok_or_else(|| Error::unit_not_found(type_name))?;

        debug!(type_name, path = %path.display(), "loading declaring unit");
        load_file(&path)
    }
}

/// Read and parse one PHP file
pub fn load_file(path: &Path) -> Result<SourceUnit> {
    let source =
        std::fs::read_to_string(path).map_err(|e| Error::io(path.display().to_string(), e))?;
    SourceUnit::parse(path.display().to_string(), source)
}

/// Serves units from source text held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    sources: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the source declaring a class
    pub fn insert(&mut self, type_name: &str, source: impl Into<String>) {
        self.sources
            .insert(normalize_type_name(type_name).to_string(), source.into());
    }

    pub fn with_unit(mut self, type_name: &str, source: impl Into<String>) -> Self {
        self.insert(type_name, source);
        self
    }
}

impl UnitLoader for MemoryLoader {
    fn load_declaring_unit(&self, type_name: &str) -> Result<SourceUnit> {
        let type_name = normalize_type_name(type_name);
        let source = self
            .sources
            .get(type_name)
            .ok_or_else(|| Error::unit_not_found(type_name))?;
        SourceUnit::parse(type_name, source.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn roots() -> Vec<AutoloadRoot> {
        vec![
            AutoloadRoot {
                prefix: "App\\".to_string(),
                path: PathBuf::from("app"),
            },
            AutoloadRoot {
                prefix: "App\\Admin\\".to_string(),
                path: PathBuf::from("modules/admin"),
            },
        ]
    }

    #[test]
    fn test_resolve_path_prefers_longest_prefix() {
        let loader = Psr4Loader::new("/srv", roots());
        assert_eq!(
            loader.resolve_path("\\App\\Http\\Controllers\\PostController"),
            Some(PathBuf::from("/srv/app/Http/Controllers/PostController.php"))
        );
        assert_eq!(
            loader.resolve_path("App\\Admin\\UserController"),
            Some(PathBuf::from("/srv/modules/admin/UserController.php"))
        );
        assert_eq!(loader.resolve_path("Vendor\\Thing"), None);
    }

    #[test]
    fn test_psr4_loader_reads_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let controllers = dir.path().join("app/Http/Controllers");
        std::fs::create_dir_all(&controllers).expect("create dirs");
        std::fs::write(
            controllers.join("PostController.php"),
            "<?php class PostController { public function index() {} }",
        )
        .expect("write controller");

        let loader = Psr4Loader::new(dir.path(), roots());
        let unit = loader
            .load_declaring_unit("App\\Http\\Controllers\\PostController")
            .expect("load unit");
        assert!(unit.find_method("index").is_some());

        let missing = loader.load_declaring_unit("App\\Http\\Controllers\\Missing");
        assert!(matches!(missing, Err(Error::UnitNotFound(_))));
    }

    #[test]
    fn test_load_file_reports_unreadable_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("Gone.php");
        match load_file(&path) {
            Err(Error::Io { path: reported, .. }) => {
                assert_eq!(reported, path.display().to_string());
            }
            other => panic!("expected an I/O error, got {other:?}"),
        }
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemoryLoader::new().with_unit("\\App\\Foo", "<?php class Foo {}");
        assert!(loader.load_declaring_unit("App\\Foo").is_ok());
        assert!(matches!(
            loader.load_declaring_unit("App\\Bar"),
            Err(Error::UnitNotFound(_))
        ));
    }
}
