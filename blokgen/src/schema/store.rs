//! File-backed schema store.
//!
//! Schemas live at `<root>/<bloks|nested>/<name>.json`. Lookups probe the
//! `bloks` category before `nested`; the first hit wins.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use thiserror::Error;

use crate::schema::model::{Category, Schema};

/// Directory holding optional design reference texts.
const DESIGN_REFERENCE_DIR: &str = "figma-context";

/// Errors raised while reading or writing schema files.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Schema file not found: {name}.json")]
    NotFound { name: String, checked: Vec<PathBuf> },
    #[error("Invalid JSON in {name}.json: {source}")]
    Parse {
        name: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A schema together with where it was found.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub value: T,
    pub path: PathBuf,
    pub category: Category,
}

/// Result of [`SchemaStore::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// A file already existed and `skip_if_exists` was set.
    Skipped(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(p) | WriteOutcome::Skipped(p) => p,
        }
    }

    pub fn was_written(&self) -> bool {
        matches!(self, WriteOutcome::Written(_))
    }
}

/// Schema JSON store rooted at a directory.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    root: PathBuf,
}

impl SchemaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a schema of `name` has (or would have) in `category`.
    pub fn path_for(&self, name: &str, category: Category) -> PathBuf {
        self.root
            .join(category.dir_name())
            .join(format!("{name}.json"))
    }

    /// Locates the file for `name`, `bloks` first.
    pub fn locate(&self, name: &str) -> Option<(PathBuf, Category)> {
        Category::SEARCH_ORDER
            .into_iter()
            .find(|c| self.exists_in(name, *c))
            .map(|c| (self.path_for(name, c), c))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.locate(name).is_some()
    }

    /// Whether `name` is stored under `category` specifically.
    pub fn exists_in(&self, name: &str, category: Category) -> bool {
        self.path_for(name, category).is_file()
    }

    /// Loads the raw JSON document for `name`.
    pub fn load_raw(&self, name: &str) -> Result<Stored<Value>, StoreError> {
        let (path, category) = self.locate(name).ok_or_else(|| StoreError::NotFound {
            name: name.to_string(),
            checked: Category::SEARCH_ORDER
                .iter()
                .map(|c| self.path_for(name, *c))
                .collect(),
        })?;
        let content = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let value = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            name: name.to_string(),
            path: path.clone(),
            source,
        })?;
        Ok(Stored {
            value,
            path,
            category,
        })
    }

    /// Loads and decodes the schema for `name`.
    pub fn load(&self, name: &str) -> Result<Stored<Schema>, StoreError> {
        let raw = self.load_raw(name)?;
        let schema = serde_json::from_value(raw.value).map_err(|source| StoreError::Parse {
            name: name.to_string(),
            path: raw.path.clone(),
            source,
        })?;
        Ok(Stored {
            value: schema,
            path: raw.path,
            category: raw.category,
        })
    }

    /// Writes `schema` under `category` as pretty-printed JSON.
    ///
    /// With `skip_if_exists` an existing file is left untouched.
    pub fn write(
        &self,
        schema: &Schema,
        category: Category,
        skip_if_exists: bool,
    ) -> Result<WriteOutcome, StoreError> {
        let path = self.path_for(&schema.name, category);
        if skip_if_exists && self.exists_in(&schema.name, category) {
            debug!("Schema {} already exists, skipping", path.display());
            return Ok(WriteOutcome::Skipped(path));
        }

        let dir = self.root.join(category.dir_name());
        fs::create_dir_all(&dir).map_err(|e| StoreError::io(&dir, e))?;

        let mut content =
            serde_json::to_string_pretty(schema).map_err(|source| StoreError::Encode {
                name: schema.name.clone(),
                source,
            })?;
        content.push('\n');
        fs::write(&path, content).map_err(|e| StoreError::io(&path, e))?;
        info!("Schema '{}' written to {}", schema.name, path.display());
        Ok(WriteOutcome::Written(path))
    }

    /// Every stored schema name, `bloks` first, names sorted per category.
    pub fn list(&self) -> Result<Vec<(Category, String)>, StoreError> {
        let mut out = Vec::new();
        for category in Category::SEARCH_ORDER {
            let dir = self.root.join(category.dir_name());
            if !dir.is_dir() {
                continue;
            }
            let mut names = Vec::new();
            for entry in fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))? {
                let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
            names.sort();
            out.extend(names.into_iter().map(|n| (category, n)));
        }
        Ok(out)
    }

    fn design_reference_path(&self, name: &str) -> PathBuf {
        self.root
            .join(DESIGN_REFERENCE_DIR)
            .join(format!("{name}.txt"))
    }

    /// Stores design reference text for `name`.
    pub fn write_design_reference(&self, name: &str, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.design_reference_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }
        fs::write(&path, text).map_err(|e| StoreError::io(&path, e))?;
        Ok(path)
    }

    /// Design reference text for `name`, if one was stored and is readable.
    pub fn read_design_reference(&self, name: &str) -> Option<String> {
        let path = self.design_reference_path(name);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                if path.exists() {
                    warn!("Ignoring unreadable design reference {}: {e}", path.display());
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::catalog::SchemaBuilder;

    #[test]
    fn test_write_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        let schema = SchemaBuilder::new().stat_item();

        let outcome = store.write(&schema, Category::Nested, true).unwrap();
        assert!(outcome.was_written());

        let loaded = store.load("stat_item").unwrap();
        assert_eq!(loaded.value, schema);
        assert_eq!(loaded.category, Category::Nested);
    }

    #[test]
    fn test_skip_if_exists_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        let schema = SchemaBuilder::new().primary_button();
        let path = store.path_for(&schema.name, Category::Nested);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{\"hand\": \"edited\"}").unwrap();

        let outcome = store.write(&schema, Category::Nested, true).unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped(path.clone()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"hand\": \"edited\"}");

        assert!(store.write(&schema, Category::Nested, false).unwrap().was_written());
    }

    #[test]
    fn test_bloks_wins_over_nested() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        let mut schema = SchemaBuilder::new().stat_item();
        store.write(&schema, Category::Nested, false).unwrap();
        schema.display_name = "Promoted".into();
        store.write(&schema, Category::Bloks, false).unwrap();

        let loaded = store.load("stat_item").unwrap();
        assert_eq!(loaded.category, Category::Bloks);
        assert_eq!(loaded.value.display_name, "Promoted");
        assert!(store.exists_in("stat_item", Category::Nested));
        assert!(!store.exists_in("stats_section", Category::Bloks));
    }

    #[test]
    fn test_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path());

        let err = store.load("ghost").unwrap_err();
        assert_eq!(err.to_string(), "Schema file not found: ghost.json");
        assert!(!store.exists("ghost"));

        let path = store.path_for("broken", Category::Bloks);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            store.load_raw("broken"),
            Err(StoreError::Parse { .. })
        ));
    }

    #[test]
    fn test_list_orders_bloks_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        let builder = SchemaBuilder::new();
        store.write(&builder.stats_section(), Category::Bloks, false).unwrap();
        store.write(&builder.stat_item(), Category::Nested, false).unwrap();
        store
            .write(&builder.benefit_item(), Category::Nested, false)
            .unwrap();

        let names: Vec<_> = store.list().unwrap().into_iter().map(|(_, n)| n).collect();
        assert_eq!(names, ["stats_section", "benefit_item", "stat_item"]);
    }
}
