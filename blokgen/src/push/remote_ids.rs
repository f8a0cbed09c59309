//! Remote component id sidecar.
//!
//! `<schemas_root>/.remote-ids.json` maps component names to the ids the
//! management API assigned, so later pushes can address a component by id.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde_json::Value;

pub const SIDECAR_FILE: &str = ".remote-ids.json";

/// Component name to remote id map backed by a JSON file.
#[derive(Debug, Clone)]
pub struct RemoteIds {
    path: PathBuf,
    ids: BTreeMap<String, String>,
}

impl RemoteIds {
    /// Reads the sidecar under `schemas_root`. A missing or unreadable file
    /// starts an empty map.
    pub fn load(schemas_root: &Path) -> Self {
        let path = schemas_root.join(SIDECAR_FILE);
        let ids = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!("Ignoring malformed {}: {e}", path.display());
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, ids }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, id: impl Into<String>) {
        self.ids.insert(name.to_string(), id.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.ids.remove(name)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = serde_json::to_string_pretty(&self.ids)?;
        text.push('\n');
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

/// Textual form of an id the API returns as either a number or a string.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Picks the smallest of several candidate ids. Numeric ids compare by value
/// and sort before non-numeric ones.
pub fn smallest_id(ids: impl IntoIterator<Item = String>) -> Option<String> {
    ids.into_iter()
        .min_by_key(|id| (id.parse::<u64>().unwrap_or(u64::MAX), id.clone()))
}
