//! Component registration manifest.
//!
//! `generated.components.ts` maps every block type name to its wrapper. The
//! file is rendered from scratch out of the schema store each time, never
//! patched in place.

use std::{fs, path::Path, sync::LazyLock};

use anyhow::Context;
use regex::Regex;

use crate::{schema::store::SchemaStore, utils::to_pascal_case};

const HEADER: &str = "\
// AUTO-GENERATED by blokgen: do not edit manually
// Regenerated from the schema store whenever components are scaffolded

import React from 'react'
";

static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)'([^'\n]+)'\s*:\s*[A-Za-z_][A-Za-z0-9_]*\s*(?:,|\}|$)")
        .expect("valid manifest entry regex")
});

/// Renders the manifest for `names`, in the given order.
pub fn render_manifest(names: &[String]) -> String {
    let mut out = String::from(HEADER);
    if !names.is_empty() {
        out.push_str("\n// Import Storyblok wrapper components\n");
        for name in names {
            out.push_str(&format!(
                "import {} from './components/{name}'\n",
                to_pascal_case(name)
            ));
        }
    }
    out.push_str("\n// Component resolver map for @storyblok/react\n");
    out.push_str(
        "export const storyblokComponents: Record<string, React.ComponentType<{ blok: any }>> = {\n",
    );
    for name in names {
        out.push_str(&format!("  '{name}': {},\n", to_pascal_case(name)));
    }
    out.push_str("}\n");
    out
}

/// Names that belong in the manifest: every stored schema followed by
/// `extra` names, restricted to those whose wrapper exists in `wrapper_dir`.
pub fn manifest_entries(
    store: &SchemaStore,
    wrapper_dir: &Path,
    extra: &[String],
) -> anyhow::Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    let stored = store.list()?.into_iter().map(|(_, name)| name);
    for name in stored.chain(extra.iter().cloned()) {
        if names.contains(&name) {
            continue;
        }
        if wrapper_dir.join(format!("{name}.tsx")).is_file() {
            names.push(name);
        } else {
            debug!("No wrapper for '{name}', leaving it out of the manifest");
        }
    }
    Ok(names)
}

/// Writes `content` to `path` unless it already holds exactly that.
///
/// Returns whether the file changed.
pub fn write_if_changed(path: &Path, content: &str) -> anyhow::Result<bool> {
    if fs::read_to_string(path).is_ok_and(|current| current == content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// Block type names registered in manifest text.
pub fn registered_names(manifest: &str) -> Vec<String> {
    ENTRY
        .captures_iter(manifest)
        .map(|c| c[1].to_string())
        .collect()
}

/// Whether manifest text carries an entry for `name`.
pub fn is_registered(manifest: &str, name: &str) -> bool {
    registered_names(manifest).iter().any(|n| n == name)
}
