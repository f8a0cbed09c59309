//! Component scaffolding.
//!
//! Turns a schema into the React sources the consuming app needs:
//!
//! - [`props`] - TypeScript property types per field
//! - [`templates`] - presentational component, stylesheet and wrapper text
//! - [`registry`] - the regenerated registration manifest
//!
//! Existing files are never overwritten. The manifest is the one exception:
//! it is derived data and is rewritten whenever its rendered content changes.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use colored::Colorize;

use crate::{schema::model::Schema, schema::store::SchemaStore, utils::to_pascal_case};

pub mod props;
pub mod registry;
pub mod templates;

/// Where each generated file of one component lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentPaths {
    pub presentational: PathBuf,
    pub stylesheet: PathBuf,
    pub wrapper: PathBuf,
    pub manifest: PathBuf,
}

impl ComponentPaths {
    pub fn new(app_root: &Path, name: &str) -> Self {
        let pascal = to_pascal_case(name);
        let presentational_dir = app_root.join("src/components/presentational");
        Self {
            presentational: presentational_dir.join(format!("{pascal}.tsx")),
            stylesheet: presentational_dir.join(format!("{pascal}.module.css")),
            wrapper: wrapper_dir(app_root).join(format!("{name}.tsx")),
            manifest: manifest_path(app_root),
        }
    }
}

/// Directory holding the CMS binding wrappers.
pub fn wrapper_dir(app_root: &Path) -> PathBuf {
    app_root.join("src/storyblok/components")
}

/// Location of `generated.components.ts`.
pub fn manifest_path(app_root: &Path) -> PathBuf {
    app_root.join("src/storyblok/generated.components.ts")
}

/// Rendered sources for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldArtifacts {
    pub presentational: String,
    pub stylesheet: String,
    pub wrapper: String,
}

/// Renders every per-component artifact of `schema`.
pub fn render(schema: &Schema, design_reference: bool) -> ScaffoldArtifacts {
    ScaffoldArtifacts {
        presentational: templates::presentational(schema, design_reference),
        stylesheet: templates::stylesheet(schema, design_reference),
        wrapper: templates::wrapper(schema),
    }
}

/// What a scaffold run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldReport {
    pub created: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// The manifest content changed and was rewritten.
    pub manifest_updated: bool,
}

/// Presence of a component's generated files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFiles {
    pub presentational: bool,
    pub wrapper: bool,
    pub registered: bool,
    pub paths: ComponentPaths,
}

impl ComponentFiles {
    pub fn complete(&self) -> bool {
        self.presentational && self.wrapper && self.registered
    }

    /// One message per missing piece.
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.presentational {
            out.push(format!(
                "Presentational component not found: {}",
                self.paths.presentational.display()
            ));
        }
        if !self.wrapper {
            out.push(format!(
                "Storyblok wrapper not found: {}",
                self.paths.wrapper.display()
            ));
        }
        if !self.registered {
            out.push("Component not registered in generated.components.ts".to_string());
        }
        out
    }
}

/// Writes component scaffolds into an app root.
pub struct Scaffolder<'a> {
    app_root: &'a Path,
    store: &'a SchemaStore,
    extra_components: &'a [String],
}

impl<'a> Scaffolder<'a> {
    pub fn new(app_root: &'a Path, store: &'a SchemaStore, extra_components: &'a [String]) -> Self {
        Self {
            app_root,
            store,
            extra_components,
        }
    }

    pub fn paths(&self, name: &str) -> ComponentPaths {
        ComponentPaths::new(self.app_root, name)
    }

    /// Creates any missing files for `schema`, then refreshes the manifest.
    pub fn scaffold(&self, schema: &Schema) -> anyhow::Result<ScaffoldReport> {
        let paths = self.paths(&schema.name);
        let design_reference = self.store.read_design_reference(&schema.name).is_some();
        if design_reference {
            info!("Using design reference for '{}'", schema.name);
        }

        let artifacts = render(schema, design_reference);
        let mut report = ScaffoldReport::default();
        for (path, content) in [
            (&paths.presentational, &artifacts.presentational),
            (&paths.stylesheet, &artifacts.stylesheet),
            (&paths.wrapper, &artifacts.wrapper),
        ] {
            if path.exists() {
                println!("   {} {}", "skipped (exists):".yellow(), path.display());
                report.skipped.push(path.clone());
                continue;
            }
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("   {} {}", "created:".green(), path.display());
            report.created.push(path.clone());
        }

        report.manifest_updated = self.refresh_manifest()?;
        Ok(report)
    }

    /// Regenerates the registration manifest from the store.
    ///
    /// Returns whether the file changed.
    pub fn refresh_manifest(&self) -> anyhow::Result<bool> {
        let names = registry::manifest_entries(
            self.store,
            &wrapper_dir(self.app_root),
            self.extra_components,
        )?;
        let path = manifest_path(self.app_root);
        let changed = registry::write_if_changed(&path, &registry::render_manifest(&names))?;
        if changed {
            println!(
                "   {} {} ({} components)",
                "updated:".green(),
                path.display(),
                names.len()
            );
        } else {
            debug!("Manifest {} is up to date", path.display());
        }
        Ok(changed)
    }

    /// Reports which generated files exist for component `name`.
    pub fn check_component_files(&self, name: &str) -> ComponentFiles {
        let paths = self.paths(name);
        let registered = fs::read_to_string(&paths.manifest)
            .is_ok_and(|text| registry::is_registered(&text, name));
        ComponentFiles {
            presentational: paths.presentational.is_file(),
            wrapper: paths.wrapper.is_file(),
            registered,
            paths,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{catalog::SchemaBuilder, model::Category};

    fn setup() -> (tempfile::TempDir, SchemaStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SchemaStore::new(dir.path().join("schemas"));
        (dir, store)
    }

    #[test]
    fn test_paths_layout() {
        let paths = ComponentPaths::new(Path::new("/app"), "stat_item");
        assert_eq!(
            paths.presentational,
            PathBuf::from("/app/src/components/presentational/StatItem.tsx")
        );
        assert_eq!(
            paths.stylesheet,
            PathBuf::from("/app/src/components/presentational/StatItem.module.css")
        );
        assert_eq!(
            paths.wrapper,
            PathBuf::from("/app/src/storyblok/components/stat_item.tsx")
        );
    }

    #[test]
    fn test_scaffold_creates_then_skips() {
        let (dir, store) = setup();
        let app = dir.path().join("app");
        let schema = SchemaBuilder::new().stat_item();
        store.write(&schema, Category::Nested, false).unwrap();
        let scaffolder = Scaffolder::new(&app, &store, &[]);

        let first = scaffolder.scaffold(&schema).unwrap();
        assert_eq!(first.created.len(), 3);
        assert!(first.manifest_updated);
        let files = scaffolder.check_component_files("stat_item");
        assert!(files.complete());

        let second = scaffolder.scaffold(&schema).unwrap();
        assert!(second.created.is_empty());
        assert_eq!(second.skipped.len(), 3);
        assert!(!second.manifest_updated);
    }

    #[test]
    fn test_existing_file_is_preserved() {
        let (dir, store) = setup();
        let app = dir.path().join("app");
        let schema = SchemaBuilder::new().primary_button();
        let scaffolder = Scaffolder::new(&app, &store, &[]);
        let paths = scaffolder.paths(&schema.name);
        fs::create_dir_all(paths.presentational.parent().unwrap()).unwrap();
        fs::write(&paths.presentational, "// hand written").unwrap();

        let report = scaffolder.scaffold(&schema).unwrap();
        assert_eq!(report.skipped, [paths.presentational.clone()]);
        assert_eq!(
            fs::read_to_string(&paths.presentational).unwrap(),
            "// hand written"
        );
    }

    #[test]
    fn test_design_reference_switches_templates() {
        let (dir, store) = setup();
        let app = dir.path().join("app");
        let schema = SchemaBuilder::new().section("benefits_section", None);
        store
            .write_design_reference(&schema.name, "node 1:155")
            .unwrap();

        Scaffolder::new(&app, &store, &[]).scaffold(&schema).unwrap();
        let css = fs::read_to_string(ComponentPaths::new(&app, &schema.name).stylesheet).unwrap();
        assert!(css.contains(".benefitsGrid"));
    }
}
