//! Schema generation from the catalog.

use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;

use crate::{
    ctx::AppContext,
    schema::{
        catalog::{CatalogEntry, SchemaBuilder},
        model::Category,
    },
};

/// Options for `generate-schema`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub display_name: Option<String>,
    pub design_url: Option<String>,
    /// Overwrite existing schema files.
    pub force: bool,
}

/// A schema file written by [`generate_schemas`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub name: String,
    pub category: Category,
}

static NODE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"node-id=([\d-]+)").expect("valid node id regex"));

/// Design node id from a design URL: `...?node-id=1-155` -> `1:155`.
pub fn node_id_from_url(url: &str) -> Option<String> {
    NODE_ID.captures(url).map(|c| c[1].replace('-', ":"))
}

/// Writes the catalog schema for `block_name`, nested dependencies first.
///
/// Returns the schemas actually written, in write order; skipped files are
/// left out.
pub fn generate_schemas(
    ctx: &AppContext,
    block_name: &str,
    options: &GenerateOptions,
) -> anyhow::Result<Vec<Generated>> {
    let entry = CatalogEntry::resolve(block_name, options.display_name.as_deref());
    let builder = SchemaBuilder::new();
    let store = ctx.store();

    let design_reference = match options.design_url.as_deref() {
        Some(url) => match node_id_from_url(url) {
            Some(node) => {
                println!("   {} (node-id: {node})", "Design reference recorded".green());
                Some(format!(
                    "Figma design context for {block_name} - node-id: {node}"
                ))
            }
            None => {
                warn!("No node-id in design URL {url}, generating a plain skeleton");
                None
            }
        },
        None => None,
    };

    let mut schemas = entry.dependencies(&builder);
    if !schemas.is_empty() {
        debug!("'{block_name}' depends on {} nested schema(s)", schemas.len());
    }
    schemas.push((entry.build(&builder), entry.category()));

    let mut written = Vec::new();
    for (schema, category) in schemas {
        let outcome = store.write(&schema, category, !options.force)?;
        if !outcome.was_written() {
            println!(
                "   {} {}",
                "schema exists, skipping:".yellow(),
                outcome.path().display()
            );
            continue;
        }
        println!("   {} {}", "schema written:".green(), outcome.path().display());
        if let Some(text) = &design_reference {
            let path = store.write_design_reference(&schema.name, text)?;
            debug!("Design reference stored at {}", path.display());
        }
        written.push(Generated {
            name: schema.name,
            category,
        });
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    fn context(dir: &tempfile::TempDir) -> AppContext {
        AppContext::new(dir.path(), Settings::default(), false)
    }

    #[test]
    fn test_node_id() {
        assert_eq!(
            node_id_from_url("https://figma.com/design/abc?node-id=1-155&t=x").as_deref(),
            Some("1:155")
        );
        assert_eq!(node_id_from_url("https://figma.com/design/abc"), None);
    }

    #[test]
    fn test_dependencies_written_first_and_skipped_later() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let written = generate_schemas(&ctx, "stats-section", &GenerateOptions::default()).unwrap();
        assert_eq!(
            written,
            [
                Generated {
                    name: "stat_item".into(),
                    category: Category::Nested
                },
                Generated {
                    name: "stats_section".into(),
                    category: Category::Bloks
                },
            ]
        );

        let again = generate_schemas(&ctx, "stats_section", &GenerateOptions::default()).unwrap();
        assert!(again.is_empty());

        let forced = GenerateOptions {
            force: true,
            ..Default::default()
        };
        assert_eq!(generate_schemas(&ctx, "stats_section", &forced).unwrap().len(), 2);
    }

    #[test]
    fn test_generic_section_with_design_reference() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let options = GenerateOptions {
            display_name: Some("Why Us".into()),
            design_url: Some("https://figma.com/design/x?node-id=4-20".into()),
            force: false,
        };
        let written = generate_schemas(&ctx, "why-us", &options).unwrap();
        assert_eq!(written.last().unwrap().name, "why_us");

        let stored = ctx.store().load("why_us").unwrap();
        assert_eq!(stored.value.display_name, "Why Us");
        assert_eq!(
            ctx.store().read_design_reference("why_us").as_deref(),
            Some("Figma design context for why-us - node-id: 4:20")
        );
        assert!(ctx.store().read_design_reference("benefit_item").is_some());
    }
}
