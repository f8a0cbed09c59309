//! Test payloads and test pages for scaffolded components.

use std::{collections::HashSet, fs, path::PathBuf};

use anyhow::Context;
use colored::Colorize;
use serde_json::{Map, Value, json};

use crate::{
    ctx::AppContext,
    schema::model::{Field, FieldType, Schema},
    utils::to_pascal_case,
};

/// `_uid` used by every generated payload.
pub const TEST_UID: &str = "test-uid-123";

fn sample_value(name: &str, field: &Field) -> Value {
    if let Some(default) = &field.default_value {
        return default.clone();
    }
    match field.field_type {
        FieldType::Text | FieldType::Textarea => Value::String(format!("Test {name}")),
        FieldType::Number => json!(0),
        FieldType::Boolean => json!(false),
        FieldType::Option => match field.options.as_deref() {
            Some([first, ..]) => Value::String(first.value.clone()),
            _ => json!("option1"),
        },
        FieldType::Multilink => json!({"url": "https://example.com", "linktype": "url"}),
        FieldType::Asset => json!("https://example.com/image.jpg"),
        FieldType::Bloks => json!([]),
        _ => Value::Null,
    }
}

/// Block payload exercising every field of `schema`.
pub fn sample_payload(schema: &Schema) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("_uid".into(), json!(TEST_UID));
    payload.insert("component".into(), json!(schema.name));
    for (name, field) in &schema.fields {
        payload.insert(name.clone(), sample_value(name, field));
    }
    payload
}

/// Test page rendering the wrapper with `payload`.
pub fn test_page(schema: &Schema, payload: &Map<String, Value>) -> anyhow::Result<String> {
    let wrapper = format!("{}Blok", to_pascal_case(&schema.name));
    let data = serde_json::to_string_pretty(payload)?;
    Ok(format!(
        "// Test page for {display}\n// Add this to a test page in Storyblok or use in development\n\nimport {wrapper} from '@/src/storyblok/components/{name}'\n\nconst testData = {data}\n\nexport default function TestPage() {{\n  return (\n    <div style={{{{ padding: '2rem' }}}}>\n      <h1>Testing: {display}</h1>\n      <{wrapper} blok={{testData}} />\n    </div>\n  )\n}}\n",
        display = schema.display_name,
        name = schema.name,
    ))
}

/// Identifiers used by component code, ignoring the props interface and comments.
fn code_identifiers(source: &str) -> HashSet<&str> {
    let mut idents = HashSet::new();
    let mut in_interface = false;
    for line in source.lines() {
        let t = line.trim_start();
        if in_interface {
            in_interface = !t.starts_with('}');
            continue;
        }
        if t.starts_with("interface ") || t.starts_with("export interface ") {
            in_interface = !t.contains('}');
            continue;
        }
        if t.starts_with("//") || t.starts_with("/*") || t.starts_with('*') {
            continue;
        }
        idents.extend(
            line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .filter(|s| !s.is_empty()),
        );
    }
    idents
}

/// Schema fields the presentational `source` never reads.
pub fn unreferenced_fields(schema: &Schema, source: &str) -> Vec<String> {
    let idents = code_identifiers(source);
    schema
        .fields
        .keys()
        .filter(|f| !idents.contains(f.as_str()))
        .cloned()
        .collect()
}

/// What `test-component` produced.
#[derive(Debug, Clone)]
pub struct TestReport {
    pub page: PathBuf,
    pub payload: Map<String, Value>,
    /// Fields the presentational component does not read.
    pub inaccessible: Vec<String>,
}

impl TestReport {
    pub fn all_accessible(&self) -> bool {
        self.inaccessible.is_empty()
    }
}

/// Writes `<app>/test/<name>.test.tsx` for an already scaffolded component.
pub fn run(ctx: &AppContext, name: &str) -> anyhow::Result<TestReport> {
    let schema = ctx.store().load(name)?.value;
    println!("{}", format!("Testing component: {name}").bold());
    println!("   Display Name: {}", schema.display_name);

    let files = ctx.scaffolder().check_component_files(&schema.name);
    let mark = |ok: bool| if ok { "yes".green() } else { "no".red() };
    println!("   Presentational:    {}", mark(files.presentational));
    println!("   Storyblok Wrapper: {}", mark(files.wrapper));
    println!("   Registered:        {}", mark(files.registered));
    if !files.complete() {
        bail!("Component files are missing. Run: blokgen generate-component {name}");
    }

    let payload = sample_payload(&schema);
    let page = ctx.paths.app_root.join("test").join(format!("{name}.test.tsx"));
    if let Some(parent) = page.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&page, test_page(&schema, &payload)?)
        .with_context(|| format!("failed to write {}", page.display()))?;
    println!("   {} {}", "created:".green(), page.display());

    let source = fs::read_to_string(&files.paths.presentational)
        .with_context(|| format!("failed to read {}", files.paths.presentational.display()))?;
    let inaccessible = unreferenced_fields(&schema, &source);
    for field in schema.fields.keys() {
        let ok = !inaccessible.contains(field);
        println!("   {field}: {}", if ok { "accessible".green() } else { "not accessible".red() });
    }

    let nested: Vec<_> = schema
        .fields
        .iter()
        .filter(|(_, f)| !f.nested_components().is_empty())
        .collect();
    if !nested.is_empty() {
        println!("   Nested components:");
        for (field, f) in nested {
            println!("      {field}: {}", f.nested_components().join(", "));
        }
    }

    Ok(TestReport {
        page,
        payload,
        inaccessible,
    })
}
