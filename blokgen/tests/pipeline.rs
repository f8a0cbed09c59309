use std::fs;

use blokgen::{
    config::Settings,
    ctx::AppContext,
    generate::{self, GenerateOptions},
    orchestrate::{OrchestrateOptions, Orchestrator, PipelineStages, Stage},
    scaffold::{self, ComponentPaths, Scaffolder, registry},
    schema::{
        catalog::{self, SchemaBuilder},
        model::Category,
        store::SchemaStore,
        validator::{self, validate_schema_file},
    },
};

fn catalog_store() -> (tempfile::TempDir, SchemaStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SchemaStore::new(dir.path().join("schemas"));
    for (schema, category) in catalog::all(&SchemaBuilder::new()) {
        store.write(&schema, category, false).unwrap();
    }
    (dir, store)
}

#[test]
fn every_catalog_schema_validates() {
    let (_dir, store) = catalog_store();
    let names = store.list().unwrap();
    assert_eq!(names.len(), catalog::all(&SchemaBuilder::new()).len());
    for (_, name) in names {
        let report = validate_schema_file(&name, &store);
        assert!(report.is_valid(), "{name}: {:?}", report.errors);
    }
}

#[test]
fn store_round_trip_preserves_schema() {
    let (_dir, store) = catalog_store();
    for (schema, category) in catalog::all(&SchemaBuilder::new()) {
        let stored = store.load(&schema.name).unwrap();
        assert_eq!(stored.category, category);
        assert_eq!(stored.value, schema);
    }
}

#[test]
fn removing_whitelist_fails_validation() {
    let (_dir, store) = catalog_store();
    let mut raw = store.load_raw("stats_section").unwrap().value;
    raw["schema"]["stats"]
        .as_object_mut()
        .unwrap()
        .remove("component_whitelist");

    let errors = validator::validate(&raw, "stats_section");
    assert!(
        errors
            .iter()
            .any(|e| e.field.as_deref() == Some("stats")),
        "{errors:?}"
    );
}

#[test]
fn missing_nested_dependency_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let store = SchemaStore::new(dir.path());
    store
        .write(&SchemaBuilder::new().stats_section(), Category::Bloks, false)
        .unwrap();

    let report = validate_schema_file("stats_section", &store);
    assert!(!report.is_valid());
    assert!(report.errors.iter().any(|e| e.message.contains("stat_item")));
}

#[test]
fn scaffold_is_idempotent() {
    let (dir, store) = catalog_store();
    let app = dir.path().join("app");
    let extra = vec!["default-page".to_string()];
    let scaffolder = Scaffolder::new(&app, &store, &extra);

    let snapshot = |name: &str| {
        let paths = ComponentPaths::new(&app, name);
        [
            fs::read(&paths.presentational).unwrap(),
            fs::read(&paths.stylesheet).unwrap(),
            fs::read(&paths.wrapper).unwrap(),
            fs::read(&paths.manifest).unwrap(),
        ]
    };

    let schemas: Vec<_> = catalog::all(&SchemaBuilder::new())
        .into_iter()
        .map(|(s, _)| s)
        .collect();
    for schema in &schemas {
        scaffolder.scaffold(schema).unwrap();
    }
    let first: Vec<_> = schemas.iter().map(|s| snapshot(&s.name)).collect();

    for schema in &schemas {
        let report = scaffolder.scaffold(schema).unwrap();
        assert!(report.created.is_empty());
        assert!(!report.manifest_updated);
    }
    let second: Vec<_> = schemas.iter().map(|s| snapshot(&s.name)).collect();
    assert_eq!(first, second);

    for schema in &schemas {
        let paths = ComponentPaths::new(&app, &schema.name);
        let rendered = scaffold::render(schema, false);
        assert_eq!(fs::read_to_string(&paths.presentational).unwrap(), rendered.presentational);
        assert_eq!(fs::read_to_string(&paths.stylesheet).unwrap(), rendered.stylesheet);
        assert_eq!(fs::read_to_string(&paths.wrapper).unwrap(), rendered.wrapper);
        assert!(scaffolder.check_component_files(&schema.name).complete());
    }

    let rescaffolded = Scaffolder::new(&app, &store, &extra);
    for schema in &schemas {
        let report = rescaffolded.scaffold(schema).unwrap();
        assert_eq!(report.skipped.len(), 3);
    }
    let third: Vec<_> = schemas.iter().map(|s| snapshot(&s.name)).collect();
    assert_eq!(first, third);
}

#[test]
fn manifest_lists_only_existing_wrappers() {
    let (dir, store) = catalog_store();
    let app = dir.path().join("app");
    let extra = vec!["default-page".to_string()];
    let scaffolder = Scaffolder::new(&app, &store, &extra);

    scaffolder.scaffold(&SchemaBuilder::new().stat_item()).unwrap();
    let manifest = fs::read_to_string(scaffold::manifest_path(&app)).unwrap();
    assert_eq!(registry::registered_names(&manifest), ["stat_item"]);

    let page = scaffold::wrapper_dir(&app).join("default-page.tsx");
    fs::write(&page, "export default function Page() { return null }\n").unwrap();
    assert!(scaffolder.refresh_manifest().unwrap());
    let manifest = fs::read_to_string(scaffold::manifest_path(&app)).unwrap();
    assert!(registry::is_registered(&manifest, "default-page"));
    assert!(registry::is_registered(&manifest, "stat_item"));
}

#[tokio::test]
async fn generated_schemas_flow_through_pipeline_stages() {
    let dir = tempfile::tempdir().unwrap();
    let ctx = AppContext::new(dir.path(), Settings::default(), false);

    let written =
        generate::generate_schemas(&ctx, "stats-section", &GenerateOptions::default()).unwrap();
    let names: Vec<_> = written.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["stat_item", "stats_section"]);

    let options = OrchestrateOptions {
        skip_push: true,
        skip_code_review: true,
        ..Default::default()
    };
    let mut orchestrator = Orchestrator::new(PipelineStages::new(&ctx).unwrap());
    for name in &names {
        let report = orchestrator.run(name, options).await;
        assert_eq!(report.final_state, Stage::Done, "{name}");
        assert!(report.success, "{name}");
        assert!(report.push.is_none());
        assert!(report.review.is_none());
    }

    let manifest = fs::read_to_string(scaffold::manifest_path(&ctx.paths.app_root)).unwrap();
    assert_eq!(
        registry::registered_names(&manifest),
        ["stats_section", "stat_item"]
    );
    for name in &names {
        assert!(ctx.scaffolder().check_component_files(name).complete());
    }

    let missing = orchestrator.run("ghost", options).await;
    assert_eq!(missing.final_state, Stage::Failed);
}
