//! Content API story inspection.
//!
//! Fetches one story by slug and checks that every block type in its
//! content tree has an entry in the registration manifest.

use std::{
    collections::BTreeSet,
    fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use colored::Colorize;
use serde_json::Value;

use crate::{config::ContentConfig, ctx::AppContext, scaffold::registry};

/// Content delivery client.
pub struct StoryClient<'a> {
    http: reqwest::Client,
    config: &'a ContentConfig,
}

impl<'a> StoryClient<'a> {
    pub fn new(config: &'a ContentConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {e}"))?;
        Ok(Self { http, config })
    }

    /// Fetches the story at `slug`, returning the `story` object.
    pub async fn fetch(&self, slug: &str, draft: bool) -> anyhow::Result<Value> {
        let Some(token) = self.config.delivery_token.as_deref() else {
            bail!("STORYBLOK_DELIVERY_TOKEN not set");
        };
        let url = format!(
            "{}/cdn/stories/{}",
            self.config.cdn_base_url.trim_end_matches('/'),
            slug.trim_start_matches('/')
        );

        let mut query = vec![
            ("token", token.to_string()),
            (
                "version",
                if draft { "draft" } else { "published" }.to_string(),
            ),
        ];
        if draft {
            let cv = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            query.push(("cv", cv.to_string()));
        }

        debug!("GET {url}");
        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch story {slug}: {e}"))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP {}: {body}", status.as_u16());
        }
        let mut body: Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Invalid story response: {e}"))?;
        match body.get_mut("story") {
            Some(story) => Ok(story.take()),
            None => bail!("Response for {slug} has no story"),
        }
    }
}

/// Every `component` value in a content tree, in sorted order.
pub fn collect_components(content: &Value) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut stack = vec![content];
    while let Some(node) = stack.pop() {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(name)) = map.get("component") {
                    found.insert(name.clone());
                }
                stack.extend(map.values());
            }
            Value::Array(items) => stack.extend(items),
            _ => {}
        }
    }
    found
}

/// Result of inspecting one story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryReport {
    pub name: String,
    pub components: BTreeSet<String>,
    pub unregistered: Vec<String>,
}

/// Splits `components` by whether `manifest` registers them.
pub fn coverage(name: String, components: BTreeSet<String>, manifest: &str) -> StoryReport {
    let unregistered = components
        .iter()
        .filter(|c| !registry::is_registered(manifest, c))
        .cloned()
        .collect();
    StoryReport {
        name,
        components,
        unregistered,
    }
}

/// Fetches `slug` and reports block types missing from the manifest.
pub async fn inspect(ctx: &AppContext, slug: &str, draft: bool) -> anyhow::Result<StoryReport> {
    let client = StoryClient::new(&ctx.settings.content)?;
    let story = client.fetch(slug, draft).await?;
    let name = story
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or(slug)
        .to_string();
    let null = Value::Null;
    let content = story.get("content").unwrap_or(&null);

    let manifest_path = crate::scaffold::manifest_path(&ctx.paths.app_root);
    let manifest = fs::read_to_string(&manifest_path).unwrap_or_else(|e| {
        warn!("Could not read {}: {e}", manifest_path.display());
        String::new()
    });
    let report = coverage(name, collect_components(content), &manifest);

    println!("{}", format!("Story: {}", report.name).bold());
    for component in &report.components {
        let ok = !report.unregistered.contains(component);
        let mark = if ok { "registered".green() } else { "missing".red() };
        println!("   {component}: {mark}");
    }
    Ok(report)
}
