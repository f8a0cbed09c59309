//! Tool configuration types.
//!
//! Settings live in `.blokgen.toml` at the workspace root. Every section is
//! optional and falls back to defaults matching the usual repository layout.
//!
//! # Configuration File Format
//!
//! ```toml
//! [paths]
//! schemas_root = "schema-generator/schemas/storyblok"
//! app_root = "storyblok-app"
//!
//! [push]
//! method = "n8n"
//! webhook_url = "${env:N8N_WEBHOOK_URL}"
//!
//! [review]
//! typecheck_cmd = "npm run typecheck"
//! lint_cmd = "npm run lint"
//!
//! [registry]
//! extra_components = ["default-page"]
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::replace_env_placeholders;

/// Default file name looked up in the workspace root.
pub const DEFAULT_CONFIG_FILE: &str = ".blokgen.toml";

/// Root configuration structure.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Locations of the schema store and the consuming app.
    pub paths: PathsConfig,
    /// Remote push transports.
    pub push: PushConfig,
    /// Advisory review commands.
    pub review: ReviewConfig,
    /// Content delivery API used by `inspect-story`.
    pub content: ContentConfig,
    /// Registration manifest options.
    pub registry: RegistryConfig,
}

/// Directory layout, relative paths resolve against the workspace root.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Root holding the `bloks/` and `nested/` schema directories.
    pub schemas_root: PathBuf,
    /// Root of the Next.js app receiving generated components.
    pub app_root: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            schemas_root: PathBuf::from("schema-generator/schemas/storyblok"),
            app_root: PathBuf::from("storyblok-app"),
        }
    }
}

/// Transport used to deliver a schema to the CMS.
#[derive(
    Default, Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum PushMethod {
    /// POST the raw schema to a workflow-automation webhook.
    #[default]
    N8n,
    /// Talk to the management API directly.
    Direct,
}

/// Push configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PushConfig {
    /// Default transport when none is given on the command line.
    pub method: PushMethod,
    /// Webhook receiving schema JSON (`N8N_WEBHOOK_URL`).
    pub webhook_url: Option<String>,
    /// Management API token (`STORYBLOK_MANAGEMENT_TOKEN`).
    pub management_token: Option<String>,
    /// Space identifier (`STORYBLOK_SPACE_ID`).
    pub space_id: Option<String>,
    /// Management API base, the space path is appended.
    pub management_base_url: String,
    /// Treat an empty or non-JSON webhook reply as a failure.
    pub require_ack: bool,
    /// Delay between requests in `push-schema --all`.
    pub batch_delay_ms: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            method: PushMethod::N8n,
            webhook_url: None,
            management_token: None,
            space_id: None,
            management_base_url: "https://mapi.storyblok.com/v1".to_string(),
            require_ack: false,
            batch_delay_ms: 500,
        }
    }
}

impl PushConfig {
    /// Per-space management API root, `None` until credentials are configured.
    pub fn space_base_url(&self) -> Option<String> {
        let space = self.space_id.as_deref()?;
        Some(format!(
            "{}/spaces/{space}",
            self.management_base_url.trim_end_matches('/')
        ))
    }
}

/// Review command configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ReviewConfig {
    /// Shell command running the type-checker in the app root.
    pub typecheck_cmd: String,
    /// Shell command running the linter in the app root.
    pub lint_cmd: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            typecheck_cmd: "npm run typecheck".to_string(),
            lint_cmd: "npm run lint".to_string(),
        }
    }
}

/// Content delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    /// Public or preview token (`STORYBLOK_DELIVERY_TOKEN`).
    pub delivery_token: Option<String>,
    /// Content API base url.
    pub cdn_base_url: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            delivery_token: None,
            cdn_base_url: "https://api.storyblok.com/v2".to_string(),
        }
    }
}

/// Registration manifest configuration.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Hand-written wrappers without a stored schema (page types such as
    /// `default-page`). Listed after the stored schemas when their wrapper exists.
    pub extra_components: Vec<String>,
}

impl Settings {
    /// Loads settings from `config_path`, or `.blokgen.toml` in `workspace`.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error. Environment overrides are applied last.
    pub fn load(config_path: Option<&Path>, workspace: &Path) -> anyhow::Result<Self> {
        let (path, explicit) = match config_path {
            Some(p) => (p.to_path_buf(), true),
            None => (workspace.join(DEFAULT_CONFIG_FILE), false),
        };

        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("can not open config file: {}", path.display()))?;
            let parsed: Settings = toml::from_str(&content)
                .with_context(|| format!("invalid config file: {}", path.display()))?;
            debug!("Loaded settings from {}", path.display());
            parsed
        } else if explicit {
            bail!("config file not found: {}", path.display());
        } else {
            Settings::default()
        };

        settings.expand_placeholders();
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Expands `${env:VAR}` placeholders in string values.
    pub fn expand_placeholders(&mut self) {
        let expand = |v: &mut Option<String>| {
            if let Some(s) = v.as_mut() {
                *s = replace_env_placeholders(s);
            }
        };
        expand(&mut self.push.webhook_url);
        expand(&mut self.push.management_token);
        expand(&mut self.push.space_id);
        expand(&mut self.content.delivery_token);
        self.push.management_base_url = replace_env_placeholders(&self.push.management_base_url);
        self.content.cdn_base_url = replace_env_placeholders(&self.content.cdn_base_url);

        // An expanded-but-empty placeholder means "not configured".
        for v in [
            &mut self.push.webhook_url,
            &mut self.push.management_token,
            &mut self.push.space_id,
            &mut self.content.delivery_token,
        ] {
            if v.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *v = None;
            }
        }
    }

    /// Applies the well-known environment variables on top of file values.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get("N8N_WEBHOOK_URL") {
            self.push.webhook_url = Some(v);
        }
        if let Some(v) = get("STORYBLOK_MANAGEMENT_TOKEN") {
            self.push.management_token = Some(v);
        }
        if let Some(v) = get("STORYBLOK_SPACE_ID") {
            self.push.space_id = Some(v);
        }
        if let Some(v) = get("STORYBLOK_DELIVERY_TOKEN") {
            self.content.delivery_token = Some(v);
        }
    }

    /// JSON Schema describing this file format.
    pub fn json_schema() -> anyhow::Result<String> {
        let schema = schemars::schema_for!(Settings);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
