//! Remote schema push.
//!
//! Two transports deliver a stored schema to the CMS:
//!
//! - [`webhook`] - POST to a workflow-automation webhook
//! - [`direct`] - create or update through the management API
//!
//! Pushing never returns `Err` for remote or validation problems: every
//! failure is reported through [`PushOutcome`].

use std::time::Duration;

use colored::Colorize;

use crate::{
    config::{PushConfig, PushMethod},
    schema::{
        store::{SchemaStore, StoreError},
        validator::validate_schema_file,
    },
};

pub mod direct;
pub mod remote_ids;
pub mod webhook;

use remote_ids::RemoteIds;

/// Options for one push.
#[derive(Debug, Clone, Copy)]
pub struct PushOptions {
    /// Validate the stored schema first; failures stop before any network I/O.
    pub validate: bool,
    pub method: PushMethod,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            validate: true,
            method: PushMethod::N8n,
        }
    }
}

/// Result of pushing one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushOutcome {
    pub success: bool,
    pub component_id: Option<String>,
    pub message: String,
}

impl PushOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            component_id: None,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            component_id: None,
            message: message.into(),
        }
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.component_id = id;
        self
    }

    /// Prints the outcome as a status line.
    pub fn print(&self) {
        if self.success {
            println!("   {} {}", "ok:".green(), self.message);
            if let Some(id) = &self.component_id {
                println!("   Component ID: {id}");
            }
        } else {
            println!("   {} {}", "failed:".red(), self.message);
        }
    }
}

/// Counts from [`PushClient::push_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PushSummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Pushes schemas from a store using the configured transports.
pub struct PushClient<'a> {
    http: reqwest::Client,
    config: &'a PushConfig,
    store: &'a SchemaStore,
}

impl<'a> PushClient<'a> {
    pub fn new(config: &'a PushConfig, store: &'a SchemaStore) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| anyhow!("Failed to create HTTP client: {e}"))?;
        Ok(Self {
            http,
            config,
            store,
        })
    }

    /// Pushes the stored schema `name`.
    pub async fn push(&self, name: &str, options: PushOptions) -> PushOutcome {
        if options.validate {
            let report = validate_schema_file(name, self.store);
            if !report.is_valid() {
                println!("   {} for {name}:", "Validation failed".red());
                for (i, error) in report.errors.iter().enumerate() {
                    println!("   {}. {error}", i + 1);
                }
                return PushOutcome::failed("Validation failed");
            }
            println!("   {}", "Validation passed".green());
        }

        let schema = match self.store.load_raw(name) {
            Ok(stored) => stored.value,
            Err(e @ StoreError::NotFound { .. }) => return PushOutcome::failed(e.to_string()),
            Err(e) => return PushOutcome::failed(format!("Error: {e}")),
        };

        match options.method {
            PushMethod::N8n => {
                let Some(url) = self.config.webhook_url.as_deref() else {
                    return PushOutcome::failed("N8N_WEBHOOK_URL not set in environment variables");
                };
                webhook::push(&self.http, url, &schema, self.config.require_ack).await
            }
            PushMethod::Direct => {
                let (Some(token), Some(space_url)) = (
                    self.config.management_token.as_deref(),
                    self.config.space_base_url(),
                ) else {
                    return PushOutcome::failed(
                        "STORYBLOK_MANAGEMENT_TOKEN or STORYBLOK_SPACE_ID not set",
                    );
                };
                let mut ids = RemoteIds::load(self.store.root());
                direct::DirectClient::new(&self.http, space_url, token)
                    .push(name, &schema, &mut ids)
                    .await
            }
        }
    }

    /// Pushes every stored schema in sequence, pausing between requests.
    pub async fn push_all(&self, options: PushOptions) -> anyhow::Result<PushSummary> {
        let names = self.store.list()?;
        let delay = Duration::from_millis(self.config.batch_delay_ms);
        let mut summary = PushSummary::default();

        for (i, (category, name)) in names.iter().enumerate() {
            if i > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            println!("{}", format!("Pushing {category}/{name}").bold());
            let outcome = self.push(name, options).await;
            outcome.print();
            if outcome.success {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        println!("\nSummary:");
        println!("   {} {}", "Success:".green(), summary.succeeded);
        println!("   {} {}", "Failed:".red(), summary.failed);
        Ok(summary)
    }
}
