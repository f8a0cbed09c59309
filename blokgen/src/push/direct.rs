//! Management API transport.
//!
//! A component is addressed by the id remembered in the [`RemoteIds`]
//! sidecar when one exists. Otherwise the component list is scanned by name.
//! The component is updated when found and created when not.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{Value, json};

use super::{
    PushOutcome,
    remote_ids::{RemoteIds, id_string, smallest_id},
};

/// Management API client for one space.
pub struct DirectClient<'a> {
    http: &'a reqwest::Client,
    space_url: String,
    token: &'a str,
}

enum Update {
    Done(PushOutcome),
    /// The stored id no longer exists remotely.
    Gone,
}

impl<'a> DirectClient<'a> {
    pub fn new(http: &'a reqwest::Client, space_url: String, token: &'a str) -> Self {
        Self {
            http,
            space_url,
            token,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.space_url);
        debug!("{method} {url}");
        self.http
            .request(method, url)
            .header("Authorization", self.token)
    }

    /// Creates or updates component `name`, recording its id in `ids`.
    pub async fn push(&self, name: &str, schema: &Value, ids: &mut RemoteIds) -> PushOutcome {
        let outcome = match self.push_inner(name, schema, ids).await {
            Ok(outcome) => outcome,
            Err(e) => PushOutcome::failed(format!("Error: {e}")),
        };
        if outcome.success
            && let Some(id) = &outcome.component_id
        {
            ids.insert(name, id.clone());
            if let Err(e) = ids.save() {
                warn!("Could not record remote id for '{name}': {e:#}");
            }
        }
        outcome
    }

    async fn push_inner(
        &self,
        name: &str,
        schema: &Value,
        ids: &mut RemoteIds,
    ) -> Result<PushOutcome, reqwest::Error> {
        if let Some(id) = ids.get(name).map(str::to_string) {
            match self.update(name, &id, schema).await? {
                Update::Done(outcome) => return Ok(outcome),
                Update::Gone => {
                    info!("Remote id {id} for '{name}' is gone, looking the component up by name");
                    ids.remove(name);
                    if let Err(e) = ids.save() {
                        warn!("Could not update remote id sidecar: {e:#}");
                    }
                }
            }
        }

        let response = self.request(Method::GET, "/components").send().await?;
        if !response.status().is_success() {
            let body = response.text().await?;
            return Ok(PushOutcome::failed(format!(
                "Failed to list components: {body}"
            )));
        }
        let listing: Value = response.json().await?;

        match find_by_name(&listing, name) {
            Some(id) => match self.update(name, &id, schema).await? {
                Update::Done(outcome) => Ok(outcome),
                Update::Gone => Ok(PushOutcome::failed(format!(
                    "Failed to update component: component {id} not found"
                ))),
            },
            None => self.create(name, schema).await,
        }
    }

    async fn update(&self, name: &str, id: &str, schema: &Value) -> Result<Update, reqwest::Error> {
        let response = self
            .request(Method::PUT, &format!("/components/{id}"))
            .json(&json!({ "component": schema }))
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(Update::Gone);
        }
        let body = response.text().await?;
        if !status.is_success() {
            return Ok(Update::Done(PushOutcome::failed(format!(
                "Failed to update component: {body}"
            ))));
        }
        let component_id = returned_id(&body).unwrap_or_else(|| id.to_string());
        Ok(Update::Done(
            PushOutcome::ok(format!("Component '{name}' updated successfully"))
                .with_id(Some(component_id)),
        ))
    }

    async fn create(&self, name: &str, schema: &Value) -> Result<PushOutcome, reqwest::Error> {
        let response = self
            .request(Method::POST, "/components")
            .json(schema)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Ok(PushOutcome::failed(format!(
                "Failed to create component: {body}"
            )));
        }
        Ok(
            PushOutcome::ok(format!("Component '{name}' created successfully"))
                .with_id(returned_id(&body)),
        )
    }
}

/// `component.id` from a create/update reply body.
fn returned_id(body: &str) -> Option<String> {
    let reply: Value = serde_json::from_str(body).ok()?;
    reply.get("component")?.get("id").and_then(id_string)
}

/// Id of the remote component called `name`; the smallest id when several match.
pub fn find_by_name(listing: &Value, name: &str) -> Option<String> {
    let components = listing.get("components")?.as_array()?;
    smallest_id(
        components
            .iter()
            .filter(|c| c.get("name").and_then(Value::as_str) == Some(name))
            .filter_map(|c| c.get("id").and_then(id_string)),
    )
}
