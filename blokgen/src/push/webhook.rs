//! Workflow-automation webhook transport.

use serde_json::Value;

use super::PushOutcome;

/// POSTs `schema` to `url` and interprets the reply.
pub async fn push(
    http: &reqwest::Client,
    url: &str,
    schema: &Value,
    require_ack: bool,
) -> PushOutcome {
    debug!("POST {url}");
    let response = match http.post(url).json(schema).send().await {
        Ok(r) => r,
        Err(e) => return PushOutcome::failed(format!("Error: {e}")),
    };
    let status = response.status();
    match response.text().await {
        Ok(body) => interpret_response(status.as_u16(), &body, require_ack),
        Err(e) => PushOutcome::failed(format!("Error: {e}")),
    }
}

/// Maps a webhook reply to an outcome.
///
/// Without `require_ack` an empty or non-JSON 2xx body counts as success;
/// with it, only a JSON body with `success` not set to `false` does.
pub fn interpret_response(status: u16, body: &str, require_ack: bool) -> PushOutcome {
    if !(200..300).contains(&status) {
        return PushOutcome::failed(format!("HTTP {status}: {body}"));
    }

    if body.trim().is_empty() {
        if require_ack {
            return PushOutcome::failed(format!(
                "Webhook returned an empty response (HTTP {status}) and require_ack is set"
            ));
        }
        warn!("Webhook returned an empty body, assuming the schema was applied");
        return PushOutcome::ok("Schema pushed successfully (n8n returned empty response)");
    }

    match serde_json::from_str::<Value>(body) {
        Ok(reply) => {
            let success = reply.get("success").and_then(Value::as_bool) != Some(false);
            let message = reply
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Schema pushed successfully")
                .to_string();
            PushOutcome {
                success,
                component_id: reply.get("componentId").and_then(super::remote_ids::id_string),
                message,
            }
        }
        Err(_) if require_ack => PushOutcome::failed(format!(
            "Webhook returned a non-JSON response (HTTP {status}) and require_ack is set"
        )),
        Err(_) => {
            warn!("Webhook returned a non-JSON body, assuming the schema was applied");
            PushOutcome::ok(format!("Schema pushed (HTTP {status})"))
        }
    }
}
