//! reqwest-backed [`ResourceClient`] for the order-management API.

use async_trait::async_trait;
use depot_core::{ResourceClient, ResourceError, ResourceMethod};
use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::StoreError;

#[derive(Debug, Clone)]
pub struct HttpResourceClient {
    client: Client,
    base_url: String,
}

impl HttpResourceClient {
    pub fn new(base_url: impl Into<String>, timeout_seconds: u64) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn method(method: ResourceMethod) -> Method {
    match method {
        ResourceMethod::Get => Method::GET,
        ResourceMethod::Post => Method::POST,
        ResourceMethod::Patch => Method::PATCH,
        ResourceMethod::Delete => Method::DELETE,
    }
}

/// Server-supplied message from an error body: `{"error": ...}` or
/// `{"message": ...}`, else the raw text when there is any.
fn error_message(body: &str) -> Option<String> {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error", "message"]
            .iter()
            .find_map(|field| v.get(*field).and_then(Value::as_str).map(str::to_string))
    });
    from_json.or_else(|| {
        let text = body.trim();
        (!text.is_empty() && !text.starts_with('{')).then(|| text.to_string())
    })
}

#[async_trait]
impl ResourceClient for HttpResourceClient {
    async fn send(&self, verb: ResourceMethod, path: &str, body: Option<Value>) -> Result<Value, ResourceError> {
        let url = self.url(path);
        debug!("{} {}", verb, url);

        let mut request = self.client.request(method(verb), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ResourceError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ResourceError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ResourceError::Decode(e.to_string()))
    }
}
