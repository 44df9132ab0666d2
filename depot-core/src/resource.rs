use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl fmt::Display for ResourceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceMethod::Get => "GET",
            ResourceMethod::Post => "POST",
            ResourceMethod::Patch => "PATCH",
            ResourceMethod::Delete => "DELETE",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("Request rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Could not encode request: {0}")]
    Encode(String),

    #[error("Could not decode response: {0}")]
    Decode(String),
}

impl ResourceError {
    /// Message supplied by the server, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ResourceError::Rejected { message: Some(m), .. } if !m.trim().is_empty() => {
                Some(m.as_str())
            }
            _ => None,
        }
    }
}

/// Generic "method + path + JSON body → JSON body" collaborator.
///
/// One call, no retry. Implementations decide transport and authentication.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn send(
        &self,
        method: ResourceMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ResourceError>;
}

/// POST `body` to `path` and decode the created resource.
pub async fn create_resource<B, T>(
    client: &dyn ResourceClient,
    path: &str,
    body: &B,
) -> Result<T, ResourceError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = serde_json::to_value(body).map_err(|e| ResourceError::Encode(e.to_string()))?;
    let response = client.send(ResourceMethod::Post, path, Some(body)).await?;
    serde_json::from_value(response).map_err(|e| ResourceError::Decode(e.to_string()))
}

/// GET `path` and decode the body.
pub async fn fetch_resource<T>(client: &dyn ResourceClient, path: &str) -> Result<T, ResourceError>
where
    T: DeserializeOwned,
{
    let response = client.send(ResourceMethod::Get, path, None).await?;
    serde_json::from_value(response).map_err(|e| ResourceError::Decode(e.to_string()))
}
