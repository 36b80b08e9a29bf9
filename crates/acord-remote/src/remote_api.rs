use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `RemoteApiError` values.
pub enum RemoteApiError {
    #[error("invalid remote api configuration: {0}")]
    InvalidConfig(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("remote api {route} returned status {status}: {body}")]
    HttpStatus {
        route: String,
        status: u16,
        body: String,
    },
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid response from {route}: {detail}")]
    InvalidResponse { route: String, detail: String },
}

impl RemoteApiError {
    pub fn invalid_response(route: &str, detail: impl Into<String>) -> Self {
        Self::InvalidResponse {
            route: route.to_string(),
            detail: detail.into(),
        }
    }
}

#[async_trait]
/// Trait contract for `RemoteApi` behavior.
///
/// Routes are relative to the API base (`projects/5/tasks/9`). Token handling
/// belongs to the implementation.
pub trait RemoteApi: Send + Sync {
    async fn get(&self, route: &str, query: &[(&str, &str)]) -> Result<Value, RemoteApiError>;

    async fn post(&self, route: &str, body: &Value) -> Result<Value, RemoteApiError>;
}
