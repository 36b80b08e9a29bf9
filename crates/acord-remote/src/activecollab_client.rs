//! reqwest-backed ActiveCollab API client.

use std::time::Duration;

use acord_contract::{truncate_for_error, ERROR_BODY_MAX_CHARS};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;

use crate::remote_api::{RemoteApi, RemoteApiError};

const AUTH_TOKEN_HEADER: &str = "x-angie-authapitoken";

#[derive(Debug, Clone)]
/// Public struct `ActiveCollabClientConfig` used across acord components.
pub struct ActiveCollabClientConfig {
    pub api_base: String,
    pub token: String,
    pub request_timeout_ms: u64,
}

#[derive(Clone)]
/// Public struct `ActiveCollabClient` used across acord components.
pub struct ActiveCollabClient {
    http: reqwest::Client,
    api_base: String,
}

impl ActiveCollabClient {
    pub fn new(config: &ActiveCollabClientConfig) -> Result<Self, RemoteApiError> {
        let api_base = config.api_base.trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(RemoteApiError::InvalidConfig(
                "api base url cannot be empty".to_string(),
            ));
        }
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("acord-bridge"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let token = HeaderValue::from_str(config.token.trim())
            .map_err(|_| RemoteApiError::InvalidConfig("invalid api token header".to_string()))?;
        headers.insert(AUTH_TOKEN_HEADER, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms.max(1)))
            .build()?;
        Ok(Self { http, api_base })
    }

    fn route_url(&self, route: &str) -> String {
        format!("{}/{}", self.api_base, route.trim_start_matches('/'))
    }

    async fn send_json(
        &self,
        route: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Value, RemoteApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(route, status = status.as_u16(), "remote api request failed");
            return Err(RemoteApiError::HttpStatus {
                route: route.to_string(),
                status: status.as_u16(),
                body: truncate_for_error(&body, ERROR_BODY_MAX_CHARS),
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RemoteApi for ActiveCollabClient {
    async fn get(&self, route: &str, query: &[(&str, &str)]) -> Result<Value, RemoteApiError> {
        let request = self.http.get(self.route_url(route)).query(query);
        self.send_json(route, request).await
    }

    async fn post(&self, route: &str, body: &Value) -> Result<Value, RemoteApiError> {
        let request = self.http.post(self.route_url(route)).json(body);
        self.send_json(route, request).await
    }
}
