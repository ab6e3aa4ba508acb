//! HTTP transport and error normalization

use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Connection settings for the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: concat!("ward/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A fully prepared request, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Sends requests and returns the decoded body.
///
/// Implementations must report every failure as [`Error::Api`] with the
/// message already extracted from the server's error payload.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// Transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::Config("base_url must not be empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = extract_error_message(&bytes, status);
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                status = status.as_u16(),
                message = %message,
                "Request rejected"
            );
            return Err(Error::Api {
                status: Some(status.as_u16()),
                message,
            });
        }

        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "Request completed"
        );

        Ok(success_body(&bytes))
    }
}

/// Body of a 2xx response. Empty is `null`; text that is not JSON is kept as
/// a string and left for the caller's typed decode to accept or reject.
fn success_body(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Pull a human-readable message out of an error response.
///
/// Endpoints disagree on the payload shape, so `message`, `error.message` and a
/// bare string `error` are all accepted. Anything else falls back to the status
/// text.
pub fn extract_error_message(body: &[u8], status: StatusCode) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .as_ref()
        .and_then(message_from_payload)
        .unwrap_or_else(|| status_text(status))
}

fn message_from_payload(payload: &Value) -> Option<String> {
    let as_string = |v: Option<&Value>| v.and_then(Value::as_str).map(str::to_string);

    as_string(payload.get("message"))
        .or_else(|| as_string(payload.get("error").and_then(|e| e.get("message"))))
        .or_else(|| as_string(payload.get("error")))
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Request failed with status {}: {reason}", status.as_u16()),
        None => format!("Request failed with status {}", status.as_u16()),
    }
}
