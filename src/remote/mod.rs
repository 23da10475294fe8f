//! Access to the content API.
//!
//! The core talks to the API only through the [`ContentApi`] trait. Requests
//! carry fully resolved URLs built by [`Routes`], so an implementation never
//! needs to know which endpoint convention a deployment follows.

pub mod endpoints;
pub mod error;

use std::future::Future;
use std::time::Instant;

use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretBox};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{FolioError, Result};

pub use endpoints::{ApiRequest, Endpoints, Routes, Verb};
pub use error::ApiError;

/// Common interface for content API transports
pub trait ContentApi: Send + Sync {
    /// GET a URL and parse the body as JSON.
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;

    /// Issue a mutation. Resolves to the parsed response body, or `Null` for
    /// an empty body.
    fn send(&self, request: ApiRequest) -> impl Future<Output = Result<Value>> + Send;
}

/// Race a request against a cancellation token.
///
/// When the token fires first the request future is dropped and
/// `FolioError::Cancelled` is returned.
pub async fn cancellable<T>(
    token: &CancellationToken,
    request: impl Future<Output = Result<T>>,
) -> Result<T> {
    if token.is_cancelled() {
        return Err(FolioError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(FolioError::Cancelled),
        result = request => result,
    }
}

/// reqwest-backed transport
pub struct HttpApi {
    client: Client,
    token: Option<SecretBox<String>>,
}

impl HttpApi {
    pub fn new(token: Option<String>) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            token: token.map(|t| SecretBox::new(Box::new(t))),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.token())
    }

    async fn execute(&self, verb: Verb, url: &str, body: Option<&Value>) -> Result<Value> {
        let started = Instant::now();
        tracing::debug!(method = ?verb, url, "request");

        let mut builder = self
            .client
            .request(verb.as_method(), url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(ApiError::from)?;

        tracing::debug!(
            method = ?verb,
            url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "response"
        );

        if !status.is_success() {
            let error = ApiError::from_response(status, &text);
            if error.is_server_error() {
                tracing::warn!(url, status = status.as_u16(), "server error: {error}");
            }
            return Err(error.into());
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| FolioError::SchemaInvalid(format!("response is not valid JSON: {e}")))
    }
}

impl ContentApi for HttpApi {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.execute(Verb::Get, url, None).await
    }

    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let body = self
            .execute(request.verb, &request.url, request.body.as_ref())
            .await?;
        reject_not_ok(body)
    }
}

/// A 2xx response that still reports `{"ok": false}` is a failure.
pub(crate) fn reject_not_ok(body: Value) -> Result<Value> {
    if body.get("ok").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request was rejected by the server")
            .to_string();
        return Err(FolioError::network(None, message));
    }
    Ok(body)
}
