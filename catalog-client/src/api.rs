//! API gateway - request/response plumbing against the catalog backend
//!
//! Every operation is a single round-trip against one fixed base URL:
//! no caching, no retry, no idempotency key. Each call holds an
//! [`InFlight`](crate::track::InFlight) guard for its whole duration,
//! which feeds the console's busy indicator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ClientConfig, ClientError, ClientResult, RequestTracker};

/// HTTP method for an [`ApiRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// One backend round-trip, JSON in and JSON out
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach the bearer token, when one is configured
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: false,
        }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }
}

/// Transport seam
///
/// Object-safe so tests (and any non-HTTP harness) can substitute an
/// in-memory implementation; typed decoding lives in [`ApiGateway`].
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> ClientResult<serde_json::Value>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> ClientResult<serde_json::Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await?;
            // Per-status dispatch. A hook for future recovery; today
            // every arm logs and the call is rejected.
            match status.as_u16() {
                400 => tracing::warn!(status = 400, %message, "bad request"),
                403 => tracing::warn!(status = 403, %message, "forbidden"),
                404 => tracing::warn!(status = 404, %message, "not found"),
                500 => tracing::error!(status = 500, %message, "server error"),
                code => tracing::warn!(status = code, %message, "request failed"),
            }
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        // DELETE responses may come back bodyless
        let text = response.text().await?;
        if text.is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> ClientResult<serde_json::Value> {
        let url = self.url(&request.path);
        let mut req = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }
        if request.authenticated {
            if let Some(token) = &self.config.token {
                req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
            }
        }
        let response = req.send().await?;
        self.handle_response(response).await
    }
}

/// Typed facade over the transport
#[derive(Clone)]
pub struct ApiGateway {
    transport: Arc<dyn ApiTransport>,
    tracker: RequestTracker,
}

impl ApiGateway {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Build a gateway over any transport (tests use an in-memory one)
    pub fn with_transport(transport: Arc<dyn ApiTransport>) -> Self {
        Self {
            transport,
            tracker: RequestTracker::new(),
        }
    }

    /// The busy-signal source for this gateway's callers
    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        authenticated: bool,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let query = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        let request = ApiRequest::new(Method::Get, path)
            .with_query(query)
            .authenticated(authenticated);
        self.execute(request).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = ApiRequest::new(Method::Post, path).with_body(serde_json::to_value(body)?);
        self.execute(request).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = ApiRequest::new(Method::Put, path).with_body(serde_json::to_value(body)?);
        self.execute(request).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        authenticated: bool,
    ) -> ClientResult<T> {
        let request = ApiRequest::new(Method::Delete, path).authenticated(authenticated);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        // Held across the await: the count settles when the call does.
        let _in_flight = self.tracker.begin();
        let value = self.transport.execute(request).await?;
        Ok(serde_json::from_value(value)?)
    }
}
