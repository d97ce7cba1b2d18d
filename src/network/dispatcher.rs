//! Concurrent request fan-out with per-endpoint failure isolation

use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;
use std::time::Duration;

/// One outbound request in a batch
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
}

impl RequestSpec {
    /// GET request with no body
    pub fn get(uri: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            uri: uri.into(),
            headers: Vec::new(),
            body: None,
            timeout,
        }
    }

    /// POST request with a JSON body
    pub fn post_json(uri: impl Into<String>, body: Value, timeout: Duration) -> Self {
        Self {
            method: Method::POST,
            uri: uri.into(),
            headers: Vec::new(),
            body: Some(body),
            timeout,
        }
    }

    /// Add an extra header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Outcome of one dispatched request
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Scheme and host of the requested URI, path stripped
    pub origin_uri: String,

    /// Parsed response body, or the reason the request failed
    pub outcome: Result<Value, FetchError>,
}

impl FetchResult {
    pub fn response(&self) -> Option<&Value> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Issues batches of independent HTTP requests
#[derive(Debug, Clone)]
pub struct EndpointDispatcher {
    client: reqwest::Client,
}

impl EndpointDispatcher {
    /// Create a dispatcher with a fresh HTTP client
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::InvalidRequest(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Create a dispatcher over an existing HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Issue every request concurrently and wait for all of them to settle
    ///
    /// Returns exactly one result per request, in input order.
    pub async fn dispatch(&self, requests: Vec<RequestSpec>) -> Vec<FetchResult> {
        let total = requests.len();
        let results =
            futures::future::join_all(requests.into_iter().map(|spec| self.fetch(spec))).await;

        let failed = results.iter().filter(|r| !r.is_success()).count();
        tracing::debug!(total, failed, "Dispatch batch settled");

        results
    }

    /// Issue a single request
    pub async fn fetch(&self, spec: RequestSpec) -> FetchResult {
        let origin_uri = origin_of(&spec.uri);
        let outcome = self.send(spec).await;
        FetchResult {
            origin_uri,
            outcome,
        }
    }

    /// GET a JSON document
    pub async fn fetch_json(&self, uri: &str, timeout: Duration) -> Result<Value, FetchError> {
        self.send(RequestSpec::get(uri, timeout)).await
    }

    /// Check whether an endpoint answers with a 2xx status
    pub async fn probe(&self, uri: &str, timeout: Duration) -> bool {
        match self.send(RequestSpec::get(uri, timeout)).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(uri = %uri, error = %e, "Endpoint probe failed");
                false
            }
        }
    }

    async fn send(&self, spec: RequestSpec) -> Result<Value, FetchError> {
        let url = Url::parse(&spec.uri)
            .map_err(|e| FetchError::InvalidRequest(format!("{}: {}", spec.uri, e)))?;
        let timeout_ms = spec.timeout.as_millis() as u64;
        let headers = build_headers(&spec.headers)?;

        tracing::debug!(method = %spec.method, uri = %spec.uri, "Dispatching request");

        let mut request = self
            .client
            .request(spec.method, url)
            .headers(headers)
            .timeout(spec.timeout);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout_ms))?;

        Ok(parse_body(&text))
    }
}

fn build_headers(extra: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| FetchError::InvalidRequest(format!("header {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| FetchError::InvalidRequest(format!("header {name}: {e}")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Empty bodies become `null`, non-JSON bodies become a JSON string
fn parse_body(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(trimmed).unwrap_or_else(|_| Value::String(trimmed.to_string()))
}

/// Scheme and host (with explicit port) of a URI
pub fn origin_of(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) if url.has_host() => url.origin().ascii_serialization(),
        _ => uri.to_string(),
    }
}
