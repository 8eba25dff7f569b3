use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::TransportError;
use crate::types::{Request, Response};

/// What the transport hands back before any formatting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub reason: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Performs one blocking HTTP exchange.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &Request) -> Result<RawResponse, TransportError>;
}

/// Blocking reqwest client with the configured timeouts.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(config: &AppConfig) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(TransportError::from)?;
        Ok(Self {
            client,
            timeout: config.request_timeout,
        })
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        match TransportError::from(err) {
            TransportError::Timeout { detail, .. } => TransportError::Timeout {
                timeout: self.timeout,
                detail,
            },
            other => other,
        }
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method().into(), request.url());

        // `header` appends, so duplicate names go out as separate lines.
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body() {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().map_err(|e| self.classify(e))?;
        let status = response.status();
        // `HeaderMap` groups repeated names, so interleaved duplicates come
        // back adjacent. Values for one name keep their received order.
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().map_err(|e| self.classify(e))?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            headers,
            body,
        })
    }
}

/// Runs exactly one request per call and always produces a `Response`.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn with_config(config: &AppConfig) -> Result<Self, TransportError> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(config)?)))
    }

    /// Blocks on the network. Call it from a background thread only.
    pub fn dispatch(&self, request: &Request) -> Response {
        debug!(method = %request.method(), url = request.url(), "dispatching request");

        let start = Instant::now();
        let result = self.transport.execute(request);
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(raw) => {
                debug!(status = raw.status, elapsed_ms, "request completed");
                let (is_json, display_body) = match format_json(&raw.body) {
                    Some(pretty) => (true, pretty),
                    None => (false, raw.body.clone()),
                };
                Response::Success {
                    status_code: raw.status,
                    reason: raw.reason,
                    elapsed_ms,
                    headers: raw.headers,
                    body: raw.body,
                    is_json,
                    display_body,
                }
            }
            Err(err) => {
                warn!(url = request.url(), elapsed_ms, "request failed: {}", err);
                Response::Failure {
                    message: err.to_string(),
                    elapsed_ms,
                }
            }
        }
    }
}

/// Pretty-prints `body` if it is valid JSON, keeping object key order.
pub fn format_json(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    serde_json::to_string_pretty(&value).ok()
}
