//! JSON-over-HTTP transport used by the provider adapters.
//!
//! Adapters build a [`PageRequest`] and hand it to a [`Transport`]. The
//! production implementation is [`HttpTransport`]; tests use
//! [`crate::testing::MockTransport`].

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::HttpConfig;
use crate::error::{TransportError, TransportResult};
use crate::security::ApiKey;

/// A GET request for one page of search results.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub url: String,
    pub query: Vec<(&'static str, String)>,
    /// Header values are secret and never logged.
    pub headers: Vec<(&'static str, ApiKey)>,
}

impl PageRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
        }
    }

    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    pub fn header(mut self, name: &'static str, value: ApiKey) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Value of a query parameter, if set.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Fetches a request and parses the body as JSON.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, request: &PageRequest) -> TransportResult<Value>;
}

/// reqwest-backed transport with timeout and retry.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpConfig,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Network(Box::new(e)))?;

        Ok(Self { client, config })
    }

    async fn get_once(&self, request: &PageRequest) -> TransportResult<Value> {
        let mut builder = self.client.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.expose());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify(e, &request.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify(e, &request.url))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

fn classify(error: reqwest::Error, url: &str) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout {
            url: url.to_string(),
        }
    } else {
        TransportError::Network(Box::new(error))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, request: &PageRequest) -> TransportResult<Value> {
        let mut attempt = 0;

        loop {
            debug!(url = %request.url, query = ?request.query, attempt, "GET");

            match self.get_once(request).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff(attempt);
                    warn!(
                        url = %request.url,
                        error = %e,
                        retry = attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Request failed, retrying"
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
