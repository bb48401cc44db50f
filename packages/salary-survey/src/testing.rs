//! Test doubles for the transport and adapter seams.
//!
//! Useful for exercising the pipeline without talking to real job boards.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::error::{TransportError, TransportResult};
use crate::providers::ProviderAdapter;
use crate::transport::{PageRequest, Transport};
use crate::types::{CollectedPostings, SearchTerm};

/// Query parameters the adapters use for the search term.
const TERM_PARAMS: [&str; 2] = ["text", "keyword"];

#[derive(Clone)]
enum Scripted {
    Body(Value),
    Status(u16),
}

/// A transport that answers from canned JSON pages.
///
/// Pages are keyed by the `page` query parameter, optionally narrowed to a
/// search term. Requests are recorded for assertions. Clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    pages: Arc<RwLock<HashMap<(Option<String>, u32), Scripted>>>,
    requests: Arc<RwLock<Vec<PageRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `page` regardless of the term.
    pub fn with_page(self, page: u32, body: Value) -> Self {
        self.script(None, page, Scripted::Body(body))
    }

    /// Serve `body` for `page` of one term.
    pub fn with_term_page(self, term: &str, page: u32, body: Value) -> Self {
        self.script(Some(term.to_string()), page, Scripted::Body(body))
    }

    /// Answer `page` with an HTTP error status.
    pub fn with_failure(self, page: u32, status: u16) -> Self {
        self.script(None, page, Scripted::Status(status))
    }

    fn script(self, term: Option<String>, page: u32, response: Scripted) -> Self {
        self.pages.write().unwrap().insert((term, page), response);
        self
    }

    /// All requests made so far.
    pub fn requests(&self) -> Vec<PageRequest> {
        self.requests.read().unwrap().clone()
    }

    /// Page indices requested, in order.
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requests()
            .iter()
            .filter_map(|r| r.query_value("page")?.parse().ok())
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get_json(&self, request: &PageRequest) -> TransportResult<Value> {
        self.requests.write().unwrap().push(request.clone());

        let page: u32 = request
            .query_value("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(0);
        let term = TERM_PARAMS
            .iter()
            .find_map(|name| request.query_value(name))
            .map(str::to_string);

        let pages = self.pages.read().unwrap();
        let scripted = pages
            .get(&(term, page))
            .or_else(|| pages.get(&(None, page)))
            .cloned();

        match scripted {
            Some(Scripted::Body(body)) => Ok(body),
            Some(Scripted::Status(status)) => Err(TransportError::Status {
                status,
                url: request.url.clone(),
            }),
            None => Err(TransportError::Status {
                status: 404,
                url: request.url.clone(),
            }),
        }
    }
}

#[derive(Clone)]
enum Outcome {
    Postings(CollectedPostings),
    Failure(u16),
}

/// An adapter that returns canned postings per term.
///
/// Unknown terms yield an empty result set.
#[derive(Clone)]
pub struct MockAdapter {
    label: String,
    currency: String,
    outcomes: Arc<RwLock<HashMap<String, Outcome>>>,
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockAdapter {
    pub fn new(label: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            currency: currency.into(),
            outcomes: Arc::default(),
            delays: Arc::default(),
            calls: Arc::default(),
        }
    }

    /// Return `postings` for `term`.
    pub fn with_postings(self, term: &str, postings: CollectedPostings) -> Self {
        self.outcomes
            .write()
            .unwrap()
            .insert(term.to_string(), Outcome::Postings(postings));
        self
    }

    /// Fail `term` with an HTTP error status.
    pub fn with_failure(self, term: &str, status: u16) -> Self {
        self.outcomes
            .write()
            .unwrap()
            .insert(term.to_string(), Outcome::Failure(status));
        self
    }

    /// Delay the answer for `term`.
    pub fn with_delay(self, term: &str, delay: Duration) -> Self {
        self.delays.write().unwrap().insert(term.to_string(), delay);
        self
    }

    /// Terms fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn label(&self) -> &str {
        &self.label
    }

    fn target_currency(&self) -> &str {
        &self.currency
    }

    async fn fetch_all(&self, term: &SearchTerm) -> TransportResult<CollectedPostings> {
        self.calls.write().unwrap().push(term.to_string());

        let delay = self.delays.read().unwrap().get(term.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.outcomes.read().unwrap().get(term.as_str()).cloned();
        match outcome {
            Some(Outcome::Postings(postings)) => Ok(postings),
            Some(Outcome::Failure(status)) => Err(TransportError::Status {
                status,
                url: format!("mock://{}", self.label),
            }),
            None => Ok(CollectedPostings::empty()),
        }
    }
}
