//! SuperJob (api.superjob.ru) adapter.
//!
//! Has-more pagination: every response carries `more` and `total`. Salary
//! bounds are plain integers where 0 means "not specified"; they are turned
//! into `None` here so the rest of the pipeline never sees the sentinel.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::SuperJobConfig;
use crate::error::{ConfigError, TransportResult};
use crate::providers::{collect_pages, PageSource, ProviderAdapter};
use crate::salary::SalaryRange;
use crate::transport::{PageRequest, Transport};
use crate::types::{CollectedPostings, Continuation, PageResult, RawPosting, SearchTerm};

const APP_ID_HEADER: &str = "X-Api-App-Id";

#[derive(Debug, Deserialize)]
struct VacancyPage {
    objects: Vec<Vacancy>,
    more: bool,
    total: u64,
}

#[derive(Debug, Deserialize)]
struct Vacancy {
    #[serde(default)]
    payment_from: Option<u64>,
    #[serde(default)]
    payment_to: Option<u64>,
    #[serde(default)]
    currency: Option<String>,
}

fn specified(bound: Option<u64>) -> Option<u64> {
    bound.filter(|&value| value != 0)
}

impl From<Vacancy> for RawPosting {
    fn from(v: Vacancy) -> Self {
        RawPosting {
            salary: Some(SalaryRange {
                from: specified(v.payment_from),
                to: specified(v.payment_to),
                currency: v.currency,
            }),
        }
    }
}

/// SuperJob vacancy search.
pub struct SuperJob {
    config: SuperJobConfig,
    transport: Arc<dyn Transport>,
}

impl SuperJob {
    /// Fails if the API key is blank, before any request is made.
    pub fn new(config: SuperJobConfig, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    fn request(&self, term: &SearchTerm, page: u32) -> PageRequest {
        let mut request = PageRequest::get(&self.config.base_url)
            .param("town", self.config.town)
            .param("keyword", term)
            .param("page", page)
            .header(APP_ID_HEADER, self.config.api_key.clone());

        if let Some(count) = self.config.per_page {
            request = request.param("count", count);
        }
        request
    }
}

#[async_trait]
impl PageSource for SuperJob {
    async fn fetch_page(&self, term: &SearchTerm, page: u32) -> TransportResult<PageResult> {
        let body = self.transport.get_json(&self.request(term, page)).await?;
        let parsed: VacancyPage = serde_json::from_value(body)?;

        Ok(PageResult {
            postings: parsed.objects.into_iter().map(RawPosting::from).collect(),
            reported_total: parsed.total,
            continuation: Continuation::HasMore(parsed.more),
        })
    }
}

#[async_trait]
impl ProviderAdapter for SuperJob {
    fn label(&self) -> &str {
        &self.config.label
    }

    fn target_currency(&self) -> &str {
        &self.config.currency
    }

    async fn fetch_all(&self, term: &SearchTerm) -> TransportResult<CollectedPostings> {
        collect_pages(self, term, self.config.max_pages).await
    }
}
