//! HeadHunter (api.hh.ru) adapter.
//!
//! Paged-count pagination: every response carries `pages` and `found`.
//! Salary is an optional object whose bounds and currency may each be null.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::HeadHunterConfig;
use crate::error::{ConfigError, TransportResult};
use crate::providers::{collect_pages, PageSource, ProviderAdapter};
use crate::salary::SalaryRange;
use crate::transport::{PageRequest, Transport};
use crate::types::{CollectedPostings, Continuation, PageResult, RawPosting, SearchTerm};

#[derive(Debug, Deserialize)]
struct VacancyPage {
    items: Vec<Vacancy>,
    pages: u32,
    found: u64,
}

#[derive(Debug, Deserialize)]
struct Vacancy {
    #[serde(default)]
    salary: Option<Salary>,
}

#[derive(Debug, Deserialize)]
struct Salary {
    #[serde(default)]
    from: Option<u64>,
    #[serde(default)]
    to: Option<u64>,
    #[serde(default)]
    currency: Option<String>,
}

impl From<Vacancy> for RawPosting {
    fn from(v: Vacancy) -> Self {
        RawPosting {
            salary: v.salary.map(|s| SalaryRange {
                from: s.from,
                to: s.to,
                currency: s.currency,
            }),
        }
    }
}

/// HeadHunter vacancy search.
pub struct HeadHunter {
    config: HeadHunterConfig,
    transport: Arc<dyn Transport>,
}

impl HeadHunter {
    pub fn new(config: HeadHunterConfig, transport: Arc<dyn Transport>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    fn request(&self, term: &SearchTerm, page: u32) -> PageRequest {
        PageRequest::get(&self.config.base_url)
            .param("text", term)
            .param("area", self.config.area)
            .param("enable_snippets", self.config.enable_snippets)
            .param("page", page)
            .param("per_page", self.config.per_page)
    }
}

#[async_trait]
impl PageSource for HeadHunter {
    async fn fetch_page(&self, term: &SearchTerm, page: u32) -> TransportResult<PageResult> {
        let body = self.transport.get_json(&self.request(term, page)).await?;
        let parsed: VacancyPage = serde_json::from_value(body)?;

        Ok(PageResult {
            postings: parsed.items.into_iter().map(RawPosting::from).collect(),
            reported_total: parsed.found,
            continuation: Continuation::PageCount(parsed.pages),
        })
    }
}

#[async_trait]
impl ProviderAdapter for HeadHunter {
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
