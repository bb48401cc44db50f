//! Runs every (provider, term) pair and assembles per-provider reports.
//!
//! Traversals are independent. With `concurrency > 1` they run as a bounded
//! set of futures; the pages of one traversal are still fetched in order, and
//! results are slotted back by index so report order always follows the
//! requested term order.

use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{FailurePolicy, RunConfig};
use crate::error::{ConfigError, Result, SurveyError, TransportError, TransportResult};
use crate::providers::ProviderAdapter;
use crate::stats::summarize;
use crate::types::{ProviderReport, SearchTerm, TermSummary};

/// Collect and summarize one term against one provider.
pub async fn survey_term(
    adapter: &dyn ProviderAdapter,
    term: &SearchTerm,
) -> TransportResult<TermSummary> {
    let collected = adapter.fetch_all(term).await?;
    let summary = summarize(&collected, adapter.target_currency());

    info!(
        provider = adapter.label(),
        term = %term,
        pages = collected.pages_fetched,
        found = summary.found,
        processed = summary.processed,
        average = ?summary.average,
        "Term surveyed"
    );

    Ok(summary)
}

/// A provider left out of the run under [`FailurePolicy::SkipProvider`].
#[derive(Debug)]
pub struct ProviderFailure {
    pub provider: String,
    pub term: SearchTerm,
    pub error: TransportError,
}

/// Reports keyed by provider label, in provider order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub reports: IndexMap<String, ProviderReport>,
    pub failures: Vec<ProviderFailure>,
}

impl RunReport {
    pub fn get(&self, provider: &str) -> Option<&ProviderReport> {
        self.reports.get(provider)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

enum Outcome {
    Done(TermSummary),
    Failed(TransportError),
    Skipped,
}

/// Drives the survey across providers and terms.
pub struct Orchestrator {
    providers: Vec<Arc<dyn ProviderAdapter>>,
    config: RunConfig,
}

impl Orchestrator {
    pub fn new(config: RunConfig) -> Self {
        Self {
            providers: Vec::new(),
            config,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn ProviderAdapter>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn providers(&self) -> &[Arc<dyn ProviderAdapter>] {
        &self.providers
    }

    /// Reports are keyed by label, so two providers may not share one.
    fn validate_labels(&self) -> std::result::Result<(), ConfigError> {
        for (i, provider) in self.providers.iter().enumerate() {
            let label = provider.label();
            if self.providers[..i].iter().any(|p| p.label() == label) {
                return Err(ConfigError::Invalid {
                    field: "provider label",
                    reason: format!("{:?} is used by more than one provider", label),
                });
            }
        }
        Ok(())
    }

    /// Survey `terms` on every provider.
    ///
    /// Duplicate terms are surveyed once, at their first position.
    pub async fn run(&self, terms: &[SearchTerm]) -> Result<RunReport> {
        self.config.validate()?;
        self.validate_labels()?;

        let mut unique: Vec<SearchTerm> = Vec::with_capacity(terms.len());
        for term in terms {
            if !unique.contains(term) {
                unique.push(term.clone());
            }
        }
        let terms = unique;

        let failed: Arc<Vec<AtomicBool>> =
            Arc::new(self.providers.iter().map(|_| AtomicBool::new(false)).collect());
        let skip_on_failure = self.config.failure_policy == FailurePolicy::SkipProvider;

        let mut jobs = Vec::with_capacity(self.providers.len() * terms.len());
        for (p, adapter) in self.providers.iter().enumerate() {
            for (t, term) in terms.iter().enumerate() {
                let adapter = Arc::clone(adapter);
                let term = term.clone();
                let failed = Arc::clone(&failed);
                jobs.push(async move {
                    if failed[p].load(Ordering::Acquire) {
                        return (p, t, Outcome::Skipped);
                    }
                    match survey_term(adapter.as_ref(), &term).await {
                        Ok(summary) => (p, t, Outcome::Done(summary)),
                        Err(error) => {
                            if skip_on_failure {
                                failed[p].store(true, Ordering::Release);
                            }
                            (p, t, Outcome::Failed(error))
                        }
                    }
                });
            }
        }

        let mut slots: Vec<Vec<Option<TermSummary>>> =
            vec![vec![None; terms.len()]; self.providers.len()];
        let mut failures: Vec<Option<ProviderFailure>> =
            self.providers.iter().map(|_| None).collect();

        let mut results = stream::iter(jobs).buffer_unordered(self.config.concurrency);
        while let Some((p, t, outcome)) = results.next().await {
            match outcome {
                Outcome::Done(summary) => slots[p][t] = Some(summary),
                Outcome::Skipped => {}
                Outcome::Failed(error) => {
                    let provider = self.providers[p].label().to_string();
                    let term = terms[t].clone();

                    if !skip_on_failure {
                        return Err(SurveyError::Provider {
                            provider,
                            term: term.to_string(),
                            source: error,
                        });
                    }

                    warn!(
                        provider = %provider,
                        term = %term,
                        error = %error,
                        "Provider failed, dropping its report"
                    );
                    if failures[p].is_none() {
                        failures[p] = Some(ProviderFailure {
                            provider,
                            term,
                            error,
                        });
                    }
                }
            }
        }

        let mut run = RunReport::default();
        for ((adapter, row), failure) in self.providers.iter().zip(slots).zip(failures) {
            if let Some(failure) = failure {
                run.failures.push(failure);
                continue;
            }

            let mut report = ProviderReport::new(adapter.label());
            for (term, summary) in terms.iter().zip(row) {
                if let Some(summary) = summary {
                    report.insert(term.clone(), summary);
                }
            }
            run.reports.insert(adapter.label().to_string(), report);
        }

        Ok(run)
    }
}
