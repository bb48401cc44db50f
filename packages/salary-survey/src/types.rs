//! Data types passed between the survey stages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::salary::SalaryRange;

/// A job title or skill to query, e.g. "Python developer".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchTerm {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SearchTerm {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single vacancy as returned by a provider.
///
/// Only the salary is read; every other field of the provider record is
/// ignored when the page is parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPosting {
    /// `None` when the provider disclosed no salary at all.
    pub salary: Option<SalaryRange>,
}

impl RawPosting {
    /// A posting without any salary information.
    pub fn undisclosed() -> Self {
        Self::default()
    }

    /// A posting carrying the given salary range.
    pub fn with_salary(salary: SalaryRange) -> Self {
        Self {
            salary: Some(salary),
        }
    }
}

/// How a provider signals whether another page follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Total number of pages for the query (paged-count providers).
    PageCount(u32),
    /// Whether more pages remain after this one (has-more providers).
    HasMore(bool),
}

/// One fetched page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub postings: Vec<RawPosting>,
    /// Provider's count of all matches for the query.
    pub reported_total: u64,
    pub continuation: Continuation,
}

/// All postings gathered for one (term, provider) pair.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedPostings {
    /// Total as reported on the first page.
    pub reported_total: u64,
    pub postings: Vec<RawPosting>,
    /// Number of page requests made.
    pub pages_fetched: u32,
}

impl CollectedPostings {
    pub fn new(reported_total: u64, postings: Vec<RawPosting>) -> Self {
        Self {
            reported_total,
            postings,
            pages_fetched: 0,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-term statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSummary {
    /// Provider-reported number of matching vacancies.
    pub found: u64,
    /// Vacancies with a usable salary estimate.
    pub processed: u64,
    /// Mean estimate rounded to the nearest unit, absent when nothing was processed.
    pub average: Option<u64>,
}

impl TermSummary {
    pub fn empty(found: u64) -> Self {
        Self {
            found,
            processed: 0,
            average: None,
        }
    }
}

/// Term summaries for one provider, in the order the terms were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderReport {
    #[serde(rename = "provider")]
    pub label: String,
    pub terms: IndexMap<SearchTerm, TermSummary>,
}

impl ProviderReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            terms: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, term: SearchTerm, summary: TermSummary) {
        self.terms.insert(term, summary);
    }

    pub fn get(&self, term: &str) -> Option<&TermSummary> {
        self.terms.get(&SearchTerm::new(term))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
