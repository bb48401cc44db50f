//! Roll per-posting estimates into a [`TermSummary`].

use tracing::debug;

use crate::salary::{assess, Unusable};
use crate::types::{CollectedPostings, RawPosting, TermSummary};

/// Counts of postings left out, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclusions {
    pub no_salary: u64,
    pub currency_mismatch: u64,
    pub no_bounds: u64,
}

impl Exclusions {
    fn record(&mut self, reason: Unusable) {
        match reason {
            Unusable::NoSalary => self.no_salary += 1,
            Unusable::CurrencyMismatch => self.currency_mismatch += 1,
            Unusable::NoBounds => self.no_bounds += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.no_salary + self.currency_mismatch + self.no_bounds
    }
}

/// Running mean over point estimates.
///
/// Estimates are summed unrounded; rounding happens once, on the mean.
#[derive(Debug, Clone, Default)]
pub struct SalaryAccumulator {
    sum: f64,
    count: u64,
    exclusions: Exclusions,
}

impl SalaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one posting, estimating it when usable.
    pub fn add(&mut self, posting: &RawPosting, target_currency: &str) {
        match assess(posting.salary.as_ref(), target_currency) {
            Ok(estimate) => {
                self.sum += estimate;
                self.count += 1;
            }
            Err(reason) => self.exclusions.record(reason),
        }
    }

    pub fn processed(&self) -> u64 {
        self.count
    }

    pub fn exclusions(&self) -> Exclusions {
        self.exclusions
    }

    pub fn average(&self) -> Option<u64> {
        (self.count > 0).then(|| (self.sum / self.count as f64).round() as u64)
    }

    pub fn finish(self, found: u64) -> TermSummary {
        TermSummary {
            found,
            processed: self.processed(),
            average: self.average(),
        }
    }
}

/// Summarize everything collected for one term.
///
/// Never fails: an empty or all-unusable set gives `processed = 0` and no average.
pub fn summarize(collected: &CollectedPostings, target_currency: &str) -> TermSummary {
    let mut acc = SalaryAccumulator::new();
    for posting in &collected.postings {
        acc.add(posting, target_currency);
    }

    let exclusions = acc.exclusions();
    debug!(
        considered = collected.postings.len(),
        processed = acc.processed(),
        no_salary = exclusions.no_salary,
        currency_mismatch = exclusions.currency_mismatch,
        no_bounds = exclusions.no_bounds,
        "Summarized postings"
    );

    acc.finish(collected.reported_total)
}
