//! Salary ranges and the point-estimate formula.
//!
//! Providers publish a range with either bound missing. A range is reduced to a
//! single figure as follows:
//!
//! - only a lower bound: `lower * 1.2`
//! - only an upper bound: `upper * 0.8`
//! - both bounds: the midpoint
//!
//! Missing bounds are kept as `None` until the estimate is computed; a literal
//! zero from the provider means the same thing.

use serde::{Deserialize, Serialize};

const LOWER_ONLY_FACTOR: f64 = 1.2;
const UPPER_ONLY_FACTOR: f64 = 0.8;

/// Salary range attached to a posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub currency: Option<String>,
}

impl SalaryRange {
    pub fn new(from: Option<u64>, to: Option<u64>, currency: Option<&str>) -> Self {
        Self {
            from,
            to,
            currency: currency.map(str::to_string),
        }
    }

    /// Check the range against the target currency and estimate it.
    pub fn point_estimate(&self, target_currency: &str) -> Result<f64, Unusable> {
        if self.currency.as_deref() != Some(target_currency) {
            return Err(Unusable::CurrencyMismatch);
        }

        let lower = self.from.unwrap_or(0);
        let upper = self.to.unwrap_or(0);
        if lower == 0 && upper == 0 {
            return Err(Unusable::NoBounds);
        }

        Ok(estimate(lower, upper))
    }
}

/// Why a posting was left out of the statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unusable {
    /// No salary disclosed.
    NoSalary,
    /// Salary stated in another currency.
    CurrencyMismatch,
    /// Both bounds missing or zero.
    NoBounds,
}

/// Estimate the salary of a posting, if it is usable.
pub fn assess(salary: Option<&SalaryRange>, target_currency: &str) -> Result<f64, Unusable> {
    salary
        .ok_or(Unusable::NoSalary)?
        .point_estimate(target_currency)
}

/// Reduce a range to one figure. Zero means "not specified".
///
/// Never called with both bounds zero; [`SalaryRange::point_estimate`] filters
/// that case out first. The result is not rounded so the mean stays exact.
pub fn estimate(lower: u64, upper: u64) -> f64 {
    if upper == 0 {
        lower as f64 * LOWER_ONLY_FACTOR
    } else if lower == 0 {
        upper as f64 * UPPER_ONLY_FACTOR
    } else {
        (lower as f64 + upper as f64) / 2.0
    }
}
