//! Configuration for providers, HTTP behaviour and runs.
//!
//! Everything is resolved up front by the caller. Nothing in this crate reads
//! the process environment.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;
use crate::security::ApiKey;

/// Environment variable the CLI reads the SuperJob key from.
pub const SUPERJOB_KEY_VAR: &str = "SECRET_KEY_SUPER_JOB";

/// HeadHunter region id for Moscow.
pub const HH_AREA_MOSCOW: u32 = 1;
/// SuperJob town id for Moscow.
pub const SJ_TOWN_MOSCOW: u32 = 4;

/// Settings for the HeadHunter (paged-count) provider.
#[derive(Debug, Clone)]
pub struct HeadHunterConfig {
    /// Report title.
    pub label: String,
    /// Vacancy search endpoint.
    pub base_url: String,
    /// Region filter (`area`).
    pub area: u32,
    /// Items per page. HeadHunter accepts up to 100.
    pub per_page: u32,
    /// Ask for highlighted snippets (`enable_snippets`).
    pub enable_snippets: bool,
    /// Only salaries in this currency are counted.
    pub currency: String,
    /// Stop after this many pages even if more are reported.
    pub max_pages: Option<u32>,
}

impl Default for HeadHunterConfig {
    fn default() -> Self {
        Self {
            label: "HeadHunter Moscow".to_string(),
            base_url: "https://api.hh.ru/vacancies".to_string(),
            area: HH_AREA_MOSCOW,
            per_page: 100,
            enable_snippets: true,
            currency: "RUR".to_string(),
            max_pages: None,
        }
    }
}

impl HeadHunterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_area(mut self, area: u32) -> Self {
        self.area = area;
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 || self.per_page > 100 {
            return Err(ConfigError::Invalid {
                field: "per_page",
                reason: format!("must be within 1..=100, got {}", self.per_page),
            });
        }
        validate_max_pages(self.max_pages)
    }
}

/// Settings for the SuperJob (has-more) provider.
#[derive(Clone)]
pub struct SuperJobConfig {
    /// Report title.
    pub label: String,
    /// Vacancy search endpoint.
    pub base_url: String,
    /// Region filter (`town`).
    pub town: u32,
    /// Sent as `X-Api-App-Id`.
    pub api_key: ApiKey,
    /// Only salaries in this currency are counted.
    pub currency: String,
    /// Items per page (`count`); provider default when unset.
    pub per_page: Option<u32>,
    /// Stop after this many pages even if more are reported.
    pub max_pages: Option<u32>,
}

impl SuperJobConfig {
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            label: "SuperJob Moscow".to_string(),
            base_url: "https://api.superjob.ru/2.0/vacancies/".to_string(),
            town: SJ_TOWN_MOSCOW,
            api_key,
            currency: "rub".to_string(),
            per_page: None,
            max_pages: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_town(mut self, town: u32) -> Self {
        self.town = town;
        self
    }

    pub fn with_per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.is_blank() {
            return Err(ConfigError::MissingCredential {
                var: SUPERJOB_KEY_VAR,
            });
        }
        if let Some(count) = self.per_page {
            if count == 0 || count > 100 {
                return Err(ConfigError::Invalid {
                    field: "per_page",
                    reason: format!("must be within 1..=100, got {}", count),
                });
            }
        }
        validate_max_pages(self.max_pages)
    }
}

impl fmt::Debug for SuperJobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperJobConfig")
            .field("label", &self.label)
            .field("base_url", &self.base_url)
            .field("town", &self.town)
            .field("api_key", &"[REDACTED]")
            .field("currency", &self.currency)
            .field("per_page", &self.per_page)
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

fn validate_max_pages(max_pages: Option<u32>) -> Result<(), ConfigError> {
    match max_pages {
        Some(0) => Err(ConfigError::Invalid {
            field: "max_pages",
            reason: "must be at least 1".to_string(),
        }),
        _ => Ok(()),
    }
}

/// Secrets resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub superjob_api_key: Option<ApiKey>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_superjob_key(mut self, key: impl Into<String>) -> Self {
        self.superjob_api_key = Some(ApiKey::new(key));
        self
    }

    /// The SuperJob key, or a configuration error if it is missing or blank.
    pub fn require_superjob(&self) -> Result<&ApiKey, ConfigError> {
        self.superjob_api_key
            .as_ref()
            .filter(|key| !key.is_blank())
            .ok_or(ConfigError::MissingCredential {
                var: SUPERJOB_KEY_VAR,
            })
    }
}

/// HTTP client behaviour shared by every provider.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout. An expired request counts as a transport error.
    pub timeout: Duration,
    /// HeadHunter rejects requests without a User-Agent.
    pub user_agent: String,
    /// Extra attempts after the first one for transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further attempt.
    pub retry_base_delay: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("salary-survey/", env!("CARGO_PKG_VERSION")).to_string(),
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.retry_base_delay.saturating_mul(factor)
    }
}

/// What to do when one provider fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort the whole run on the first failure.
    #[default]
    Abort,
    /// Drop the failed provider's report and continue with the others.
    SkipProvider,
}

/// Orchestration settings.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Maximum (term, provider) traversals in flight. 1 runs them in order.
    pub concurrency: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid {
                field: "concurrency",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
