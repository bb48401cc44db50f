//! Advertised-salary statistics from job-board search APIs.
//!
//! For each search term, every page of vacancies is pulled from each job
//! board, each posting's salary range is reduced to a point estimate, and the
//! estimates are rolled into a per-term summary: vacancies found, vacancies
//! with a usable salary, and their mean.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use salary_survey::{
//!     HeadHunter, HeadHunterConfig, HttpConfig, HttpTransport, Orchestrator, RunConfig,
//!     SearchTerm,
//! };
//!
//! let transport = Arc::new(HttpTransport::new(HttpConfig::default())?);
//! let hh = HeadHunter::new(HeadHunterConfig::default(), transport)?;
//!
//! let run = Orchestrator::new(RunConfig::default())
//!     .with_provider(Arc::new(hh))
//!     .run(&[SearchTerm::from("Rust developer")])
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`salary`] - Salary ranges and the point-estimate formula
//! - [`stats`] - Per-term aggregation
//! - [`providers`] - Job-board adapters and the pagination loop
//! - [`transport`] - HTTP transport with timeout and retry
//! - [`orchestrator`] - Runs terms across providers
//! - [`report`] - Table and JSON report sinks
//! - [`config`] - Provider, HTTP and run settings
//! - [`testing`] - Mock transport and adapter

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod report;
pub mod salary;
pub mod security;
pub mod stats;
pub mod testing;
pub mod transport;
pub mod types;

pub use config::{
    Credentials, FailurePolicy, HeadHunterConfig, HttpConfig, RunConfig, SuperJobConfig,
    SUPERJOB_KEY_VAR,
};
pub use error::{ConfigError, Result, SurveyError, TransportError, TransportResult};
pub use orchestrator::{survey_term, Orchestrator, ProviderFailure, RunReport};
pub use providers::{collect_pages, HeadHunter, PageSource, ProviderAdapter, SuperJob};
pub use report::{render_table, JsonSink, ReportSink, TableSink};
pub use salary::{estimate, SalaryRange, Unusable};
pub use security::ApiKey;
pub use stats::{summarize, SalaryAccumulator};
pub use transport::{HttpTransport, PageRequest, Transport};
pub use types::{
    CollectedPostings, Continuation, PageResult, ProviderReport, RawPosting, SearchTerm,
    TermSummary,
};
