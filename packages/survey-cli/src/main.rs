//! Average advertised salaries for job titles on HeadHunter and SuperJob.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use salary_survey::config::{HH_AREA_MOSCOW, SJ_TOWN_MOSCOW};
use salary_survey::{
    FailurePolicy, HeadHunter, HeadHunterConfig, HttpConfig, HttpTransport, JsonSink,
    Orchestrator, ReportSink, RunConfig, SearchTerm, SuperJob, SuperJobConfig, TableSink,
    Transport,
};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "salary-survey", version)]
#[command(about = "Shows average advertised salaries from HeadHunter and SuperJob")]
struct Cli {
    /// Job titles or skills to survey
    #[arg(required = true, value_name = "TERM")]
    terms: Vec<String>,

    /// Providers to query (repeatable; defaults to all)
    #[arg(long = "provider", value_enum)]
    providers: Vec<ProviderKind>,

    /// HeadHunter region id
    #[arg(long, env = "HH_AREA", default_value_t = HH_AREA_MOSCOW)]
    hh_area: u32,

    /// SuperJob town id
    #[arg(long, env = "SJ_TOWN", default_value_t = SJ_TOWN_MOSCOW)]
    sj_town: u32,

    /// Override the HeadHunter search endpoint
    #[arg(long, env = "HH_API_URL")]
    hh_url: Option<String>,

    /// Override the SuperJob search endpoint
    #[arg(long, env = "SJ_API_URL")]
    sj_url: Option<String>,

    /// Stop after this many pages per term
    #[arg(long)]
    max_pages: Option<u32>,

    /// Number of (provider, term) pairs fetched at once
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Retries for failed requests
    #[arg(long, default_value_t = 3)]
    retries: u32,

    /// Keep going when a provider fails; its report is left out
    #[arg(long)]
    keep_going: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ProviderKind {
    /// HeadHunter (hh.ru)
    Hh,
    /// SuperJob (superjob.ru)
    Sj,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

impl Cli {
    fn selected_providers(&self) -> Vec<ProviderKind> {
        if self.providers.is_empty() {
            return vec![ProviderKind::Hh, ProviderKind::Sj];
        }
        let mut selected = Vec::new();
        for kind in &self.providers {
            if !selected.contains(kind) {
                selected.push(*kind);
            }
        }
        selected
    }

    fn terms(&self) -> Vec<SearchTerm> {
        self.terms.iter().map(|t| SearchTerm::new(t.trim())).collect()
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,salary_survey=debug"
    } else {
        "warn,salary_survey=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn headhunter_label(area: u32) -> String {
    if area == HH_AREA_MOSCOW {
        "HeadHunter Moscow".to_string()
    } else {
        format!("HeadHunter area {}", area)
    }
}

fn superjob_label(town: u32) -> String {
    if town == SJ_TOWN_MOSCOW {
        "SuperJob Moscow".to_string()
    } else {
        format!("SuperJob town {}", town)
    }
}

/// Wire up the providers. Fails on configuration problems before any request.
fn build_orchestrator(cli: &Cli, config: &Config) -> Result<Orchestrator> {
    let http = HttpConfig::new()
        .with_timeout(Duration::from_secs(cli.timeout_secs))
        .with_retries(cli.retries);
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(http).context("Failed to build HTTP client")?);

    let policy = if cli.keep_going {
        FailurePolicy::SkipProvider
    } else {
        FailurePolicy::Abort
    };
    let run = RunConfig::new()
        .with_concurrency(cli.concurrency)
        .with_failure_policy(policy);
    run.validate()?;

    let mut orchestrator = Orchestrator::new(run);
    for kind in cli.selected_providers() {
        match kind {
            ProviderKind::Hh => {
                let mut hh = HeadHunterConfig::new()
                    .with_label(headhunter_label(cli.hh_area))
                    .with_area(cli.hh_area)
                    .with_max_pages(cli.max_pages);
                if let Some(url) = &cli.hh_url {
                    hh = hh.with_base_url(url);
                }
                let adapter = HeadHunter::new(hh, Arc::clone(&transport))
                    .context("Invalid HeadHunter configuration")?;
                orchestrator = orchestrator.with_provider(Arc::new(adapter));
            }
            ProviderKind::Sj => {
                let key = config.credentials.require_superjob()?.clone();
                let mut sj = SuperJobConfig::new(key)
                    .with_label(superjob_label(cli.sj_town))
                    .with_town(cli.sj_town)
                    .with_max_pages(cli.max_pages);
                if let Some(url) = &cli.sj_url {
                    sj = sj.with_base_url(url);
                }
                let adapter = SuperJob::new(sj, Arc::clone(&transport))
                    .context("Invalid SuperJob configuration")?;
                orchestrator = orchestrator.with_provider(Arc::new(adapter));
            }
        }
    }

    Ok(orchestrator)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (development)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    let orchestrator = build_orchestrator(&cli, &config)?;

    let terms = cli.terms();
    tracing::info!(terms = terms.len(), providers = orchestrator.providers().len(), "Starting survey");

    let run = orchestrator.run(&terms).await.context("Survey failed")?;

    let stdout = io::stdout();
    let mut sink: Box<dyn ReportSink> = match cli.format {
        Format::Table => Box::new(TableSink::new(stdout.lock())),
        Format::Json => Box::new(JsonSink::new(stdout.lock())),
    };
    for report in run.reports.values() {
        sink.emit(report).context("Failed to write report")?;
    }

    if run.is_complete() {
        return Ok(ExitCode::SUCCESS);
    }

    for failure in &run.failures {
        tracing::error!(
            provider = %failure.provider,
            term = %failure.term,
            error = %failure.error,
            "Provider report omitted"
        );
        eprintln!(
            "{} skipped: request for {:?} failed: {}",
            failure.provider, failure.term.as_str(), failure.error
        );
    }
    Ok(ExitCode::FAILURE)
}
