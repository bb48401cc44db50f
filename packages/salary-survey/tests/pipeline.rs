//! End-to-end survey scenarios: adapters, aggregation and orchestration
//! wired together over a scripted transport.

use salary_survey::testing::MockTransport;
use salary_survey::{
    ApiKey, ConfigError, Credentials, FailurePolicy, HeadHunter, HeadHunterConfig, Orchestrator,
    RunConfig, SearchTerm, SuperJob, SuperJobConfig, SurveyError, TermSummary,
};
use serde_json::json;
use std::sync::Arc;

fn headhunter(transport: &MockTransport) -> Arc<HeadHunter> {
    Arc::new(HeadHunter::new(HeadHunterConfig::default(), Arc::new(transport.clone())).unwrap())
}

fn superjob(transport: &MockTransport) -> Arc<SuperJob> {
    let credentials = Credentials::new().with_superjob_key("fake-app-id");
    let key = credentials.require_superjob().unwrap().clone();
    Arc::new(SuperJob::new(SuperJobConfig::new(key), Arc::new(transport.clone())).unwrap())
}

#[tokio::test]
async fn test_paged_count_provider_scenario() {
    let transport = MockTransport::new().with_term_page(
        "X",
        0,
        json!({
            "items": [
                {"salary": {"from": 100, "to": 200, "currency": "RUR"}},
                {"salary": {"from": null, "to": null, "currency": null}}
            ],
            "pages": 1,
            "found": 2
        }),
    );

    let run = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&transport))
        .run(&[SearchTerm::from("X")])
        .await
        .unwrap();

    let summary = run.get("HeadHunter Moscow").unwrap().get("X").unwrap();
    assert_eq!(
        summary,
        &TermSummary {
            found: 2,
            processed: 1,
            average: Some(150)
        }
    );
}

#[tokio::test]
async fn test_has_more_provider_scenario() {
    let transport = MockTransport::new().with_term_page(
        "Y",
        0,
        json!({
            "objects": [{"payment_from": 0, "payment_to": 1000, "currency": "rub"}],
            "more": false,
            "total": 1
        }),
    );

    let run = Orchestrator::new(RunConfig::default())
        .with_provider(superjob(&transport))
        .run(&[SearchTerm::from("Y")])
        .await
        .unwrap();

    let summary = run.get("SuperJob Moscow").unwrap().get("Y").unwrap();
    assert_eq!(
        summary,
        &TermSummary {
            found: 1,
            processed: 1,
            average: Some(800)
        }
    );
}

#[tokio::test]
async fn test_no_postings_on_either_provider() {
    let hh_transport =
        MockTransport::new().with_page(0, json!({"items": [], "pages": 0, "found": 0}));
    let sj_transport =
        MockTransport::new().with_page(0, json!({"objects": [], "more": false, "total": 0}));

    let run = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&hh_transport))
        .with_provider(superjob(&sj_transport))
        .run(&[SearchTerm::from("Z")])
        .await
        .unwrap();

    for provider in ["HeadHunter Moscow", "SuperJob Moscow"] {
        let summary = run.get(provider).unwrap().get("Z").unwrap();
        assert_eq!(summary, &TermSummary::empty(0));
        assert_eq!(summary.average, None);
    }
    assert_eq!(hh_transport.requests().len(), 1);
    assert_eq!(sj_transport.requests().len(), 1);
}

#[tokio::test]
async fn test_currency_mismatch_excluded() {
    let transport = MockTransport::new().with_page(
        0,
        json!({
            "items": [
                {"salary": {"from": 3000, "to": 5000, "currency": "USD"}},
                {"salary": {"from": 90000, "to": null, "currency": "RUR"}}
            ],
            "pages": 1,
            "found": 2
        }),
    );

    let run = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&transport))
        .run(&[SearchTerm::from("Rust")])
        .await
        .unwrap();

    let summary = run.get("HeadHunter Moscow").unwrap().get("Rust").unwrap();
    assert_eq!(summary.found, 2);
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.average, Some(108_000));
}

#[tokio::test]
async fn test_found_taken_from_first_page() {
    let transport = MockTransport::new()
        .with_page(
            0,
            json!({"objects": [{"payment_from": 100, "payment_to": 0, "currency": "rub"}], "more": true, "total": 40}),
        )
        .with_page(
            1,
            json!({"objects": [{"payment_from": 200, "payment_to": 400, "currency": "rub"}], "more": false, "total": 41}),
        );

    let run = Orchestrator::new(RunConfig::default())
        .with_provider(superjob(&transport))
        .run(&[SearchTerm::from("Rust")])
        .await
        .unwrap();

    let summary = run.get("SuperJob Moscow").unwrap().get("Rust").unwrap();
    assert_eq!(summary.found, 40);
    assert_eq!(summary.processed, 2);
    // (120 + 300) / 2
    assert_eq!(summary.average, Some(210));
    assert_eq!(transport.requested_pages(), vec![0, 1]);
}

#[tokio::test]
async fn test_page_failure_aborts_run() {
    let transport = MockTransport::new()
        .with_page(0, json!({"items": [], "pages": 2, "found": 150}))
        .with_failure(1, 502);

    let err = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&transport))
        .run(&[SearchTerm::from("Rust")])
        .await
        .unwrap_err();

    assert!(matches!(err, SurveyError::Provider { .. }));
}

#[tokio::test]
async fn test_skip_provider_policy_keeps_healthy_provider() {
    let hh_transport = MockTransport::new().with_failure(0, 503);
    let sj_transport = MockTransport::new().with_page(
        0,
        json!({"objects": [{"payment_from": 50000, "payment_to": 70000, "currency": "rub"}], "more": false, "total": 1}),
    );

    let run = Orchestrator::new(RunConfig::new().with_failure_policy(FailurePolicy::SkipProvider))
        .with_provider(headhunter(&hh_transport))
        .with_provider(superjob(&sj_transport))
        .run(&[SearchTerm::from("Rust"), SearchTerm::from("Go")])
        .await
        .unwrap();

    assert!(run.get("HeadHunter Moscow").is_none());
    assert_eq!(run.failures.len(), 1);
    let sj = run.get("SuperJob Moscow").unwrap();
    assert_eq!(sj.get("Rust").unwrap().average, Some(60000));
    assert_eq!(sj.get("Go").unwrap().average, Some(60000));
}

#[tokio::test]
async fn test_concurrent_run_matches_sequential() {
    let transport = MockTransport::new()
        .with_term_page(
            "Rust",
            0,
            json!({"items": [{"salary": {"from": 100, "to": 300, "currency": "RUR"}}], "pages": 1, "found": 1}),
        )
        .with_term_page(
            "Go",
            0,
            json!({"items": [{"salary": {"from": 500, "to": null, "currency": "RUR"}}], "pages": 1, "found": 1}),
        );
    let terms = [SearchTerm::from("Rust"), SearchTerm::from("Go")];

    let sequential = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&transport))
        .run(&terms)
        .await
        .unwrap();
    let concurrent = Orchestrator::new(RunConfig::new().with_concurrency(8))
        .with_provider(headhunter(&transport))
        .run(&terms)
        .await
        .unwrap();

    assert_eq!(
        sequential.get("HeadHunter Moscow"),
        concurrent.get("HeadHunter Moscow")
    );
}

#[tokio::test]
async fn test_unexpected_id_types_do_not_abort_run() {
    let hh_transport = MockTransport::new().with_page(
        0,
        json!({
            "items": [{"id": 123, "salary": {"from": 100, "to": 200, "currency": "RUR"}}],
            "pages": 1,
            "found": 1
        }),
    );
    let sj_transport = MockTransport::new().with_page(
        0,
        json!({
            "objects": [{"id": "77", "payment_from": 100, "payment_to": 200, "currency": "rub"}],
            "more": false,
            "total": 1
        }),
    );

    let run = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&hh_transport))
        .with_provider(superjob(&sj_transport))
        .run(&[SearchTerm::from("Rust")])
        .await
        .unwrap();

    for provider in ["HeadHunter Moscow", "SuperJob Moscow"] {
        let summary = run.get(provider).unwrap().get("Rust").unwrap();
        assert_eq!(summary.processed, 1);
        assert_eq!(summary.average, Some(150));
    }
}

#[tokio::test]
async fn test_providers_sharing_a_label_rejected() {
    let transport = MockTransport::new().with_page(0, json!({"items": [], "pages": 0, "found": 0}));
    let saint_petersburg = HeadHunterConfig::default().with_area(2);

    let err = Orchestrator::new(RunConfig::default())
        .with_provider(headhunter(&transport))
        .with_provider(Arc::new(
            HeadHunter::new(saint_petersburg, Arc::new(transport.clone())).unwrap(),
        ))
        .run(&[SearchTerm::from("Rust")])
        .await
        .unwrap_err();

    assert!(matches!(err, SurveyError::Config(ConfigError::Invalid { .. })));
    assert!(transport.requests().is_empty());
}

#[test]
fn test_key_is_injected_not_read_from_environment() {
    let config = SuperJobConfig::new(ApiKey::new("injected"));
    assert_eq!(config.api_key.expose(), "injected");
}
