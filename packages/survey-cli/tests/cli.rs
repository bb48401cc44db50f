use assert_cmd::Command;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use predicates::str::contains;
use serde_json::{json, Value};
use std::collections::HashMap;
use tempfile::TempDir;

/// Runs the binary from an empty directory with no inherited credentials.
fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("salary-survey").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("SECRET_KEY_SUPER_JOB")
        .env_remove("HH_API_URL")
        .env_remove("SJ_API_URL")
        .env_remove("HH_AREA")
        .env_remove("SJ_TOWN")
        .env_remove("RUST_LOG");
    cmd
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn headhunter_stub(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("text").map(String::as_str) {
        Some("Rust") => Json(json!({
            "items": [
                {"salary": {"from": 100, "to": 200, "currency": "RUR"}},
                {"salary": null}
            ],
            "pages": 1,
            "found": 2
        })),
        _ => Json(json!({"items": [], "pages": 0, "found": 0})),
    }
}

#[test]
fn requires_at_least_one_term() {
    let dir = TempDir::new().unwrap();
    cmd(&dir).assert().failure();
}

#[test]
fn missing_superjob_key_fails_before_network() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "Rust",
            "--hh-url",
            "http://127.0.0.1:9/vacancies",
            "--sj-url",
            "http://127.0.0.1:9/2.0/vacancies/",
        ])
        .assert()
        .failure()
        .stderr(contains("SECRET_KEY_SUPER_JOB"))
        .stdout(predicates::str::is_empty());
}

#[test]
fn blank_superjob_key_is_missing() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .env("SECRET_KEY_SUPER_JOB", "   ")
        .args(["Rust", "--provider", "sj", "--sj-url", "http://127.0.0.1:9/"])
        .assert()
        .failure()
        .stderr(contains("SECRET_KEY_SUPER_JOB"));
}

#[tokio::test(flavor = "multi_thread")]
async fn headhunter_table_report() {
    let base = serve(Router::new().route("/vacancies", get(headhunter_stub))).await;
    let dir = TempDir::new().unwrap();

    let output = tokio::task::spawn_blocking(move || {
        cmd(&dir)
            .args(["Rust", "Zig", "--provider", "hh", "--retries", "0"])
            .arg("--hh-url")
            .arg(format!("{}/vacancies", base))
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("+HeadHunter Moscow"));
    assert!(stdout.contains("| Job title | Vacancies found | Vacancies processed | Average salary |"));
    assert!(stdout.contains("| Rust      | 2               | 1                   | 150            |"));
    assert!(stdout.contains("| Zig       | 0               | 0                   | -              |"));
}

#[tokio::test(flavor = "multi_thread")]
async fn headhunter_json_report() {
    let base = serve(Router::new().route("/vacancies", get(headhunter_stub))).await;
    let dir = TempDir::new().unwrap();

    let output = tokio::task::spawn_blocking(move || {
        cmd(&dir)
            .args(["Rust", "--provider", "hh", "--format", "json"])
            .arg("--hh-url")
            .arg(format!("{}/vacancies", base))
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["provider"], "HeadHunter Moscow");
    assert_eq!(
        report["terms"]["Rust"],
        json!({"found": 2, "processed": 1, "average": 150})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn transport_failure_exits_non_zero() {
    async fn broken() -> impl IntoResponse {
        StatusCode::INTERNAL_SERVER_ERROR
    }
    let base = serve(Router::new().route("/vacancies", get(broken))).await;
    let dir = TempDir::new().unwrap();

    let output = tokio::task::spawn_blocking(move || {
        cmd(&dir)
            .args(["Rust", "--provider", "hh", "--retries", "0"])
            .arg("--hh-url")
            .arg(format!("{}/vacancies", base))
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("HTTP 500"));
    assert!(output.stdout.is_empty());
}
