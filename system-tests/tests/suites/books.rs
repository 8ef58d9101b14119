// system-tests/tests/suites/books.rs
// ============================================================================
// Module: Books Scenario Tests
// Description: End-to-end coverage for the books conformance scenario.
// Purpose: Verify verdicts and artifacts against controlled stub responses.
// Dependencies: system-tests helpers, bookstore-conformance-core
// ============================================================================

//! System tests for the books conformance scenario.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use bookstore_conformance_core::FsReporter;
use bookstore_conformance_core::ScenarioConfig;
use bookstore_conformance_core::ScenarioError;
use bookstore_conformance_core::run_books_scenario;
use bookstore_conformance_core::scenario::CATEGORY_REGRESSION;
use bookstore_conformance_core::scenario::EXPECTED_AUTHOR;
use bookstore_conformance_core::scenario::EXPECTED_ISBN;
use bookstore_conformance_core::scenario::EXPECTED_TITLE;
use bookstore_conformance_core::scenario::FEATURE_TAG;
use helpers::stub::demo_bookshelf;
use helpers::stub::spawn_book_store_stub;
use serde_json::json;
use system_tests::config::SystemTestConfig;
use tempfile::TempDir;

use crate::helpers;

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Base URL of the live demo service used by the opt-in live run.
const LIVE_BASE_URL: &str = "https://demoqa.com";

/// Returns the scenario run root for a test, honoring the env override.
fn scenario_run_root(scratch: &TempDir, test_name: &str) -> PathBuf {
    SystemTestConfig::load().ok().and_then(|config| config.run_root).map_or_else(
        || scratch.path().join(test_name),
        |root| root.join(test_name),
    )
}

/// Builds a reporter rooted under the test's run root.
fn scenario_reporter(root: PathBuf) -> Result<FsReporter, Box<dyn std::error::Error>> {
    Ok(FsReporter::new("books", FEATURE_TAG, CATEGORY_REGRESSION, Some(root))?)
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_passes_against_healthy_stub() -> TestResult {
    let scratch = TempDir::new()?;
    let root = scenario_run_root(&scratch, "books_scenario_passes_against_healthy_stub");
    let body = serde_json::to_string(&demo_bookshelf())?;
    let stub = spawn_book_store_stub(200, body.clone())?;

    let config = ScenarioConfig::new(stub.base_url())?;
    let mut reporter = scenario_reporter(root.clone())?;
    let report = run_books_scenario(&config, &mut reporter).await?;
    reporter.finish("pass", vec![format!("status code {}", report.status_code)])?;

    if report.status_code != 200 {
        return Err(format!("unexpected status code {}", report.status_code).into());
    }
    if report.first_book.title != EXPECTED_TITLE
        || report.first_book.author != EXPECTED_AUTHOR
        || report.first_book.isbn != EXPECTED_ISBN
    {
        return Err(format!("unexpected first record: {}", report.first_book.title).into());
    }
    if stub.request_count() != 1 {
        return Err(format!("expected one request, saw {}", stub.request_count()).into());
    }

    let url = fs::read_to_string(root.join("request_url.txt"))?;
    if url != format!("{}/BookStore/v1/Books", stub.base_url()) {
        return Err(format!("unexpected request url artifact: {url}").into());
    }
    let confirmation = fs::read_to_string(root.join("schema_validation.txt"))?;
    if confirmation != "JSON schema validation passed" {
        return Err(format!("unexpected schema confirmation: {confirmation}").into());
    }
    let recorded_body = fs::read_to_string(root.join("response_body.json"))?;
    if recorded_body != body {
        return Err("response body artifact does not match the served body".into());
    }
    let status = fs::read_to_string(root.join("response_status_code.txt"))?;
    if status != "200" {
        return Err(format!("unexpected status artifact: {status}").into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_reports_unexpected_status() -> TestResult {
    for code in [404_u16, 500] {
        let scratch = TempDir::new()?;
        let root = scenario_run_root(&scratch, "books_scenario_reports_unexpected_status");
        let stub = spawn_book_store_stub(code, "{\"message\":\"unavailable\"}".to_string())?;

        let config = ScenarioConfig::new(stub.base_url())?;
        let mut reporter = scenario_reporter(root.clone())?;
        let Err(err) = run_books_scenario(&config, &mut reporter).await else {
            return Err(format!("expected status {code} to fail the scenario").into());
        };
        reporter.finish("fail", vec![err.to_string()])?;

        if !matches!(err, ScenarioError::UnexpectedStatus { actual } if actual == code) {
            return Err(format!("unexpected verdict for status {code}: {err}").into());
        }
        if !err.to_string().contains(&code.to_string()) {
            return Err(format!("message should carry the observed code: {err}").into());
        }
        let status = fs::read_to_string(root.join("response_status_code.txt"))?;
        if status != code.to_string() {
            return Err(format!("unexpected status artifact: {status}").into());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_reports_schema_mismatch_without_books_key() -> TestResult {
    let scratch = TempDir::new()?;
    let root =
        scenario_run_root(&scratch, "books_scenario_reports_schema_mismatch_without_books_key");
    let body = serde_json::to_string(&json!({ "items": [] }))?;
    let stub = spawn_book_store_stub(200, body)?;

    let config = ScenarioConfig::new(stub.base_url())?;
    let mut reporter = scenario_reporter(root.clone())?;
    let Err(err) = run_books_scenario(&config, &mut reporter).await else {
        return Err("expected a schema mismatch verdict".into());
    };
    reporter.finish("fail", vec![err.to_string()])?;

    let ScenarioError::SchemaMismatch {
        diagnostic,
    } = err
    else {
        return Err(format!("unexpected verdict: {err}").into());
    };
    if !diagnostic.contains("books") {
        return Err(format!("diagnostic should name the missing key: {diagnostic}").into());
    }
    let recorded = fs::read_to_string(root.join("schema_validation_error.txt"))?;
    if recorded != diagnostic {
        return Err("schema error artifact should carry the validator diagnostic".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_reports_title_mismatch() -> TestResult {
    let scratch = TempDir::new()?;
    let root = scenario_run_root(&scratch, "books_scenario_reports_title_mismatch");
    let mut shelf = demo_bookshelf();
    shelf["books"][0]["title"] = json!("Some Other Guide");
    let stub = spawn_book_store_stub(200, serde_json::to_string(&shelf)?)?;

    let config = ScenarioConfig::new(stub.base_url())?;
    let mut reporter = scenario_reporter(root.clone())?;
    let Err(err) = run_books_scenario(&config, &mut reporter).await else {
        return Err("expected a title mismatch verdict".into());
    };
    reporter.finish("fail", vec![err.to_string()])?;

    if !matches!(err, ScenarioError::FieldMismatch { field: "title", .. }) {
        return Err(format!("unexpected verdict: {err}").into());
    }
    if !err.to_string().contains("title mismatch") {
        return Err(format!("message should cite the field: {err}").into());
    }
    // The first record is attached even though the assertion failed.
    let details = fs::read_to_string(root.join("first_book_details.json"))?;
    if !details.contains("Some Other Guide") {
        return Err("first record artifact should carry the observed record".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_fails_fast_on_empty_shelf() -> TestResult {
    let scratch = TempDir::new()?;
    let root = scenario_run_root(&scratch, "books_scenario_fails_fast_on_empty_shelf");
    let stub = spawn_book_store_stub(200, serde_json::to_string(&json!({ "books": [] }))?)?;

    let config = ScenarioConfig::new(stub.base_url())?;
    let mut reporter = scenario_reporter(root)?;
    let Err(err) = run_books_scenario(&config, &mut reporter).await else {
        return Err("expected an empty shelf verdict".into());
    };
    reporter.finish("fail", vec![err.to_string()])?;

    if !matches!(err, ScenarioError::EmptyShelf) {
        return Err(format!("unexpected verdict: {err}").into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_surfaces_transport_failures() -> TestResult {
    let scratch = TempDir::new()?;
    let root = scenario_run_root(&scratch, "books_scenario_surfaces_transport_failures");
    // Allocate a loopback port and release it so the connection is refused.
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);

    let config = ScenarioConfig::new(&format!("http://{addr}"))?
        .with_timeout(Duration::from_secs(5));
    let mut reporter = scenario_reporter(root)?;
    let Err(err) = run_books_scenario(&config, &mut reporter).await else {
        return Err("expected a transport failure".into());
    };
    reporter.finish("fail", vec![err.to_string()])?;

    if !matches!(err, ScenarioError::Transport(_)) {
        return Err(format!("unexpected verdict: {err}").into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_artifacts_are_byte_identical_across_runs() -> TestResult {
    let scratch = TempDir::new()?;
    let body = serde_json::to_string(&demo_bookshelf())?;
    let stub = spawn_book_store_stub(200, body)?;
    let config = ScenarioConfig::new(stub.base_url())?;

    let root_a = scratch.path().join("run_a");
    let root_b = scratch.path().join("run_b");
    for root in [&root_a, &root_b] {
        let mut reporter = scenario_reporter(root.clone())?;
        let report = run_books_scenario(&config, &mut reporter).await?;
        reporter.finish("pass", vec![format!("status code {}", report.status_code)])?;
    }

    for artifact in [
        "request_url.txt",
        "response_body.json",
        "response_status_code.txt",
        "schema_validation.txt",
        "first_book_details.json",
    ] {
        let bytes_a = fs::read(root_a.join(artifact))?;
        let bytes_b = fs::read(root_b.join(artifact))?;
        if bytes_a != bytes_b {
            return Err(format!("artifact {artifact} differs between runs").into());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn books_scenario_passes_against_live_service() -> TestResult {
    let system = SystemTestConfig::load()?;
    if !system.live {
        return Ok(());
    }
    let scratch = TempDir::new()?;
    let root = scenario_run_root(&scratch, "books_scenario_passes_against_live_service");

    let base_url = system.base_url.as_deref().unwrap_or(LIVE_BASE_URL);
    let config = ScenarioConfig::new(base_url)?
        .with_timeout(system.timeout.unwrap_or(Duration::from_secs(30)));
    let mut reporter = scenario_reporter(root)?;
    let report = run_books_scenario(&config, &mut reporter).await?;
    reporter.finish("pass", vec![format!("status code {}", report.status_code)])?;

    if report.first_book.title != EXPECTED_TITLE {
        return Err(format!("unexpected live first record: {}", report.first_book.title).into());
    }
    Ok(())
}
