// crates/bookstore-conformance-core/src/scenario.rs
// ============================================================================
// Module: Books Scenario Runner
// Description: Ordered verification steps for the books endpoint.
// Purpose: Produce a pass/fail verdict with diagnostic artifacts per step.
// Dependencies: serde_jcs, serde_json, thiserror
// ============================================================================

//! ## Overview
//! One scenario, five steps, strictly in order: build the target URL, send
//! the GET, verify the status code, validate the body shape, verify the
//! first record's field values. The first failing step terminates the
//! scenario; every failure path attaches a human-readable artifact before
//! returning. There is no retained state across runs and no branching beyond
//! the verdicts themselves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::ScenarioConfig;
use crate::http::BookStoreClient;
use crate::http::HttpError;
use crate::record::Book;
use crate::record::BookShelf;
use crate::report::ArtifactKind;
use crate::report::ReportError;
use crate::report::Reporter;
use crate::schema::SchemaError;
use crate::schema::SchemaOutcome;
use crate::schema::validate_bookshelf;

// ============================================================================
// SECTION: Fixed Expectations
// ============================================================================

/// Fixed request path appended to the base URL.
pub const BOOKS_PATH: &str = "/BookStore/v1/Books";
/// Expected HTTP status code.
pub const EXPECTED_STATUS: u16 = 200;
/// Expected title of the first book record.
pub const EXPECTED_TITLE: &str = "Git Pocket Guide";
/// Expected author of the first book record.
pub const EXPECTED_AUTHOR: &str = "Richard E. Silverman";
/// Expected ISBN of the first book record.
pub const EXPECTED_ISBN: &str = "9781449325862";

/// Feature tag grouping this scenario in reports.
pub const FEATURE_TAG: &str = "Book Store API";
/// Category label for selective execution.
pub const CATEGORY_REGRESSION: &str = "regression";

/// Confirmation text attached when schema validation passes.
const SCHEMA_PASS_TEXT: &str = "JSON schema validation passed";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scenario failures, one variant per step that can fail.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Each failure is attached to the report before it is returned.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Network-level failure; reported as a test error rather than a clean
    /// assertion failure.
    #[error("transport failure: {0}")]
    Transport(#[from] HttpError),
    /// The service answered with an unexpected status code.
    #[error("expected status {EXPECTED_STATUS} but got {actual}")]
    UnexpectedStatus {
        /// Observed status code.
        actual: u16,
    },
    /// The response body is not parseable JSON.
    #[error("response body is not valid json: {reason}")]
    InvalidBody {
        /// Parser diagnostic.
        reason: String,
    },
    /// The fixed schema could not be compiled.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The response body does not match the expected shape.
    #[error("JSON schema validation failed: {diagnostic}")]
    SchemaMismatch {
        /// Validator diagnostic text.
        diagnostic: String,
    },
    /// The shelf contains no records to verify.
    #[error("book shelf contains no records")]
    EmptyShelf,
    /// A first-record field does not match its expected value.
    #[error("{field} mismatch: expected {expected:?}, observed {actual:?}")]
    FieldMismatch {
        /// Field label.
        field: &'static str,
        /// Expected literal.
        expected: String,
        /// Observed value.
        actual: String,
    },
    /// An artifact could not be attached.
    #[error(transparent)]
    Report(#[from] ReportError),
}

// ============================================================================
// SECTION: Scenario Runner
// ============================================================================

/// Successful scenario outcome.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Request URL the scenario hit.
    pub url: String,
    /// Observed status code.
    pub status_code: u16,
    /// The verified first record.
    pub first_book: Book,
}

/// Runs the books scenario against the configured service.
///
/// Steps execute strictly in order and the first failure terminates the
/// run. The caller owns the reporter and decides how to finalize it.
///
/// # Errors
///
/// Returns [`ScenarioError`] describing the first failing step; transport
/// failures and artifact write failures are surfaced through the same
/// taxonomy.
pub async fn run_books_scenario<R: Reporter>(
    config: &ScenarioConfig,
    reporter: &mut R,
) -> Result<ScenarioReport, ScenarioError> {
    reporter.begin_step("prepare request url")?;
    let client = BookStoreClient::new(config)?;
    let url = client.books_url();
    reporter.attach("Request URL", ArtifactKind::Text, &url)?;

    reporter.begin_step("send get request")?;
    let exchange = client.fetch_books().await?;
    reporter.attach("Response Body", ArtifactKind::Json, &exchange.body)?;
    reporter.attach("Response Status Code", ArtifactKind::Text, &exchange.status.to_string())?;

    reporter.begin_step("verify status code")?;
    if exchange.status != EXPECTED_STATUS {
        return Err(ScenarioError::UnexpectedStatus {
            actual: exchange.status,
        });
    }

    reporter.begin_step("validate response schema")?;
    let payload: Value =
        serde_json::from_str(&exchange.body).map_err(|err| ScenarioError::InvalidBody {
            reason: err.to_string(),
        })?;
    match validate_bookshelf(&payload)? {
        SchemaOutcome::Valid => {
            reporter.attach("Schema Validation", ArtifactKind::Text, SCHEMA_PASS_TEXT)?;
        }
        SchemaOutcome::Invalid {
            diagnostic,
        } => {
            reporter.attach("Schema Validation Error", ArtifactKind::Text, &diagnostic)?;
            return Err(ScenarioError::SchemaMismatch {
                diagnostic,
            });
        }
    }

    reporter.begin_step("verify first book fields")?;
    let shelf: BookShelf =
        serde_json::from_str(&exchange.body).map_err(|err| ScenarioError::InvalidBody {
            reason: err.to_string(),
        })?;
    let Some(first) = shelf.books.first() else {
        return Err(ScenarioError::EmptyShelf);
    };
    // Attached before the assertions so the record survives a mismatch.
    let first_json = serde_jcs::to_string(first).map_err(|err| ReportError::Encode {
        name: "First Book Details".to_string(),
        reason: err.to_string(),
    })?;
    reporter.attach("First Book Details", ArtifactKind::Json, &first_json)?;
    check_field("title", EXPECTED_TITLE, &first.title)?;
    check_field("author", EXPECTED_AUTHOR, &first.author)?;
    check_field("isbn", EXPECTED_ISBN, &first.isbn)?;

    Ok(ScenarioReport {
        url,
        status_code: exchange.status,
        first_book: first.clone(),
    })
}

/// Asserts exact string equality on one first-record field.
///
/// # Errors
///
/// Returns [`ScenarioError::FieldMismatch`] naming the field when the
/// observed value differs from the expected literal.
fn check_field(field: &'static str, expected: &str, actual: &str) -> Result<(), ScenarioError> {
    if actual == expected {
        return Ok(());
    }
    Err(ScenarioError::FieldMismatch {
        field,
        expected: expected.to_string(),
        actual: actual.to_string(),
    })
}
