// crates/bookstore-conformance-core/src/schema.rs
// ============================================================================
// Module: Response Schema
// Description: Fixed JSON Schema for the books response envelope.
// Purpose: Validate response shape and report mismatches as result values.
// Dependencies: jsonschema, serde_json
// ============================================================================

//! ## Overview
//! The expected response shape is pinned as a draft 2020-12 schema.
//! Validation returns a [`SchemaOutcome`] value instead of raising, so the
//! scenario maps mismatches to explicit failures. `format` keywords
//! (`date-time`, `uri`) stay annotations rather than assertions, matching
//! the validator defaults the scenario was calibrated against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonschema::Draft;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Schema Definition
// ============================================================================

/// Returns the expected schema for the books response envelope.
///
/// Every field except `subTitle` is required on each record; the `books`
/// sequence itself is required on the envelope.
#[must_use]
pub fn bookshelf_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "books": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "isbn": {"type": "string"},
                        "title": {"type": "string"},
                        "subTitle": {"type": "string"},
                        "author": {"type": "string"},
                        "publish_date": {"type": "string", "format": "date-time"},
                        "publisher": {"type": "string"},
                        "pages": {"type": "integer"},
                        "description": {"type": "string"},
                        "website": {"type": "string", "format": "uri"}
                    },
                    "required": [
                        "isbn", "title", "author", "publish_date",
                        "publisher", "pages", "description", "website"
                    ]
                }
            }
        },
        "required": ["books"]
    })
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Schema infrastructure errors, distinct from payload mismatches.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The fixed schema failed to compile.
    #[error("failed to compile bookshelf schema: {reason}")]
    Compile {
        /// Compiler diagnostic.
        reason: String,
    },
}

/// Outcome of validating a payload against the bookshelf schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// The payload conforms to the expected shape.
    Valid,
    /// The payload does not conform; the diagnostic lists every violation
    /// with its instance path.
    Invalid {
        /// Joined validator diagnostics, deterministic for a fixed payload.
        diagnostic: String,
    },
}

/// Validates a parsed response payload against the bookshelf schema.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] when the fixed schema itself cannot be
/// compiled; payload mismatches are reported through
/// [`SchemaOutcome::Invalid`], not as errors.
pub fn validate_bookshelf(payload: &Value) -> Result<SchemaOutcome, SchemaError> {
    let schema = bookshelf_schema();
    let validator = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| SchemaError::Compile {
            reason: err.to_string(),
        })?;
    let diagnostics: Vec<String> = validator
        .iter_errors(payload)
        .map(|error| format!("{error} at {}", error.instance_path()))
        .collect();
    if diagnostics.is_empty() {
        return Ok(SchemaOutcome::Valid);
    }
    Ok(SchemaOutcome::Invalid {
        diagnostic: diagnostics.join("; "),
    })
}
