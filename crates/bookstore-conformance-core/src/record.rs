// crates/bookstore-conformance-core/src/record.rs
// ============================================================================
// Module: Book Records
// Description: Typed models for the Book Store response envelope.
// Purpose: Decode the books payload for field-level verification.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Records are read-only snapshots of one HTTP response. They are decoded for
//! field verification and artifact capture, never persisted, and discarded
//! when the scenario completes.

use serde::Deserialize;
use serde::Serialize;

/// A single book record as served by the Book Store API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// ISBN identifier.
    pub isbn: String,
    /// Book title.
    pub title: String,
    /// Optional subtitle; absent records omit the key entirely.
    #[serde(rename = "subTitle", skip_serializing_if = "Option::is_none")]
    pub sub_title: Option<String>,
    /// Author name.
    pub author: String,
    /// Publication timestamp string.
    pub publish_date: String,
    /// Publisher name.
    pub publisher: String,
    /// Page count.
    pub pages: i64,
    /// Free-form description.
    pub description: String,
    /// Website URL string.
    pub website: String,
}

/// The response envelope: an ordered sequence of book records.
///
/// # Invariants
/// - `books` preserves the order served by the API; the scenario verifies
///   the record at index 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookShelf {
    /// Ordered book records.
    pub books: Vec<Book>,
}
