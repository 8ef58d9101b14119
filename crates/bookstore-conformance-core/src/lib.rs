// crates/bookstore-conformance-core/src/lib.rs
// ============================================================================
// Module: Bookstore Conformance Core
// Description: Scenario runner, schema validation, and reporting primitives.
// Purpose: Provide the Book Store conformance scenario as a reusable library.
// Dependencies: jsonschema, reqwest, serde, thiserror
// ============================================================================

//! ## Overview
//! This crate implements one conformance scenario against a public Book Store
//! REST service: issue a single GET, verify the status code, validate the
//! body against a fixed JSON Schema, and verify the first record's fields.
//! Every step attaches named diagnostic artifacts through an explicit
//! [`report::Reporter`] so runs stay inspectable after the fact.
//!
//! Configuration is constructed explicitly and passed in; the scenario never
//! reads ambient process state on its own.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod http;
pub mod record;
pub mod report;
pub mod scenario;
pub mod schema;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use config::ConfigError;
pub use config::ScenarioConfig;
pub use config::ScenarioEnv;
pub use http::BookStoreClient;
pub use http::HttpError;
pub use http::HttpExchange;
pub use record::Book;
pub use record::BookShelf;
pub use report::ArtifactKind;
pub use report::FsReporter;
pub use report::ReportError;
pub use report::Reporter;
pub use report::RunArtifacts;
pub use scenario::ScenarioError;
pub use scenario::ScenarioReport;
pub use scenario::run_books_scenario;
pub use schema::SchemaError;
pub use schema::SchemaOutcome;
pub use schema::bookshelf_schema;
pub use schema::validate_bookshelf;
