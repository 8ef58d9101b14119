// crates/bookstore-conformance-core/src/http.rs
// ============================================================================
// Module: Book Store HTTP Client
// Description: Thin HTTP wrapper for the books endpoint.
// Purpose: Perform the scenario's single GET with no retry or recovery.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! The client issues exactly one GET per scenario run. There is no retry, no
//! backoff, and no pagination; a transport failure on the first attempt
//! surfaces directly so the runner reports it as a test error rather than a
//! clean assertion failure.

use reqwest::Client;
use thiserror::Error;

use crate::config::ScenarioConfig;
use crate::scenario::BOOKS_PATH;

/// HTTP transport errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The underlying client could not be constructed.
    #[error("failed to build http client: {0}")]
    BuildClient(#[source] reqwest::Error),
    /// The request failed at the network level.
    #[error("http request failed: {0}")]
    Request(#[source] reqwest::Error),
    /// The response body could not be read.
    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Raw outcome of one GET against the books endpoint.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    /// Numeric HTTP status code.
    pub status: u16,
    /// Raw response body text.
    pub body: String,
}

/// HTTP client bound to one Book Store base URL.
#[derive(Debug, Clone)]
pub struct BookStoreClient {
    /// Underlying reqwest client.
    client: Client,
    /// Base URL without a trailing slash.
    base_url: String,
}

impl BookStoreClient {
    /// Builds a client from the scenario configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::BuildClient`] when the underlying client cannot
    /// be constructed.
    pub fn new(config: &ScenarioConfig) -> Result<Self, HttpError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(HttpError::BuildClient)?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the fully built books endpoint URL.
    ///
    /// The fixed path is concatenated onto the base URL; no templating and
    /// no query parameters.
    #[must_use]
    pub fn books_url(&self) -> String {
        format!("{}{BOOKS_PATH}", self.base_url)
    }

    /// Performs the single GET against the books endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when the request fails at the network level or
    /// the body cannot be read. No retry is attempted.
    pub async fn fetch_books(&self) -> Result<HttpExchange, HttpError> {
        let response =
            self.client.get(self.books_url()).send().await.map_err(HttpError::Request)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(HttpError::Body)?;
        Ok(HttpExchange {
            status,
            body,
        })
    }
}
