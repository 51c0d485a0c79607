//! HTTP client for the Overpass `interpreter` endpoint.
//!
//! Wraps `reqwest` with a fixed supermarket query, typed response
//! deserialization, and surfaces server-side runtime errors reported in the
//! `remark` field as [`OverpassError::Remark`].

use std::time::Duration;

use reqwest::{Client, Url};
use scanprice_core::{Coordinate, SupermarketCandidate};

use crate::error::OverpassError;
use crate::types::OverpassResponse;

const INTERPRETER_PATH: &str = "api/interpreter";

/// Overpass QL for supermarket nodes within `radius_m` metres of `at`.
#[must_use]
pub fn supermarket_query(at: Coordinate, radius_m: u32) -> String {
    format!(
        "[out:json];node(around:{radius_m},{},{})[shop=supermarket];out;",
        at.latitude(),
        at.longitude()
    )
}

/// Client for the Overpass API.
///
/// The base URL comes from configuration, so the same client serves the
/// public instance, a mirror or a mock server.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    interpreter_url: Url,
}

impl OverpassClient {
    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`OverpassError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, OverpassError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let interpreter_url = Url::parse(&normalised)
            .and_then(|base| base.join(INTERPRETER_PATH))
            .map_err(|e| OverpassError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            interpreter_url,
        })
    }

    /// Finds supermarket nodes within `radius_m` metres of `at`.
    ///
    /// Returns one candidate per element, in the order the server sent them.
    /// A single request; no retry and no pagination.
    ///
    /// # Errors
    ///
    /// - [`OverpassError::Http`] on network failure, timeout or non-2xx status.
    /// - [`OverpassError::Deserialize`] if the body is not the expected JSON.
    /// - [`OverpassError::Remark`] if the server reports a runtime error.
    pub async fn supermarkets_near(
        &self,
        at: Coordinate,
        radius_m: u32,
    ) -> Result<Vec<SupermarketCandidate>, OverpassError> {
        let query = supermarket_query(at, radius_m);
        let url = self.build_url(&query);
        tracing::debug!(%url, radius_m, "querying Overpass for supermarkets");

        let response: OverpassResponse = self.request_json(&url).await?;
        if let Some(remark) = response.remark.filter(|r| r.contains("runtime error")) {
            return Err(OverpassError::Remark(remark));
        }

        tracing::debug!(count = response.elements.len(), "Overpass returned elements");
        Ok(response
            .elements
            .into_iter()
            .map(crate::types::Element::into_candidate)
            .collect())
    }

    /// Builds the interpreter URL with the query in the percent-encoded
    /// `data` parameter.
    fn build_url(&self, query: &str) -> Url {
        let mut url = self.interpreter_url.clone();
        url.query_pairs_mut().append_pair("data", query);
        url
    }

    /// Sends a GET request, asserts a 2xx status, and parses the body.
    async fn request_json(&self, url: &Url) -> Result<OverpassResponse, OverpassError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| OverpassError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
