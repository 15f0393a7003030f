//! API client for the PokeAPI REST catalog.
//!
//! Two operations matter to the pipeline: fetching one page of a listing
//! endpoint and resolving a detail URL. Both are expressed through the
//! `CatalogSource` trait so the lister and normalizer can run against an
//! offline fake in tests; `ApiClient` is the production implementation.

use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::models::{DetailResource, ListPage};

use super::ApiError;

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Source of catalog listing pages and detail resources.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    /// Fetch one window of a listing endpoint starting at `offset`.
    async fn list_page(&self, endpoint: &str, offset: u64, limit: u64)
        -> Result<ListPage, ApiError>;

    /// Resolve a detail resource by its absolute URL.
    async fn fetch_detail(&self, url: &str) -> Result<DetailResource, ApiError>;
}

/// API client for the PokeAPI catalog.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL
    /// (e.g. `https://pokeapi.co/api/v2`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}

impl CatalogSource for ApiClient {
    async fn list_page(
        &self,
        endpoint: &str,
        offset: u64,
        limit: u64,
    ) -> Result<ListPage, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, offset, limit, "Fetching listing page");

        let page: ListPage = self
            .get_json(
                &url,
                &[("offset", offset.to_string()), ("limit", limit.to_string())],
            )
            .await?;

        debug!(endpoint, offset, fetched = page.results.len(), "Listing page received");
        Ok(page)
    }

    async fn fetch_detail(&self, url: &str) -> Result<DetailResource, ApiError> {
        debug!(url, "Fetching detail resource");
        self.get_json(url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("https://pokeapi.co/api/v2/").expect("client");
        assert_eq!(client.base_url, "https://pokeapi.co/api/v2");
    }

    #[test]
    fn test_parse_list_page() {
        let json = r#"{
            "count": 1302,
            "next": "https://pokeapi.co/api/v2/pokemon?offset=100&limit=100",
            "previous": null,
            "results": [
                {"name": "bulbasaur", "url": "https://pokeapi.co/api/v2/pokemon/1/"},
                {"name": "ivysaur", "url": "https://pokeapi.co/api/v2/pokemon/2/"}
            ]
        }"#;

        let page: ListPage = serde_json::from_str(json).expect("parse list page");
        assert_eq!(page.count, Some(1302));
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].name, "bulbasaur");
        assert_eq!(page.results[1].url, "https://pokeapi.co/api/v2/pokemon/2/");
    }
}
