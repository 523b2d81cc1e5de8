use tracing::{error, info, warn};

use super::{fetch_json, RetryPolicy};
use crate::config::{Config, Secret};
use crate::error::UpstreamError;
use crate::models::{CatalogCard, CatalogResponse};

pub const UPSTREAM: &str = "catalog";

/// Page size for a direct name search.
pub const SEARCH_PAGE_SIZE: u32 = 10;
/// Page size when pulling a batch to pick featured cards from.
pub const BULK_PAGE_SIZE: u32 = 100;

/// Wrap a free-text query in the catalog's exact-name filter.
/// Embedded double quotes are escaped so they cannot close the phrase.
pub fn name_filter(query: &str) -> String {
    format!("name:\"{}\"", query.replace('"', "\\\""))
}

/// Client for the trading-card catalog API (`GET /cards`).
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Secret,
    retry: RetryPolicy,
}

impl CatalogClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.catalog.base_url.trim_end_matches('/').to_string(),
            api_key: config.credentials.catalog_api_key.clone(),
            retry: RetryPolicy::from_config(&config.upstream),
        }
    }

    /// Fetch up to `page_size` cards. `None` fetches without a filter.
    pub async fn search(
        &self,
        query: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<CatalogCard>, UpstreamError> {
        let url = format!("{}/cards", self.base_url);
        let shown = query.unwrap_or("*");
        info!(upstream = UPSTREAM, query = shown, page_size, "fetching catalog cards");

        let result = self
            .retry
            .run(UPSTREAM, || {
                let mut request = self.http.get(&url).header("X-Api-Key", self.api_key.expose());
                if let Some(q) = query {
                    request = request.query(&[("q", q)]);
                }
                fetch_json::<CatalogResponse>(UPSTREAM, request.query(&[("pageSize", page_size)]))
            })
            .await;

        match result {
            Ok(CatalogResponse { data: Some(items) }) => {
                Ok(items.into_iter().map(CatalogCard::from).collect())
            }
            Ok(CatalogResponse { data: None }) => {
                warn!(upstream = UPSTREAM, query = shown, "no data returned from catalog");
                Ok(Vec::new())
            }
            Err(e) => {
                error!(
                    upstream = UPSTREAM,
                    query = shown,
                    status = ?e.status(),
                    error = %e,
                    "catalog request failed"
                );
                Err(e)
            }
        }
    }
}
