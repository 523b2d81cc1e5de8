mod featured;
mod policy;

pub use policy::{cards_or_empty, cards_or_error, listings_or_placeholders};

use tracing::{error, info};

use crate::api::{self, name_filter, CatalogClient, MarketplaceClient, SEARCH_PAGE_SIZE};
use crate::config::{self, Config};
use crate::error::ApiError;
use crate::models::{CatalogCard, SearchHit, SearchRequest};

pub const QUERY_REQUIRED: &str = "Query parameter is required";

/// Search and featured-selection logic shared by every transport adapter.
#[derive(Debug, Clone)]
pub struct SearchService {
    catalog: CatalogClient,
    marketplace: MarketplaceClient,
    search: config::Search,
    featured: config::Featured,
}

impl SearchService {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = api::http_client(&config.upstream)?;
        Ok(Self {
            catalog: CatalogClient::new(http.clone(), config),
            marketplace: MarketplaceClient::new(http, config),
            search: config.search.clone(),
            featured: config.featured.clone(),
        })
    }

    /// Catalog cards for the exact name, then marketplace listings when
    /// asked for. Both sources are fetched concurrently.
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, ApiError> {
        let query = request
            .query()
            .ok_or_else(|| ApiError::Validation(QUERY_REQUIRED.to_string()))?;
        let with_marketplace =
            request.filters.wants_marketplace() || self.search.always_query_marketplace;
        info!(query, marketplace = with_marketplace, "searching");

        let filter = name_filter(query);
        let catalog = self.catalog.search(Some(&filter), SEARCH_PAGE_SIZE);
        let marketplace = async {
            if with_marketplace {
                listings_or_placeholders(query, self.marketplace.search(query).await)
            } else {
                Vec::new()
            }
        };

        let (cards, listings) = tokio::join!(catalog, marketplace);
        let cards = cards_or_error(cards).inspect_err(|e| {
            error!(query, error = %e, "search failed");
        })?;

        let mut hits = Vec::with_capacity(cards.len() + listings.len());
        hits.extend(cards.into_iter().map(SearchHit::from));
        hits.extend(listings.into_iter().map(SearchHit::from));
        Ok(hits)
    }

    /// Up to `featured.count` cards. Never fails; may be empty.
    pub async fn featured(&self) -> Vec<CatalogCard> {
        featured::select(&self.catalog, &self.featured).await
    }
}
