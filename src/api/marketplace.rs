use tracing::{debug, error, info};

use super::{fetch_json, RetryPolicy};
use crate::config::{Config, Secret};
use crate::error::{AuthError, UpstreamError};
use crate::models::{MarketplaceListing, SearchResponse, TokenResponse};

pub const UPSTREAM: &str = "marketplace";

/// Max listings per search.
pub const SEARCH_LIMIT: u32 = 10;

/// Client for the auction marketplace (OAuth client credentials, then
/// `GET /item_summary/search`).
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    token_url: String,
    base_url: String,
    scope: String,
    client_id: Secret,
    client_secret: Secret,
    retry: RetryPolicy,
}

impl MarketplaceClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            token_url: config.marketplace.token_url.clone(),
            base_url: config.marketplace.base_url.trim_end_matches('/').to_string(),
            scope: config.marketplace.scope.clone(),
            client_id: config.credentials.marketplace_client_id.clone(),
            client_secret: config.credentials.marketplace_client_secret.clone(),
            retry: RetryPolicy::from_config(&config.upstream),
        }
    }

    /// Exchange the client id/secret for a bearer token. Single attempt.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(self.client_id.expose(), Some(self.client_secret.expose()))
            .form(&[
                ("grant_type", "client_credentials"),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(AuthError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status));
        }

        let token: TokenResponse = response.json().await.map_err(AuthError::Request)?;
        token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)
    }

    /// Search listings. Errors are returned as-is; callers decide on fallback.
    pub async fn search(&self, query: &str) -> Result<Vec<MarketplaceListing>, UpstreamError> {
        info!(upstream = UPSTREAM, query, "fetching marketplace listings");

        let result = self.authorized_search(query).await;
        if let Err(e) = &result {
            error!(
                upstream = UPSTREAM,
                query,
                status = ?e.status(),
                error = %e,
                "marketplace request failed"
            );
        }
        result
    }

    async fn authorized_search(
        &self,
        query: &str,
    ) -> Result<Vec<MarketplaceListing>, UpstreamError> {
        let token = self
            .access_token()
            .await
            .map_err(|source| UpstreamError::Auth {
                upstream: UPSTREAM,
                source,
            })?;
        debug!(upstream = UPSTREAM, "acquired access token");

        let url = format!("{}/item_summary/search", self.base_url);
        let response: SearchResponse = self
            .retry
            .run(UPSTREAM, || {
                let request = self
                    .http
                    .get(&url)
                    .bearer_auth(&token)
                    .query(&[("q", query)])
                    .query(&[("limit", SEARCH_LIMIT)]);
                fetch_json(UPSTREAM, request)
            })
            .await?;

        let items = response
            .item_summaries
            .ok_or(UpstreamError::MissingResults { upstream: UPSTREAM })?;

        Ok(items.into_iter().map(MarketplaceListing::from).collect())
    }
}
