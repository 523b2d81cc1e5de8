use tracing::warn;

use crate::error::{ApiError, UpstreamError};
use crate::models::{placeholder_listings, CatalogCard, MarketplaceListing};

/// Marketplace: any failure degrades to the fixed placeholder listings.
pub fn listings_or_placeholders(
    query: &str,
    result: Result<Vec<MarketplaceListing>, UpstreamError>,
) -> Vec<MarketplaceListing> {
    match result {
        Ok(listings) => listings,
        Err(e) => {
            warn!(query, error = %e, "serving placeholder marketplace listings");
            placeholder_listings()
        }
    }
}

/// Catalog on the direct search path: failures reach the caller.
pub fn cards_or_error(
    result: Result<Vec<CatalogCard>, UpstreamError>,
) -> Result<Vec<CatalogCard>, ApiError> {
    result.map_err(ApiError::from)
}

/// Catalog on the featured path: a failed lookup is skipped.
pub fn cards_or_empty(
    lookup: &str,
    result: Result<Vec<CatalogCard>, UpstreamError>,
) -> Vec<CatalogCard> {
    result.unwrap_or_else(|e| {
        warn!(lookup, error = %e, "skipping failed featured lookup");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(upstream: &'static str, code: u16) -> UpstreamError {
        UpstreamError::Status {
            upstream,
            status: reqwest::StatusCode::from_u16(code).unwrap(),
        }
    }

    #[test]
    fn test_marketplace_failure_is_placeholders() {
        let first = listings_or_placeholders("Pikachu", Err(status_error("marketplace", 503)));
        let second = listings_or_placeholders(
            "Pikachu",
            Err(UpstreamError::MissingResults { upstream: "marketplace" }),
        );

        assert_eq!(first, placeholder_listings());
        assert_eq!(first, second);
    }

    #[test]
    fn test_marketplace_success_passes_through() {
        assert!(listings_or_placeholders("Pikachu", Ok(Vec::new())).is_empty());
    }

    #[test]
    fn test_catalog_search_failure_is_internal() {
        let err = cards_or_error(Err(status_error("catalog", 500))).unwrap_err();
        assert!(matches!(err, ApiError::Internal(_)));
        assert!(err.to_string().contains("catalog"));
    }

    #[test]
    fn test_featured_failure_is_empty() {
        assert!(cards_or_empty("Mewtwo", Err(status_error("catalog", 404))).is_empty());
    }
}
