use serde::{Deserialize, Deserializer, Serialize};

use super::{CatalogCard, MarketplaceListing};

/// One entry in a mixed search result. Serialized without a tag; callers
/// tell the two apart by which fields are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchHit {
    Card(CatalogCard),
    Listing(MarketplaceListing),
}

impl From<CatalogCard> for SearchHit {
    fn from(card: CatalogCard) -> Self {
        SearchHit::Card(card)
    }
}

impl From<MarketplaceListing> for SearchHit {
    fn from(listing: MarketplaceListing) -> Self {
        SearchHit::Listing(listing)
    }
}

/// A JSON `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-source toggles sent with a search. Older clients send `ebay`;
/// either flag enables the marketplace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Filters {
    #[serde(deserialize_with = "null_as_default")]
    pub marketplace: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub ebay: bool,
}

impl Filters {
    pub fn wants_marketplace(&self) -> bool {
        self.marketplace || self.ebay
    }
}

/// Body of `POST /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub filters: Filters,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, marketplace: bool) -> Self {
        Self {
            query: Some(query.into()),
            filters: Filters {
                marketplace,
                ebay: false,
            },
        }
    }

    /// Trimmed query, or None when missing or blank.
    pub fn query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
