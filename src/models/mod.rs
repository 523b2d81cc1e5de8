mod card;
mod listing;
mod search;

pub use card::{CatalogCard, CatalogItem, CatalogResponse, MarketPrice, NO_PRICE, UNKNOWN};
pub use listing::{
    placeholder_listings, ItemSummary, MarketplaceListing, SearchResponse, TokenResponse,
    MARKETPLACE_HOME, PLACEHOLDER_IMAGE,
};
pub use search::{Filters, SearchHit, SearchRequest};

use serde_json::Value;

/// Text form of an opaque upstream scalar. Numbers and booleans are
/// stringified; null, empty strings and structures count as absent.
fn scalar_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
