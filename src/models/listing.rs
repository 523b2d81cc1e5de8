use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::card::{NO_PRICE, UNKNOWN};
use super::scalar_text;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";
pub const MARKETPLACE_HOME: &str = "https://www.ebay.com";

/// Normalized marketplace record handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceListing {
    pub id: String,
    pub title: String,
    /// "<value> <currency>", or "N/A"
    pub price: String,
    pub currency: String,
    pub image_url: String,
    pub link: String,
}

impl MarketplaceListing {
    fn placeholder(n: u32, value: &str) -> Self {
        Self {
            id: format!("mock-{}", n),
            title: format!("Mock Card {}", n),
            price: format!("{} USD", value),
            currency: "USD".to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            link: MARKETPLACE_HOME.to_string(),
        }
    }
}

/// The fixed stand-in list served whenever the marketplace is unusable.
/// Same content every time.
pub fn placeholder_listings() -> Vec<MarketplaceListing> {
    vec![
        MarketplaceListing::placeholder(1, "20.00"),
        MarketplaceListing::placeholder(2, "15.00"),
    ]
}

// Upstream shape: {itemSummaries: [{itemId, title, price.{value,currency},
// image.imageUrl, itemWebUrl}]}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub item_summaries: Option<Vec<ItemSummary>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: Option<Value>,
    pub title: Option<Value>,
    pub price: Option<ItemPrice>,
    pub image: Option<ItemImage>,
    pub item_web_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemPrice {
    /// eBay sends a decimal string, but accept a bare number too.
    pub value: Option<Value>,
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemImage {
    pub image_url: Option<String>,
}

/// OAuth token endpoint reply. Keys are snake_case here, unlike the Browse API.
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn price_value(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

impl From<ItemSummary> for MarketplaceListing {
    fn from(item: ItemSummary) -> Self {
        let (value, currency) = match item.price {
            Some(p) => (price_value(p.value), non_empty(p.currency)),
            None => (None, None),
        };

        let price = match (&value, &currency) {
            (Some(v), Some(c)) => format!("{} {}", v, c),
            (Some(v), None) => v.clone(),
            (None, _) => NO_PRICE.to_string(),
        };

        MarketplaceListing {
            id: scalar_text(item.item_id).unwrap_or_default(),
            title: scalar_text(item.title).unwrap_or_else(|| UNKNOWN.to_string()),
            price,
            currency: currency.unwrap_or_default(),
            image_url: non_empty(item.image.and_then(|i| i.image_url))
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            link: non_empty(item.item_web_url).unwrap_or_else(|| MARKETPLACE_HOME.to_string()),
        }
    }
}
