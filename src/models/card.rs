use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::scalar_text;

pub const UNKNOWN: &str = "Unknown";
pub const NO_PRICE: &str = "N/A";

/// Market average price, passed through as the upstream gave it.
/// A JSON number stays a number on the way out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MarketPrice {
    Amount(Number),
    Label(String),
}

impl MarketPrice {
    pub fn unavailable() -> Self {
        MarketPrice::Label(NO_PRICE.to_string())
    }

    /// Zero, null and empty strings count as "no price".
    fn from_upstream(value: Option<Value>) -> Self {
        match value {
            Some(Value::Number(n)) if n.as_f64() != Some(0.0) => MarketPrice::Amount(n),
            Some(Value::String(s)) if !s.is_empty() => MarketPrice::Label(s),
            _ => MarketPrice::unavailable(),
        }
    }
}

/// Normalized catalog record handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCard {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub set: String,
    pub rarity: String,
    pub prices: MarketPrice,
}

// Upstream shape: {data: [{id, name, images.small, set.name, rarity,
// cardmarket.prices.averageSellPrice}]}. Everything optional.

#[derive(Debug, Default, Deserialize)]
pub struct CatalogResponse {
    pub data: Option<Vec<CatalogItem>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogItem {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub images: Option<CatalogImages>,
    pub set: Option<CatalogSet>,
    pub rarity: Option<Value>,
    pub cardmarket: Option<CardMarket>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogImages {
    pub small: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CatalogSet {
    pub name: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CardMarket {
    pub prices: Option<CardMarketPrices>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMarketPrices {
    pub average_sell_price: Option<Value>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<CatalogItem> for CatalogCard {
    fn from(item: CatalogItem) -> Self {
        let price = item
            .cardmarket
            .and_then(|m| m.prices)
            .and_then(|p| p.average_sell_price);

        CatalogCard {
            id: scalar_text(item.id).unwrap_or_default(),
            name: scalar_text(item.name).unwrap_or_default(),
            image_url: non_empty(item.images.and_then(|i| i.small)).unwrap_or_default(),
            set: scalar_text(item.set.and_then(|s| s.name)).unwrap_or_else(|| UNKNOWN.to_string()),
            rarity: scalar_text(item.rarity).unwrap_or_else(|| UNKNOWN.to_string()),
            prices: MarketPrice::from_upstream(price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: Value) -> CatalogItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_full_item() {
        let card = CatalogCard::from(item(json!({
            "id": "base1-4",
            "name": "Charizard",
            "images": { "small": "https://images.example/base1-4.png" },
            "set": { "name": "Base" },
            "rarity": "Rare Holo",
            "cardmarket": { "prices": { "averageSellPrice": 312.75 } }
        })));

        assert_eq!(card.id, "base1-4");
        assert_eq!(card.name, "Charizard");
        assert_eq!(card.image_url, "https://images.example/base1-4.png");
        assert_eq!(card.set, "Base");
        assert_eq!(card.rarity, "Rare Holo");
        assert_eq!(card.prices, MarketPrice::Amount(Number::from_f64(312.75).unwrap()));
    }

    #[test]
    fn test_missing_substructures_use_defaults() {
        let card = CatalogCard::from(item(json!({ "id": "xy1-1", "name": "Venusaur-EX" })));

        assert_eq!(card.image_url, "");
        assert_eq!(card.set, "Unknown");
        assert_eq!(card.rarity, "Unknown");
        assert_eq!(card.prices, MarketPrice::unavailable());
    }

    #[test]
    fn test_partial_nesting() {
        // cardmarket present but without prices, set present but unnamed
        let card = CatalogCard::from(item(json!({
            "id": "a",
            "name": "b",
            "images": {},
            "set": { "name": null },
            "rarity": "",
            "cardmarket": { "url": "https://cardmarket.example" }
        })));

        assert_eq!(card.image_url, "");
        assert_eq!(card.set, "Unknown");
        assert_eq!(card.rarity, "Unknown");
        assert_eq!(card.prices, MarketPrice::unavailable());
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let card = CatalogCard::from(item(json!({ "id": 42, "name": 151, "rarity": true })));

        assert_eq!(card.id, "42");
        assert_eq!(card.name, "151");
        assert_eq!(card.rarity, "true");
    }

    #[test]
    fn test_structured_name_is_absent() {
        let card = CatalogCard::from(item(json!({
            "id": "a",
            "name": { "en": "Pikachu" },
            "set": { "name": ["Base"] }
        })));

        assert_eq!(card.name, "");
        assert_eq!(card.set, "Unknown");
    }

    #[test]
    fn test_zero_price_is_unavailable() {
        let card = CatalogCard::from(item(json!({
            "id": "a",
            "cardmarket": { "prices": { "averageSellPrice": 0 } }
        })));
        assert_eq!(card.prices, MarketPrice::unavailable());
    }

    #[test]
    fn test_price_stays_numeric() {
        let card = CatalogCard::from(item(json!({
            "id": "a",
            "cardmarket": { "prices": { "averageSellPrice": 12.5 } }
        })));

        let out = serde_json::to_value(&card).unwrap();
        assert_eq!(out["prices"], json!(12.5));
        assert!(out["prices"].is_number());
    }

    #[test]
    fn test_every_field_serialized() {
        let card = CatalogCard::from(CatalogItem::default());
        let out = serde_json::to_value(&card).unwrap();
        let obj = out.as_object().unwrap();

        for key in ["id", "name", "imageUrl", "set", "rarity", "prices"] {
            assert!(obj.contains_key(key), "missing {}", key);
        }
        assert_eq!(out["prices"], "N/A");
    }
}
