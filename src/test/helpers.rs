use serde_json::{json, Value};

use crate::config::{Config, Credentials, Secret};

pub const API_KEY: &str = "tcg-key";
pub const CLIENT_ID: &str = "app-id";
pub const CLIENT_SECRET: &str = "cert-secret";
/// base64("app-id:cert-secret")
pub const BASIC_AUTH: &str = "Basic YXBwLWlkOmNlcnQtc2VjcmV0";
pub const TOKEN: &str = "sandbox-token";

pub const TOKEN_PATH: &str = "/oauth2/token";
pub const SEARCH_PATH: &str = "/item_summary/search";

/// Config with every upstream pointed at one mock server.
pub fn config(server_url: &str) -> Config {
    let mut cfg = Config::default();
    cfg.catalog.base_url = server_url.to_string();
    cfg.marketplace.token_url = format!("{}{}", server_url, TOKEN_PATH);
    cfg.marketplace.base_url = server_url.to_string();
    cfg.upstream.timeout_secs = 2;
    cfg.credentials = Credentials {
        catalog_api_key: Secret::new(API_KEY),
        marketplace_client_id: Secret::new(CLIENT_ID),
        marketplace_client_secret: Secret::new(CLIENT_SECRET),
    };
    cfg
}

pub fn catalog_item(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "images": { "small": format!("https://images.pokemontcg.io/{}.png", id) },
        "set": { "name": "Base" },
        "rarity": "Rare Holo",
        "cardmarket": { "prices": { "averageSellPrice": 12.5 } }
    })
}

pub fn catalog_body(items: Vec<Value>) -> String {
    json!({ "data": items, "page": 1, "count": items.len() }).to_string()
}

pub fn token_body() -> String {
    json!({ "access_token": TOKEN, "expires_in": 7200, "token_type": "Application Access Token" })
        .to_string()
}

pub fn item_summary(id: &str, title: &str, value: &str) -> Value {
    json!({
        "itemId": id,
        "title": title,
        "price": { "value": value, "currency": "USD" },
        "image": { "imageUrl": format!("https://i.ebayimg.com/{}.jpg", id) },
        "itemWebUrl": format!("https://www.ebay.com/itm/{}", id)
    })
}

pub fn marketplace_body(items: Vec<Value>) -> String {
    json!({ "total": items.len(), "itemSummaries": items }).to_string()
}

/// Base URL of a port nothing listens on; connections are refused.
pub fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Base URL of a listener that accepts connections and never answers.
pub async fn silent_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}
