use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// Shape of one serverless invocation (Netlify/Lambda style). Only the
// fields the handlers read are modelled.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunctionEvent {
    pub http_method: String,
    // The runtime sends null instead of {} when there are no parameters
    pub query_string_parameters: Option<HashMap<String, String>>,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl FunctionEvent {
    pub fn get(params: &[(&str, &str)]) -> Self {
        Self {
            http_method: "GET".to_string(),
            query_string_parameters: Some(
                params
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|p| p.get(name))
            .map(String::as_str)
    }

    /// Header lookup ignoring case; runtimes disagree on casing.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// What the runtime expects back. `body` is already-serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Which function is being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Search,
    FeaturedCards,
}

impl std::str::FromStr for Function {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "search" => Ok(Function::Search),
            "featured-cards" => Ok(Function::FeaturedCards),
            other => Err(format!("unknown function: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_event() {
        let event: FunctionEvent = serde_json::from_value(json!({
            "httpMethod": "GET",
            "queryStringParameters": { "query": "Pikachu" },
            "headers": { "origin": "http://localhost:3000" },
            "body": null,
            "isBase64Encoded": false
        }))
        .unwrap();

        assert_eq!(event.http_method, "GET");
        assert_eq!(event.param("query"), Some("Pikachu"));
        assert_eq!(event.header("Origin"), Some("http://localhost:3000"));
        assert_eq!(event.body, None);
    }

    #[test]
    fn test_null_parameters() {
        let event: FunctionEvent = serde_json::from_value(json!({
            "httpMethod": "GET",
            "queryStringParameters": null
        }))
        .unwrap();
        assert_eq!(event.param("query"), None);
    }

    #[test]
    fn test_function_names() {
        assert_eq!("search".parse::<Function>(), Ok(Function::Search));
        assert_eq!("featured-cards".parse::<Function>(), Ok(Function::FeaturedCards));
        assert!("orders".parse::<Function>().is_err());
    }
}
