use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::config;
use crate::error::ApiError;
use crate::events::{Function, FunctionEvent, FunctionResponse};
use crate::models::{Filters, SearchHit, SearchRequest};
use crate::search::SearchService;

/// Per-invocation adapter: one event in, one response out. Same search
/// logic as the persistent server.
#[derive(Debug, Clone)]
pub struct FunctionHandler {
    service: SearchService,
    allowed_origins: Vec<String>,
    allow_credentials: bool,
}

impl FunctionHandler {
    pub fn new(service: SearchService, server: &config::Server) -> Self {
        Self {
            service,
            allowed_origins: server.allowed_origins.clone(),
            allow_credentials: server.allow_credentials,
        }
    }

    pub async fn handle(&self, function: Function, event: &FunctionEvent) -> FunctionResponse {
        let method = event.http_method.to_ascii_uppercase();
        info!(?function, method = %method, "invocation");

        if method == "OPTIONS" {
            return self.preflight(event);
        }

        match function {
            Function::Search => match self.search(&method, event).await {
                Ok(hits) => self.respond(200, &hits, event),
                Err(e) => self.fail(e, event),
            },
            Function::FeaturedCards if method == "GET" => {
                let cards = self.service.featured().await;
                self.respond(200, &cards, event)
            }
            Function::FeaturedCards => self.fail(ApiError::MethodNotAllowed, event),
        }
    }

    async fn search(
        &self,
        method: &str,
        event: &FunctionEvent,
    ) -> Result<Vec<SearchHit>, ApiError> {
        let request = match method {
            // ?query=...&marketplace=true
            "GET" => SearchRequest {
                query: event.param("query").map(String::from),
                filters: Filters {
                    marketplace: flag(event, "marketplace"),
                    ebay: flag(event, "ebay"),
                },
            },
            "POST" => {
                let body = event.body.as_deref().unwrap_or_default();
                serde_json::from_str(body).map_err(|e| {
                    ApiError::Validation(format!("Invalid request body: {}", e))
                })?
            }
            _ => return Err(ApiError::MethodNotAllowed),
        };

        self.service.search(&request).await
    }

    fn fail(&self, err: ApiError, event: &FunctionEvent) -> FunctionResponse {
        self.respond(err.status_code().as_u16(), &err.body(), event)
    }

    fn respond<T: Serialize>(
        &self,
        status: u16,
        payload: &T,
        event: &FunctionEvent,
    ) -> FunctionResponse {
        let (status_code, body) = match serde_json::to_string(payload) {
            Ok(body) => (status, body),
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                let err = ApiError::Internal(e.to_string());
                (err.status_code().as_u16(), err.body().to_string())
            }
        };

        let mut headers = self.cors_headers(event);
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        FunctionResponse {
            status_code,
            headers,
            body,
        }
    }

    fn preflight(&self, event: &FunctionEvent) -> FunctionResponse {
        let mut headers = self.cors_headers(event);
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            "GET, POST, OPTIONS".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "content-type, authorization".to_string(),
        );
        FunctionResponse {
            status_code: 204,
            headers,
            body: String::new(),
        }
    }

    /// Echo the caller's origin only when it is on the allow-list.
    fn cors_headers(&self, event: &FunctionEvent) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Vary".to_string(), "Origin".to_string());

        let allowed = event
            .header("origin")
            .filter(|origin| self.allowed_origins.iter().any(|o| o == origin));
        if let Some(origin) = allowed {
            headers.insert("Access-Control-Allow-Origin".to_string(), origin.to_string());
            if self.allow_credentials {
                headers.insert(
                    "Access-Control-Allow-Credentials".to_string(),
                    "true".to_string(),
                );
            }
        }
        headers
    }
}

fn flag(event: &FunctionEvent, name: &str) -> bool {
    event
        .param(name)
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
