use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set in the environment")]
    MissingSecret(&'static str),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// OAuth client-credentials exchange failures.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("token endpoint returned {0}")]
    Status(reqwest::StatusCode),

    #[error("token response has no access_token")]
    MissingToken,
}

/// Failure talking to one of the external APIs.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{upstream} request failed: {source}")]
    Request {
        upstream: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{upstream} request timed out")]
    Timeout { upstream: &'static str },

    #[error("{upstream} returned {status}")]
    Status {
        upstream: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{upstream} returned a malformed payload: {source}")]
    Malformed {
        upstream: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{upstream} response has no result collection")]
    MissingResults { upstream: &'static str },

    #[error("{upstream} authentication failed: {source}")]
    Auth {
        upstream: &'static str,
        #[source]
        source: AuthError,
    },
}

impl UpstreamError {
    /// Classify a transport error, splitting timeouts out.
    pub fn from_reqwest(upstream: &'static str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            UpstreamError::Timeout { upstream }
        } else {
            UpstreamError::Request { upstream, source }
        }
    }

    /// Whether a GET that failed this way may be sent again.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Request { .. } | UpstreamError::Timeout { .. } => true,
            UpstreamError::Status { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    /// HTTP status reported by the upstream, if it answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(status.as_u16()),
            UpstreamError::Auth {
                source: AuthError::Status(status),
                ..
            } => Some(status.as_u16()),
            _ => None,
        }
    }
}

/// Errors returned to callers of the HTTP surface.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// JSON body shape shared by both adapters: `{"error": "..."}`.
    pub fn body(&self) -> serde_json::Value {
        json!({ "error": self.to_string() })
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
