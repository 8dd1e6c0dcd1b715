use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Wait applied when a 429 response carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Coin with id \"{id}\" not found")]
    NotFound { id: String },

    #[error("Rate limit exceeded, retry after {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("{message}")]
    Upstream {
        message: String,
        status: u16,
        code: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MarketError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MarketError::NotFound { .. } => Some(StatusCode::NOT_FOUND.as_u16()),
            MarketError::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS.as_u16()),
            MarketError::Upstream { status, .. } => Some(*status),
            MarketError::Network(e) => e.status().map(|s| s.as_u16()),
            MarketError::Decode(_) | MarketError::Config(_) => None,
        }
    }

    /// Machine-readable code: the upstream's own code when it sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            MarketError::NotFound { .. } => Some("COIN_NOT_FOUND"),
            MarketError::RateLimited { .. } => Some("RATE_LIMITED"),
            MarketError::Upstream { code, .. } => code.as_deref(),
            MarketError::Network(_) => Some("NETWORK_ERROR"),
            MarketError::Decode(_) => Some("DECODE_ERROR"),
            MarketError::Config(_) => Some("CONFIG_ERROR"),
        }
    }

    /// True for an empty markets result and for upstream 404s alike.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MarketError::NotFound { .. }) || self.status_code() == Some(404)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, MarketError::RateLimited { .. })
    }

    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MarketError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Classifies a non-2xx response.
    pub(crate) async fn from_response(response: Response) -> Self {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return MarketError::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            };
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();

        let message = parsed.message().unwrap_or_else(|| {
            format!(
                "API request failed: {}",
                status.canonical_reason().unwrap_or("unknown status")
            )
        });

        MarketError::Upstream {
            message,
            status: status.as_u16(),
            code: parsed.code(),
        }
    }
}

/// Reads `Retry-After` as delay-seconds; anything else falls back to the default.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[derive(Deserialize, Debug, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    status: Option<ErrorStatus>,
}

#[derive(Deserialize, Debug, Default)]
struct ErrorStatus {
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    error_message: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.error
            .as_ref()
            .and_then(value_to_string)
            .or_else(|| self.status.as_ref()?.error_message.clone())
            .filter(|message| !message.is_empty())
    }

    fn code(&self) -> Option<String> {
        self.code
            .as_ref()
            .and_then(value_to_string)
            .or_else(|| self.status.as_ref()?.error_code.as_ref().and_then(value_to_string))
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
