use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewsError {
    #[error("No news provider configured; set CRYPTOPANIC_API_KEY or THENEWSAPI_API_KEY")]
    NotConfigured,

    #[error("{message}")]
    Upstream {
        provider: &'static str,
        status: u16,
        message: String,
    },

    #[error("Failed to fetch news: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to decode news: {0}")]
    Decode(#[from] serde_json::Error),
}

impl NewsError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            NewsError::Upstream { status, .. } => Some(*status),
            NewsError::NotConfigured | NewsError::Fetch(_) | NewsError::Decode(_) => None,
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, NewsError::NotConfigured)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, NewsError::Fetch(err) if err.is_timeout())
    }
}
