use std::env;
use std::fmt;

pub const CRYPTOPANIC_KEY_VAR: &str = "CRYPTOPANIC_API_KEY";
pub const KEYWORD_SEARCH_KEY_VAR: &str = "THENEWSAPI_API_KEY";

/// Upstream chosen once from the credentials available.
#[derive(Clone, PartialEq, Eq, Default)]
pub enum NewsProvider {
    /// Symbol-aware feed authenticated with an `auth` query key. `fallback`
    /// is the keyword search key, used for queries without a symbol.
    CryptoPanic {
        auth: String,
        fallback: Option<String>,
    },
    /// Keyword search authenticated with an `apikey` query key.
    KeywordSearch(String),
    #[default]
    Unconfigured,
}

impl NewsProvider {
    /// CryptoPanic wins when both keys are present and keeps the other as
    /// its fallback.
    pub fn resolve(cryptopanic_key: Option<String>, keyword_search_key: Option<String>) -> Self {
        let usable = |key: Option<String>| key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty());

        match (usable(cryptopanic_key), usable(keyword_search_key)) {
            (Some(auth), fallback) => NewsProvider::CryptoPanic { auth, fallback },
            (None, Some(key)) => NewsProvider::KeywordSearch(key),
            (None, None) => NewsProvider::Unconfigured,
        }
    }

    pub fn from_env() -> Self {
        Self::resolve(
            env::var(CRYPTOPANIC_KEY_VAR).ok(),
            env::var(KEYWORD_SEARCH_KEY_VAR).ok(),
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NewsProvider::CryptoPanic { .. } => "cryptopanic",
            NewsProvider::KeywordSearch(_) => "keyword-search",
            NewsProvider::Unconfigured => "unconfigured",
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, NewsProvider::Unconfigured)
    }
}

impl fmt::Debug for NewsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsProvider::CryptoPanic { fallback, .. } => f
                .debug_struct("CryptoPanic")
                .field("auth", &"<redacted>")
                .field("fallback", &fallback.as_ref().map(|_| "<redacted>"))
                .finish(),
            NewsProvider::KeywordSearch(_) => f.write_str("KeywordSearch(<redacted>)"),
            NewsProvider::Unconfigured => f.write_str("Unconfigured"),
        }
    }
}
