pub mod config;
pub mod cryptopanic;
pub mod date;
pub mod error;
pub mod keyword_search;
mod text;

pub use config::NewsProvider;
pub use error::NewsError;

use bon::{Builder, bon};
use chrono::Utc;
use coindash_shared_models::NewsItem;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// What the caller knows about the coin the news is for.
#[derive(Debug, Clone, Default, Builder)]
pub struct NewsQuery {
    #[builder(into)]
    pub coin_id: Option<String>,
    #[builder(into)]
    pub symbol: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewsClient {
    reqwest: Client,
    provider: NewsProvider,
    cryptopanic_url: String,
    keyword_search_url: String,
}

#[bon]
impl NewsClient {
    #[builder]
    pub fn new(
        #[builder(default)] provider: NewsProvider,
        #[builder(into)] cryptopanic_url: Option<String>,
        #[builder(into)] keyword_search_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, NewsError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = ClientBuilder::new().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            reqwest: builder.build()?,
            provider,
            cryptopanic_url: cryptopanic_url.unwrap_or_else(|| cryptopanic::BASE_URL.to_string()),
            keyword_search_url: keyword_search_url
                .unwrap_or_else(|| keyword_search::BASE_URL.to_string()),
        })
    }
}

impl NewsClient {
    pub fn from_env() -> Result<Self, NewsError> {
        NewsClient::builder().provider(NewsProvider::from_env()).build()
    }

    pub fn provider(&self) -> &NewsProvider {
        &self.provider
    }

    /// Latest headlines from whichever provider is configured.
    ///
    /// CryptoPanic is filtered by `symbol`. Without one, the keyword search
    /// fallback is used when its key is set, otherwise the general CryptoPanic
    /// feed. Keyword search queries `coin_id`, then `symbol`, then a generic
    /// term.
    pub async fn get_crypto_news(&self, query: &NewsQuery) -> Result<Vec<NewsItem>, NewsError> {
        let symbol = query
            .symbol
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        match (&self.provider, symbol) {
            (NewsProvider::CryptoPanic { fallback: Some(key), .. }, None) => {
                self.keyword_search(key, query).await
            }
            (NewsProvider::CryptoPanic { auth, .. }, symbol) => {
                let params = cryptopanic::PostsParams::builder()
                    .auth(auth.as_str())
                    .maybe_currencies(symbol.map(str::to_uppercase))
                    .build();

                let body = self
                    .get_json("CryptoPanic", &self.cryptopanic_url, &params)
                    .await?;
                Ok(cryptopanic::normalize(&body))
            }
            (NewsProvider::KeywordSearch(key), _) => self.keyword_search(key, query).await,
            (NewsProvider::Unconfigured, _) => Err(NewsError::NotConfigured),
        }
    }

    async fn keyword_search(&self, key: &str, query: &NewsQuery) -> Result<Vec<NewsItem>, NewsError> {
        let q = [query.coin_id.as_deref(), query.symbol.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|term| !term.is_empty())
            .unwrap_or(keyword_search::DEFAULT_QUERY);
        let params = keyword_search::SearchParams::trailing_week(key, q, Utc::now());

        let body = self
            .get_json("news search", &self.keyword_search_url, &params)
            .await?;
        Ok(keyword_search::normalize(body))
    }

    async fn get_json<P: Serialize + ?Sized>(
        &self,
        provider: &'static str,
        url: &str,
        params: &P,
    ) -> Result<Value, NewsError> {
        tracing::debug!(provider, "news request");

        let response = self.reqwest.get(url).query(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(provider, status = status.as_u16(), "news request failed");
            return Err(NewsError::Upstream {
                provider,
                status: status.as_u16(),
                message: format!(
                    "Failed to fetch {provider}: {}",
                    status.canonical_reason().unwrap_or("unknown status")
                ),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
