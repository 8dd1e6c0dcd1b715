pub mod coin_info;
pub mod config;
pub mod error;
pub mod market_chart;
pub mod markets;
pub mod method;
pub mod ohlc;
pub mod throttle;

pub use config::{CoinGeckoConfig, Tier};
pub use error::MarketError;
pub use throttle::Throttle;

use bon::bon;
use coin_info::{CoinDetails, CoinInfoParams};
use coindash_shared_models::{
    CoinSnapshot, Currency, Days, HistoricalSeries, MarketMetrics, OhlcDays, OhlcPoint,
};
use market_chart::{CoinMarketChart, MarketChartParams};
use markets::{CoinsMarkets, MarketsParams};
use ohlc::{CoinOhlc, OhlcParams};
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;

/// CoinGecko REST client. Clones share the HTTP pool and the throttle.
#[derive(Clone, Debug)]
pub struct CoinGeckoClient {
    reqwest: Client,
    base_url: String,
    tier: Tier,
    throttle: Arc<Throttle>,
}

#[bon]
impl CoinGeckoClient {
    /// `base_url` overrides the tier's host; `throttle` lets several clients
    /// share one request budget.
    #[builder]
    pub fn new(
        #[builder(default)] config: CoinGeckoConfig,
        #[builder(into)] base_url: Option<String>,
        throttle: Option<Arc<Throttle>>,
        timeout: Option<Duration>,
    ) -> Result<Self, MarketError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        match (&config.api_key, config.tier) {
            (Some(key), tier) => {
                let value = HeaderValue::from_str(key)
                    .map_err(|_| MarketError::Config("API key is not a valid header value".into()))?;
                headers.insert(HeaderName::from_static(tier.auth_header()), value);
            }
            (None, Tier::Pro) => {
                return Err(MarketError::Config(
                    "the pro tier requires an API key".into(),
                ));
            }
            (None, Tier::Demo) => {}
        }

        let mut builder = ClientBuilder::new().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let base_url = base_url
            .unwrap_or_else(|| config.tier.base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            reqwest: builder.build()?,
            base_url,
            tier: config.tier,
            throttle: throttle.unwrap_or_else(|| Arc::new(Throttle::new(config.min_interval))),
        })
    }
}

impl CoinGeckoClient {
    pub fn from_env() -> Result<Self, MarketError> {
        CoinGeckoClient::builder()
            .config(CoinGeckoConfig::from_env()?)
            .build()
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn throttle(&self) -> Arc<Throttle> {
        Arc::clone(&self.throttle)
    }

    /// Issues one throttled GET against `M` and decodes the body.
    pub async fn call<M: method::Method>(&self, params: &M::Params) -> Result<M::Response, MarketError> {
        let path = M::path(params);
        let url = format!("{}{}", self.base_url, path);

        self.throttle.wait().await;
        tracing::debug!(path = %path, "coingecko request");

        let response = self.reqwest.get(&url).query(params).send().await?;

        if !response.status().is_success() {
            let err = MarketError::from_response(response).await;
            match &err {
                MarketError::RateLimited { retry_after } => tracing::warn!(
                    path = %path,
                    retry_after_s = retry_after.as_secs(),
                    "coingecko rate limit hit"
                ),
                other => tracing::debug!(path = %path, error = %other, "coingecko request failed"),
            }
            return Err(err);
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Price headline for one coin. An empty markets list is `NotFound`.
    pub async fn get_coin_snapshot(
        &self,
        id: &str,
        currency: impl Into<Currency>,
    ) -> Result<CoinSnapshot, MarketError> {
        let currency = currency.into();
        let entries = self
            .call::<CoinsMarkets>(&MarketsParams::single(id, currency.clone()))
            .await?;

        entries
            .into_iter()
            .next()
            .map(|entry| entry.into_snapshot(currency))
            .ok_or_else(|| MarketError::NotFound { id: id.to_string() })
    }

    pub async fn get_market_metrics(
        &self,
        id: &str,
        currency: impl Into<Currency>,
    ) -> Result<MarketMetrics, MarketError> {
        let currency = currency.into();
        let info = self
            .call::<CoinDetails>(&CoinInfoParams::builder().id(id).build())
            .await?;

        Ok(info.market_data.unwrap_or_default().metrics(&currency))
    }

    pub async fn get_historical_series(
        &self,
        id: &str,
        days: Days,
        currency: impl Into<Currency>,
    ) -> Result<HistoricalSeries, MarketError> {
        let params = MarketChartParams::builder()
            .id(id)
            .vs_currency(currency)
            .days(days)
            .build();

        Ok(self.call::<CoinMarketChart>(&params).await?.into())
    }

    pub async fn get_ohlc(
        &self,
        id: &str,
        days: OhlcDays,
        currency: impl Into<Currency>,
    ) -> Result<Vec<OhlcPoint>, MarketError> {
        let params = OhlcParams::builder()
            .id(id)
            .vs_currency(currency)
            .days(days)
            .build();

        Ok(ohlc::to_points(self.call::<CoinOhlc>(&params).await?))
    }
}
