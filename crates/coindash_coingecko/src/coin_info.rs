use crate::method::Method;
use bon::Builder;
use coindash_shared_models::{Currency, MarketMetrics};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize, Debug, Builder)]
pub struct CoinInfoParams {
    #[serde(skip)]
    #[builder(into)]
    pub id: String,
    #[builder(default = false)]
    pub localization: bool,
    #[builder(default = false)]
    pub tickers: bool,
    #[builder(default = true)]
    pub market_data: bool,
    #[builder(default = false)]
    pub community_data: bool,
    #[builder(default = false)]
    pub developer_data: bool,
    #[builder(default = false)]
    pub sparkline: bool,
}

/// Amounts keyed by lowercase currency code.
pub type CurrencyValues = HashMap<String, f64>;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CoinImage {
    pub thumb: Option<String>,
    pub small: Option<String>,
    pub large: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CoinMarketData {
    pub current_price: CurrencyValues,
    pub market_cap: CurrencyValues,
    pub market_cap_rank: Option<u32>,
    pub total_volume: CurrencyValues,
    pub circulating_supply: Option<f64>,
    pub total_supply: Option<f64>,
    pub max_supply: Option<f64>,
    pub ath: CurrencyValues,
    pub ath_change_percentage: CurrencyValues,
    pub atl: CurrencyValues,
    pub atl_change_percentage: CurrencyValues,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d_in_currency: CurrencyValues,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct CoinInfo {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: CoinImage,
    pub market_data: Option<CoinMarketData>,
}

/// Value for `currency`, else the USD value, else zero.
fn pick(values: &CurrencyValues, currency: &Currency) -> f64 {
    values
        .get(currency.as_query())
        .or_else(|| values.get("usd"))
        .copied()
        .unwrap_or(0.0)
}

impl CoinMarketData {
    /// Projects every currency-keyed field onto `currency`.
    ///
    /// When upstream has no market cap quoted in `currency` the figures are
    /// USD and the returned metrics say so.
    pub fn metrics(&self, currency: &Currency) -> MarketMetrics {
        let currency = if self.market_cap.contains_key(currency.as_query()) {
            currency.clone()
        } else {
            if !currency.is_usd() {
                tracing::warn!(
                    requested = currency.as_query(),
                    "currency missing from market data, falling back to usd"
                );
            }
            Currency::usd()
        };

        let circulating_supply = self.circulating_supply.unwrap_or(0.0);
        let total_supply = self
            .total_supply
            .filter(|supply| *supply > 0.0)
            .unwrap_or(circulating_supply);

        MarketMetrics {
            market_cap: pick(&self.market_cap, &currency),
            rank: self.market_cap_rank.unwrap_or(0),
            volume_24h: pick(&self.total_volume, &currency),
            circulating_supply,
            total_supply,
            ath: pick(&self.ath, &currency),
            ath_change_percentage: pick(&self.ath_change_percentage, &currency),
            atl: pick(&self.atl, &currency),
            atl_change_percentage: pick(&self.atl_change_percentage, &currency),
            currency,
        }
    }
}

pub struct CoinDetails;

impl Method for CoinDetails {
    type Response = CoinInfo;
    type Params = CoinInfoParams;

    fn path(params: &Self::Params) -> String {
        format!("/coins/{}", urlencoding::encode(&params.id))
    }
}
