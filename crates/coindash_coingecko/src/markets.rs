use crate::method::Method;
use bon::Builder;
use coindash_shared_models::{CoinSnapshot, Currency};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Builder)]
pub struct MarketsParams {
    #[builder(into)]
    pub vs_currency: Currency,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[builder(default)]
    pub sparkline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub price_change_percentage: Option<String>,
}

impl MarketsParams {
    /// Query for exactly one coin, with 24h and 7d change columns.
    pub fn single(id: &str, vs_currency: Currency) -> Self {
        MarketsParams::builder()
            .vs_currency(vs_currency)
            .ids(id)
            .order("market_cap_desc")
            .per_page(1)
            .page(1)
            .price_change_percentage("24h,7d")
            .build()
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d_in_currency: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub total_volume: Option<f64>,
}

impl MarketEntry {
    pub fn into_snapshot(self, currency: Currency) -> CoinSnapshot {
        CoinSnapshot {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            image: self.image.unwrap_or_default(),
            currency,
            current_price: amount(self.current_price),
            price_change_percentage_24h: self.price_change_percentage_24h.unwrap_or(0.0),
            price_change_percentage_7d: self.price_change_percentage_7d_in_currency,
            market_cap: amount(self.market_cap),
            market_cap_rank: self.market_cap_rank.unwrap_or(0),
            total_volume: amount(self.total_volume),
        }
    }
}

fn amount(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

pub struct CoinsMarkets;

impl Method for CoinsMarkets {
    type Response = Vec<MarketEntry>;
    type Params = MarketsParams;

    fn path(_: &Self::Params) -> String {
        String::from("/coins/markets")
    }
}
