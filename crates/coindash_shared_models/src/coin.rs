use crate::currency::Currency;
use serde::{Deserialize, Serialize};

/// Headline price data for one coin, quoted in `currency`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CoinSnapshot {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub image: String,
    pub currency: Currency,
    pub current_price: f64,
    pub price_change_percentage_24h: f64,
    pub price_change_percentage_7d: Option<f64>,
    pub market_cap: f64,
    pub market_cap_rank: u32,
    pub total_volume: f64,
}

impl CoinSnapshot {
    /// Ticker symbol as shown to users, e.g. `BTC`.
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// Market statistics projected onto a single quote currency.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MarketMetrics {
    pub currency: Currency,
    pub market_cap: f64,
    pub rank: u32,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    pub ath: f64,
    pub ath_change_percentage: f64,
    pub atl: f64,
    pub atl_change_percentage: f64,
}
