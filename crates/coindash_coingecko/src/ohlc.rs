use crate::method::Method;
use bon::Builder;
use coindash_shared_models::{Currency, OhlcDays, OhlcPoint};
use serde::Serialize;

#[derive(Serialize, Debug, Builder)]
pub struct OhlcParams {
    #[serde(skip)]
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub vs_currency: Currency,
    pub days: OhlcDays,
}

/// `[time, open, high, low, close]` rows.
pub type RawCandles = Vec<[f64; 5]>;

pub fn to_points(raw: RawCandles) -> Vec<OhlcPoint> {
    raw.into_iter().map(OhlcPoint::from).collect()
}

pub struct CoinOhlc;

impl Method for CoinOhlc {
    type Response = RawCandles;
    type Params = OhlcParams;

    fn path(params: &Self::Params) -> String {
        format!("/coins/{}/ohlc", urlencoding::encode(&params.id))
    }
}
