use crate::method::Method;
use bon::Builder;
use coindash_shared_models::{Currency, Days, HistoricalSeries, SeriesPoint};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug, Builder)]
pub struct MarketChartParams {
    #[serde(skip)]
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub vs_currency: Currency,
    #[builder(default)]
    pub days: Days,
    /// Upstream picks granularity from `days` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub interval: Option<String>,
}

/// `[timestamp_ms, value]` pairs; values can be null for gaps.
pub type RawSeries = Vec<(f64, Option<f64>)>;

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default)]
pub struct MarketChart {
    pub prices: RawSeries,
    pub market_caps: RawSeries,
    pub total_volumes: RawSeries,
}

fn to_points(raw: RawSeries) -> Vec<SeriesPoint> {
    raw.into_iter()
        .map(|(timestamp, value)| SeriesPoint {
            timestamp: timestamp as i64,
            value: value.unwrap_or(0.0),
        })
        .collect()
}

impl From<MarketChart> for HistoricalSeries {
    fn from(chart: MarketChart) -> Self {
        HistoricalSeries {
            prices: to_points(chart.prices),
            market_caps: to_points(chart.market_caps),
            total_volumes: to_points(chart.total_volumes),
        }
    }
}

pub struct CoinMarketChart;

impl Method for CoinMarketChart {
    type Response = MarketChart;
    type Params = MarketChartParams;

    fn path(params: &Self::Params) -> String {
        format!("/coins/{}/market_chart", urlencoding::encode(&params.id))
    }
}
