use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("days must be a positive integer or \"max\", got {0:?}")]
    InvalidDays(String),
    #[error("OHLC days must be one of 1, 7, 14, 30, 90, 180, 365, got {0}")]
    UnsupportedOhlcDays(u32),
    #[error("unknown time range {0:?}")]
    UnknownTimeRange(String),
}

/// Unix timestamp in milliseconds paired with a value.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub timestamp: i64,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct HistoricalSeries {
    pub prices: Vec<SeriesPoint>,
    pub market_caps: Vec<SeriesPoint>,
    pub total_volumes: Vec<SeriesPoint>,
}

/// One row of chart data; market cap and volume are absent past the end of
/// their series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub price: f64,
    pub market_cap: Option<f64>,
    pub total_volume: Option<f64>,
}

impl HistoricalSeries {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Zips the three series by index, driven by the price series.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.prices
            .iter()
            .enumerate()
            .map(|(i, price)| ChartPoint {
                timestamp: price.timestamp,
                price: price.value,
                market_cap: self.market_caps.get(i).map(|p| p.value),
                total_volume: self.total_volumes.get(i).map(|p| p.value),
            })
            .collect()
    }

    /// Price change between the first and last point, in percent.
    pub fn price_change_percentage(&self) -> Option<f64> {
        let first = self.prices.first()?.value;
        let last = self.prices.last()?.value;
        if first == 0.0 {
            return None;
        }
        Some((last - first) / first * 100.0)
    }
}

/// Lookback window for market-chart requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Days {
    Count(u32),
    Max,
}

impl Days {
    pub fn count(days: u32) -> Result<Self, RangeError> {
        if days == 0 {
            return Err(RangeError::InvalidDays(days.to_string()));
        }
        Ok(Days::Count(days))
    }
}

impl Default for Days {
    fn default() -> Self {
        Days::Count(7)
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Days::Count(n) => write!(f, "{n}"),
            Days::Max => f.write_str("max"),
        }
    }
}

impl FromStr for Days {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("max") {
            return Ok(Days::Max);
        }
        match s.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Days::Count(n)),
            _ => Err(RangeError::InvalidDays(s.to_string())),
        }
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Chart ranges offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "180d")]
    HalfYear,
    #[serde(rename = "365d")]
    Year,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 8] = [
        TimeRange::Hour,
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::HalfYear,
        TimeRange::Year,
        TimeRange::All,
    ];

    /// Upstream has no sub-day window, so `1h` shares the one-day series.
    pub fn days(self) -> Days {
        match self {
            TimeRange::Hour | TimeRange::Day => Days::Count(1),
            TimeRange::Week => Days::Count(7),
            TimeRange::Month => Days::Count(30),
            TimeRange::Quarter => Days::Count(90),
            TimeRange::HalfYear => Days::Count(180),
            TimeRange::Year => Days::Count(365),
            TimeRange::All => Days::Max,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Hour => "1h",
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
            TimeRange::Quarter => "90d",
            TimeRange::HalfYear => "180d",
            TimeRange::Year => "365d",
            TimeRange::All => "all",
        }
    }
}

impl FromStr for TimeRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RangeError::UnknownTimeRange(s.to_string()))
    }
}

/// Day counts accepted by the candlestick endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OhlcDays {
    One,
    Seven,
    Fourteen,
    Thirty,
    Ninety,
    OneEighty,
    ThreeSixtyFive,
}

impl OhlcDays {
    pub fn as_u32(self) -> u32 {
        match self {
            OhlcDays::One => 1,
            OhlcDays::Seven => 7,
            OhlcDays::Fourteen => 14,
            OhlcDays::Thirty => 30,
            OhlcDays::Ninety => 90,
            OhlcDays::OneEighty => 180,
            OhlcDays::ThreeSixtyFive => 365,
        }
    }
}

impl TryFrom<u32> for OhlcDays {
    type Error = RangeError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            1 => Ok(OhlcDays::One),
            7 => Ok(OhlcDays::Seven),
            14 => Ok(OhlcDays::Fourteen),
            30 => Ok(OhlcDays::Thirty),
            90 => Ok(OhlcDays::Ninety),
            180 => Ok(OhlcDays::OneEighty),
            365 => Ok(OhlcDays::ThreeSixtyFive),
            other => Err(RangeError::UnsupportedOhlcDays(other)),
        }
    }
}

impl Serialize for OhlcDays {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

/// One candlestick. `time` is the bucket's close time in unix milliseconds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct OhlcPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<[f64; 5]> for OhlcPoint {
    fn from([time, open, high, low, close]: [f64; 5]) -> Self {
        Self {
            time: time as i64,
            open,
            high,
            low,
            close,
        }
    }
}
