pub mod coin;
pub mod currency;
pub mod format;
pub mod history;
pub mod news;

pub use coin::{CoinSnapshot, MarketMetrics};
pub use currency::Currency;
pub use history::{
    ChartPoint, Days, HistoricalSeries, OhlcDays, OhlcPoint, RangeError, SeriesPoint, TimeRange,
};
pub use news::NewsItem;
