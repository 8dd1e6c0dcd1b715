use crate::retry::{RetryConfig, retry_rate_limited};
use anyhow::Context;
use coindash_coingecko::CoinGeckoClient;
use coindash_news::{NewsClient, NewsQuery};
use coindash_shared_models::format::{
    format_currency, format_large_number, format_percentage, format_supply,
};
use coindash_shared_models::{
    CoinSnapshot, Currency, HistoricalSeries, MarketMetrics, NewsItem, OhlcDays, OhlcPoint,
    TimeRange,
};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone)]
pub struct ReportRequest {
    pub coin_id: String,
    pub currency: Currency,
    pub range: TimeRange,
    pub ohlc_days: Option<OhlcDays>,
}

#[derive(Serialize, Debug)]
pub struct CoinReport {
    pub snapshot: CoinSnapshot,
    pub metrics: MarketMetrics,
    pub range: TimeRange,
    pub history: HistoricalSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candles: Option<Vec<OhlcPoint>>,
    pub news: Vec<NewsItem>,
}

/// Gathers everything shown for one coin.
///
/// The snapshot goes first so an unknown coin stops before any other call.
/// News is best effort: failures leave the section empty.
pub async fn build_report(
    market: &CoinGeckoClient,
    news: Option<&NewsClient>,
    request: &ReportRequest,
    retry: &RetryConfig,
) -> anyhow::Result<CoinReport> {
    let id = request.coin_id.as_str();
    let currency = &request.currency;

    let snapshot = retry_rate_limited(retry, || market.get_coin_snapshot(id, currency.clone()))
        .await
        .with_context(|| format!("Failed to fetch price data for {id}"))?;

    let news_query = NewsQuery::builder()
        .coin_id(id)
        .symbol(snapshot.symbol.clone())
        .build();

    let (history, metrics, candles, news) = tokio::join!(
        retry_rate_limited(retry, || {
            market.get_historical_series(id, request.range.days(), currency.clone())
        }),
        retry_rate_limited(retry, || market.get_market_metrics(id, currency.clone())),
        async {
            match request.ohlc_days {
                Some(days) => retry_rate_limited(retry, || {
                    market.get_ohlc(id, days, currency.clone())
                })
                .await
                .map(Some),
                None => Ok(None),
            }
        },
        async {
            let Some(client) = news else {
                return Vec::new();
            };
            client.get_crypto_news(&news_query).await.unwrap_or_else(|err| {
                tracing::warn!(error = %err, "news unavailable");
                Vec::new()
            })
        },
    );

    Ok(CoinReport {
        snapshot,
        metrics: metrics.with_context(|| format!("Failed to fetch market data for {id}"))?,
        range: request.range,
        history: history.with_context(|| format!("Failed to fetch price history for {id}"))?,
        candles: candles.with_context(|| format!("Failed to fetch candlesticks for {id}"))?,
        news,
    })
}

pub fn render_text(report: &CoinReport) -> String {
    let snapshot = &report.snapshot;
    let metrics = &report.metrics;
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", snapshot.name, snapshot.display_symbol());
    let _ = writeln!(
        out,
        "  Price: {}  24h: {}",
        format_currency(snapshot.current_price, &snapshot.currency),
        format_percentage(snapshot.price_change_percentage_24h, 2)
    );
    if let Some(change_7d) = snapshot.price_change_percentage_7d {
        let _ = writeln!(out, "  7d: {}", format_percentage(change_7d, 2));
    }

    let _ = writeln!(out, "\nMarket ({})", metrics.currency);
    let _ = writeln!(out, "  Rank: #{}", metrics.rank);
    let _ = writeln!(out, "  Market Cap: {}", format_large_number(metrics.market_cap));
    let _ = writeln!(out, "  24h Volume: {}", format_large_number(metrics.volume_24h));
    let _ = writeln!(out, "  Circulating Supply: {}", format_supply(metrics.circulating_supply));
    let _ = writeln!(out, "  Total Supply: {}", format_supply(metrics.total_supply));
    let _ = writeln!(
        out,
        "  All-Time High: {} ({})",
        format_currency(metrics.ath, &metrics.currency),
        format_percentage(metrics.ath_change_percentage, 2)
    );
    let _ = writeln!(
        out,
        "  All-Time Low: {} ({})",
        format_currency(metrics.atl, &metrics.currency),
        format_percentage(metrics.atl_change_percentage, 2)
    );

    let points = report.history.chart_points();
    let _ = writeln!(out, "\nHistory ({}, {} points)", report.range.as_str(), points.len());
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let _ = writeln!(
            out,
            "  {} -> {}",
            format_currency(first.price, &snapshot.currency),
            format_currency(last.price, &snapshot.currency)
        );
    }
    if let Some(change) = report.history.price_change_percentage() {
        let _ = writeln!(out, "  Change: {}", format_percentage(change, 2));
    }

    if let Some(candles) = &report.candles {
        let _ = writeln!(out, "\nCandles ({})", candles.len());
        for candle in candles.iter().rev().take(5) {
            let _ = writeln!(
                out,
                "  {}  O {}  H {}  L {}  C {}",
                chrono::DateTime::from_timestamp_millis(candle.time)
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| candle.time.to_string()),
                format_currency(candle.open, &snapshot.currency),
                format_currency(candle.high, &snapshot.currency),
                format_currency(candle.low, &snapshot.currency),
                format_currency(candle.close, &snapshot.currency)
            );
        }
    }

    let _ = writeln!(out, "\nNews");
    if report.news.is_empty() {
        let _ = writeln!(out, "  No news available.");
    }
    for item in &report.news {
        let source = item.source.as_deref().unwrap_or("unknown source");
        let _ = writeln!(out, "  - {} [{}]", item.title, source);
        let _ = writeln!(out, "    {} {}", item.published_at, item.url);
    }

    out
}
