mod report;
mod retry;

use clap::Parser;
use coindash_coingecko::{CoinGeckoClient, MarketError};
use coindash_news::NewsClient;
use coindash_shared_models::{Currency, OhlcDays, TimeRange};
use dotenv::dotenv;
use report::{ReportRequest, build_report, render_text};
use retry::RetryConfig;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "coindash", about = "Price, market data and news for one coin")]
struct Args {
    /// CoinGecko coin id, e.g. `bitcoin`
    coin: String,

    /// Quote currency
    #[arg(long, default_value = "usd")]
    vs: String,

    /// Chart range: 1h, 24h, 7d, 30d, 90d, 180d, 365d or all
    #[arg(long, default_value = "7d")]
    range: TimeRange,

    /// Also fetch candlesticks for this many days (1, 7, 14, 30, 90, 180 or 365)
    #[arg(long)]
    ohlc: Option<u32>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Skip the news section
    #[arg(long)]
    no_news: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<MarketError>() {
            Some(market) if market.is_not_found() => {
                eprintln!("Coin \"{}\" was not found.", args.coin);
                ExitCode::from(2)
            }
            Some(market) if market.is_rate_limited() => {
                eprintln!(
                    "CoinGecko is rate limiting requests right now. Try again in a minute."
                );
                ExitCode::from(3)
            }
            _ => {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let ohlc_days = args.ohlc.map(OhlcDays::try_from).transpose()?;

    let market = CoinGeckoClient::from_env()?;
    tracing::info!(tier = %market.tier(), coin = %args.coin, "fetching coin report");

    let news = if args.no_news {
        None
    } else {
        let client = NewsClient::from_env()?;
        if client.provider().is_configured() {
            tracing::debug!(provider = client.provider().name(), "news enabled");
            Some(client)
        } else {
            tracing::info!("no news provider key set, skipping news");
            None
        }
    };

    let request = ReportRequest {
        coin_id: args.coin.trim().to_lowercase(),
        currency: Currency::new(&args.vs),
        range: args.range,
        ohlc_days,
    };

    let report = build_report(&market, news.as_ref(), &request, &RetryConfig::default()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(())
}
