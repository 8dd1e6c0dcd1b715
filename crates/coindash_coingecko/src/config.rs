use crate::error::MarketError;
use crate::throttle::MAX_MIN_INTERVAL;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const API_KEY_VAR: &str = "COINGECKO_API_KEY";
pub const TIER_VAR: &str = "COINGECKO_API_TIER";
pub const MIN_INTERVAL_VAR: &str = "COINGECKO_MIN_INTERVAL_MS";

/// Free public/demo access allows roughly 30 calls a minute.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tier {
    #[default]
    Demo,
    Pro,
}

impl Tier {
    pub fn base_url(self) -> &'static str {
        match self {
            Tier::Demo => "https://api.coingecko.com/api/v3",
            Tier::Pro => "https://pro-api.coingecko.com/api/v3",
        }
    }

    pub fn auth_header(self) -> &'static str {
        match self {
            Tier::Demo => "x-cg-demo-api-key",
            Tier::Pro => "x-cg-pro-api-key",
        }
    }
}

impl FromStr for Tier {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "demo" | "free" => Ok(Tier::Demo),
            "pro" | "paid" => Ok(Tier::Pro),
            other => Err(MarketError::Config(format!(
                "{TIER_VAR} must be \"demo\" or \"pro\", got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Demo => f.write_str("demo"),
            Tier::Pro => f.write_str("pro"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct CoinGeckoConfig {
    pub api_key: Option<String>,
    pub tier: Tier,
    pub min_interval: Duration,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            tier: Tier::Demo,
            min_interval: DEFAULT_MIN_INTERVAL,
        }
    }
}

impl fmt::Debug for CoinGeckoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinGeckoConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("tier", &self.tier)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Result<Self, MarketError> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let tier = match env::var(TIER_VAR) {
            Ok(value) => value.parse()?,
            Err(_) => Tier::default(),
        };

        let min_interval = match env::var(MIN_INTERVAL_VAR) {
            Ok(value) => parse_min_interval(&value)?,
            Err(_) => DEFAULT_MIN_INTERVAL,
        };

        Ok(Self {
            api_key,
            tier,
            min_interval,
        })
    }
}

/// Milliseconds, at most [`MAX_MIN_INTERVAL`].
pub fn parse_min_interval(value: &str) -> Result<Duration, MarketError> {
    let millis = value.trim().parse::<u64>().map_err(|_| {
        MarketError::Config(format!(
            "{MIN_INTERVAL_VAR} must be a whole number of milliseconds, got {value:?}"
        ))
    })?;

    let interval = Duration::from_millis(millis);
    if interval > MAX_MIN_INTERVAL {
        return Err(MarketError::Config(format!(
            "{MIN_INTERVAL_VAR} must be at most {} ms, got {millis}",
            MAX_MIN_INTERVAL.as_millis()
        )));
    }
    Ok(interval)
}
