use std::env;
use std::net::SocketAddr;
use std::time::Duration;

pub const PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=usd";
pub const LISTING_URL: &str = "https://api-mainnet.magiceden.io/v2/ord/btc/runes/collection_stats/search";
pub const ORDERS_URL: &str = "https://api-mainnet.magiceden.io/v2/ord/btc/runes/orders";

pub const FALLBACK_BTC_PRICE: f64 = 71000.0;
pub const HIGH_CAP: f64 = 100000.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub price_url: String,
    pub listing_url: String,
    pub orders_url: String,
    pub min_holders: u64,
    pub min_total_volume: f64,
    pub listing_limit: u32,
    pub order_limit: u32,
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub fallback_price: f64,
    pub depth_cap: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            price_url: PRICE_URL.to_string(),
            listing_url: LISTING_URL.to_string(),
            orders_url: ORDERS_URL.to_string(),
            min_holders: 300,
            min_total_volume: 0.75,
            listing_limit: 200,
            order_limit: 100,
            batch_size: 20,
            batch_delay: Duration::from_millis(1000),
            fallback_price: FALLBACK_BTC_PRICE,
            depth_cap: HIGH_CAP,
        }
    }
}

impl Config {
    /// Hardcoded defaults, with endpoint and bind overrides taken from the
    /// environment (after `.env` has been loaded).
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(bind) = env::var("RUNEDASH_BIND") {
            config.bind_addr = bind
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid RUNEDASH_BIND '{}': {}", bind, e))?;
        }
        if let Ok(url) = env::var("RUNEDASH_PRICE_URL") {
            config.price_url = url;
        }
        if let Ok(url) = env::var("RUNEDASH_LISTING_URL") {
            config.listing_url = url;
        }
        if let Ok(url) = env::var("RUNEDASH_ORDERS_URL") {
            config.orders_url = url.trim_end_matches('/').to_string();
        }

        Ok(config)
    }
}
