use serde::{Deserialize, Serialize};

/// Lowest ask and the cumulative cost of listings within 2x/5x/10x of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthMetrics {
    pub floor_price: f64,
    pub available_2x: f64,
    pub available_5x: f64,
    pub available_10x: f64,
}

/// A retained listing entry, optionally enriched with order-book depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuneRecord {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub price_change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    pub holders: u64,
    pub total_txns: u64,
    pub txn_count: u64,
    pub supply: String,
    #[serde(flatten)]
    pub depth: Option<DepthMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketStats {
    pub total_market_cap: f64,
    pub total_volume_24h: f64,
    pub runes_count: usize,
}

impl MarketStats {
    pub fn from_records(records: &[RuneRecord]) -> Self {
        Self {
            total_market_cap: records.iter().map(|r| r.market_cap).sum(),
            total_volume_24h: records.iter().map(|r| r.volume_24h).sum(),
            runes_count: records.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    MarketCap,
    #[serde(rename = "volume_24h")]
    Volume24h,
    #[serde(rename = "price_change_24h")]
    PriceChange24h,
    Price,
    FloorPrice,
    #[serde(rename = "available_2x")]
    Available2x,
    #[serde(rename = "available_5x")]
    Available5x,
    #[serde(rename = "available_10x")]
    Available10x,
}

impl SortKey {
    /// Keys offered by the dashboard's sort control.
    pub const MENU: [SortKey; 3] = [SortKey::MarketCap, SortKey::Volume24h, SortKey::PriceChange24h];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::MarketCap => "market_cap",
            SortKey::Volume24h => "volume_24h",
            SortKey::PriceChange24h => "price_change_24h",
            SortKey::Price => "price",
            SortKey::FloorPrice => "floor_price",
            SortKey::Available2x => "available_2x",
            SortKey::Available5x => "available_5x",
            SortKey::Available10x => "available_10x",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::MarketCap => "Market Cap",
            SortKey::Volume24h => "Volume",
            SortKey::PriceChange24h => "Price Change",
            SortKey::Price => "Price",
            SortKey::FloorPrice => "Floor Price",
            SortKey::Available2x => "2x",
            SortKey::Available5x => "5x",
            SortKey::Available10x => "10x",
        }
    }

    pub fn parse(s: &str) -> Option<SortKey> {
        match s {
            "market_cap" => Some(SortKey::MarketCap),
            "volume_24h" => Some(SortKey::Volume24h),
            "price_change_24h" => Some(SortKey::PriceChange24h),
            "price" => Some(SortKey::Price),
            "floor_price" => Some(SortKey::FloorPrice),
            "available_2x" => Some(SortKey::Available2x),
            "available_5x" => Some(SortKey::Available5x),
            "available_10x" => Some(SortKey::Available10x),
            _ => None,
        }
    }

    /// Field value used for ordering; unset depth fields count as zero.
    pub fn value(&self, record: &RuneRecord) -> f64 {
        let depth = record.depth.as_ref();
        match self {
            SortKey::MarketCap => record.market_cap,
            SortKey::Volume24h => record.volume_24h,
            SortKey::PriceChange24h => record.price_change_24h,
            SortKey::Price => record.price,
            SortKey::FloorPrice => depth.map_or(0.0, |d| d.floor_price),
            SortKey::Available2x => depth.map_or(0.0, |d| d.available_2x),
            SortKey::Available5x => depth.map_or(0.0, |d| d.available_5x),
            SortKey::Available10x => depth.map_or(0.0, |d| d.available_10x),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Display ordering selected from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SortState {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::MarketCap,
            order: SortOrder::Desc,
        }
    }
}

impl SortState {
    /// Every selection flips the direction, including reselecting the
    /// current key.
    pub fn select(&mut self, key: SortKey) {
        self.key = key;
        self.order = self.order.toggled();
    }
}
