use serde::Deserialize;

use super::serde_util::lenient;

// Reference price: {"bitcoin": {"usd": 67000.0}}
#[derive(Debug, Clone, Deserialize)]
pub struct PriceQuote {
    pub bitcoin: FiatRate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FiatRate {
    pub usd: f64,
}

// Listing entries are read leniently: a null or oddly typed field zeroes that
// field only, so one malformed entry cannot sink the listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuneEtching {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub premine: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub rune_name: String,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub rune_number: u64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub symbol: String,
}

/// One entry of the collection listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuneApiItem {
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub etching: RuneEtching,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub vol: f64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub total_vol: f64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub total_txns: u64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub unit_price_sats: f64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub txn_count: u64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub unit_price_change: f64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub holder_count: u64,
    #[serde(default, deserialize_with = "lenient::deserialize")]
    pub market_cap: f64,
}

/// `runes` is optional so a missing list can be told apart from a
/// malformed document.
#[derive(Debug, Clone, Deserialize)]
pub struct RuneListingResponse {
    pub runes: Option<Vec<RuneApiItem>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellOrder {
    pub formatted_unit_price: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrdersResponse {
    #[serde(default)]
    pub orders: Vec<SellOrder>,
}
