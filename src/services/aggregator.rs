use rayon::prelude::*;
use tokio::time::sleep;

use crate::config::Config;
use crate::services::client::MarketSource;
use crate::services::depth::{compute_depth, OrderBook};
use crate::services::error::RunError;
use crate::services::progress::ProgressLog;
use crate::types::models::{MarketStats, RuneRecord};
use crate::types::wire::RuneApiItem;

/// Result of one complete aggregation run.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub reference_price: f64,
    /// Listing order; the dashboard sorts on demand.
    pub records: Vec<RuneRecord>,
    /// Computed right after filtering, before depth enrichment.
    pub stats: MarketStats,
}

/// Reference price, then listing, then batched order-book enrichment.
/// Only a listing failure aborts the run.
pub async fn run<S>(source: &S, config: &Config, progress: &ProgressLog) -> Result<Aggregate, RunError>
where
    S: MarketSource + ?Sized,
{
    let reference_price = fetch_reference_price(source, config, progress).await;

    let items = match source.rune_listing().await {
        Ok(items) => items,
        Err(e) => {
            tracing::error!("Rune listing request failed: {}", e);
            progress.push(format!("Error occurred: {}", e));
            return Err(e.into());
        }
    };
    progress.push("Fetched runes data, processing...");
    progress.push(format!("Processing {} runes...", items.len()));

    let mut records = transform_listing(items, reference_price, config);
    let stats = MarketStats::from_records(&records);
    tracing::info!(
        "Retained {} runes (holders > {}, total volume > {})",
        records.len(),
        config.min_holders,
        config.min_total_volume
    );

    enrich_in_batches(source, &mut records, config, progress).await;

    Ok(Aggregate {
        reference_price,
        records,
        stats,
    })
}

async fn fetch_reference_price<S>(source: &S, config: &Config, progress: &ProgressLog) -> f64
where
    S: MarketSource + ?Sized,
{
    let price = match source.reference_price().await {
        Ok(price) => price,
        Err(e) => {
            tracing::warn!("Error fetching BTC price, using fallback: {}", e);
            progress.push(format!(
                "Error fetching BTC price ({}), using fallback ${}",
                e, config.fallback_price
            ));
            config.fallback_price
        }
    };
    progress.push(format!("Fetched BTC Price: ${}", price));
    price
}

fn to_record(rune: RuneApiItem, reference_price: f64) -> RuneRecord {
    let etching = rune.etching;
    let supply = etching
        .premine
        .filter(|s| !s.is_empty())
        .or(etching.amount.filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "0".to_string());

    RuneRecord {
        id: etching.rune_number,
        name: etching.rune_name,
        symbol: etching.symbol,
        price: rune.unit_price_sats,
        price_change_24h: rune.unit_price_change,
        market_cap: rune.market_cap * reference_price,
        volume_24h: rune.vol,
        holders: rune.holder_count,
        total_txns: rune.total_txns,
        txn_count: rune.txn_count,
        supply,
        depth: None,
    }
}

/// Keeps entries strictly above both thresholds, preserving listing order.
pub fn transform_listing(items: Vec<RuneApiItem>, reference_price: f64, config: &Config) -> Vec<RuneRecord> {
    items
        .into_par_iter()
        .filter(|rune| rune.holder_count > config.min_holders && rune.total_vol > config.min_total_volume)
        .map(|rune| to_record(rune, reference_price))
        .collect()
}

async fn fetch_order_book<S>(source: &S, name: &str, progress: &ProgressLog) -> OrderBook
where
    S: MarketSource + ?Sized,
{
    match source.order_book(name).await {
        Ok(book) => {
            progress.push(format!("Analyzing {}...", name));
            book
        }
        Err(e) => {
            tracing::warn!("Order book request for {} failed: {}", name, e);
            progress.push(format!("No orders found for {}", name));
            OrderBook::Empty
        }
    }
}

/// Fetches order books `batch_size` at a time, joining each batch before
/// writing results back by position and pausing before the next one.
pub async fn enrich_in_batches<S>(
    source: &S,
    records: &mut [RuneRecord],
    config: &Config,
    progress: &ProgressLog,
) where
    S: MarketSource + ?Sized,
{
    let batch_size = config.batch_size.max(1);
    let total = records.len();

    for start in (0..total).step_by(batch_size) {
        let end = (start + batch_size).min(total);
        let names: Vec<String> = records[start..end].iter().map(|r| r.name.clone()).collect();

        tracing::info!(
            "Processing batch {}: runes {}-{} of {}",
            start / batch_size + 1,
            start + 1,
            end,
            total
        );

        let books = futures::future::join_all(
            names.iter().map(|name| fetch_order_book(source, name, progress)),
        )
        .await;

        for (offset, book) in books.iter().enumerate() {
            let record = &mut records[start + offset];
            record.depth = compute_depth(book, config.depth_cap);
            match &record.depth {
                Some(depth) => progress.push(format!(
                    "Floor price for {}: {} sats",
                    record.name, depth.floor_price
                )),
                None => progress.push(format!("No active orders for {}", record.name)),
            }
        }

        if end < total {
            sleep(config.batch_delay).await;
        }
    }
}
