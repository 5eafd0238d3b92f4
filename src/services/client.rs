use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::services::depth::OrderBook;
use crate::services::error::FetchError;
use crate::types::wire::{OrdersResponse, PriceQuote, RuneApiItem, RuneListingResponse};

/// The three upstream feeds the aggregator reads from.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Fiat rate used to convert on-chain market caps.
    async fn reference_price(&self) -> Result<f64, FetchError>;

    async fn rune_listing(&self) -> Result<Vec<RuneApiItem>, FetchError>;

    async fn order_book(&self, rune_name: &str) -> Result<OrderBook, FetchError>;
}

/// Order-book paths only accept the bare alphanumeric spelling of a name.
pub fn sanitize_rune_name(name: &str) -> String {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

pub fn parse_listing(body: &[u8]) -> Result<Vec<RuneApiItem>, FetchError> {
    let response: RuneListingResponse = serde_json::from_slice(body)?;
    response.runes.ok_or(FetchError::InvalidResponse)
}

pub struct HttpMarketSource {
    client: Client,
    price_url: String,
    listing_url: String,
    orders_url: String,
    listing_limit: u32,
    order_limit: u32,
}

impl HttpMarketSource {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            price_url: config.price_url.clone(),
            listing_url: config.listing_url.clone(),
            orders_url: config.orders_url.clone(),
            listing_limit: config.listing_limit,
            order_limit: config.order_limit,
        }
    }
}

#[async_trait]
impl MarketSource for HttpMarketSource {
    async fn reference_price(&self) -> Result<f64, FetchError> {
        let response = self.client.get(&self.price_url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let quote: PriceQuote = response.json().await?;
        Ok(quote.bitcoin.usd)
    }

    async fn rune_listing(&self) -> Result<Vec<RuneApiItem>, FetchError> {
        let filter = serde_json::json!({ "allCollections": true }).to_string();
        let limit = self.listing_limit.to_string();
        let response = self
            .client
            .get(&self.listing_url)
            .query(&[
                ("offset", "0"),
                ("limit", limit.as_str()),
                ("sort", "totalVolume"),
                ("direction", "desc"),
                ("window", "1d"),
                ("isVerified", "false"),
                ("filter", filter.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        parse_listing(&body)
    }

    async fn order_book(&self, rune_name: &str) -> Result<OrderBook, FetchError> {
        let url = format!("{}/{}", self.orders_url, sanitize_rune_name(rune_name));
        let limit = self.order_limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("offset", "0"),
                ("limit", limit.as_str()),
                ("includePending", "false"),
                ("sort", "unitPriceAsc"),
                ("rbfPreventionListingOnly", "false"),
                ("side", "sell"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        let orders: OrdersResponse = response.json().await?;
        Ok(OrderBook::from_response(orders))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_spacers_and_symbols() {
        assert_eq!(sanitize_rune_name("DOG•GO•TO•THE•MOON"), "DOGGOTOTHEMOON");
        assert_eq!(sanitize_rune_name("PUPS"), "PUPS");
        assert_eq!(sanitize_rune_name("A-1 b_2"), "A1b2");
    }

    #[test]
    fn listing_is_parsed_from_camel_case() {
        let body = br#"{"runes":[{
            "rune":"PUPS",
            "etching":{"runeName":"PUPS","runeNumber":7,"symbol":"D","premine":"1000","runeId":{"block":840000,"tx":3}},
            "unitPriceSats":120,"unitPriceChange":-4.5,"marketCap":1000,"vol":200,
            "holderCount":500,"totalVol":2
        }]}"#;
        let runes = parse_listing(body).unwrap();
        assert_eq!(runes.len(), 1);
        assert_eq!(runes[0].etching.rune_name, "PUPS");
        assert_eq!(runes[0].etching.rune_number, 7);
        assert_eq!(runes[0].holder_count, 500);
        assert_eq!(runes[0].total_vol, 2.0);
        assert_eq!(runes[0].etching.premine.as_deref(), Some("1000"));
    }

    #[test]
    fn null_field_in_one_entry_keeps_the_listing() {
        let body = br#"{"runes":[
            {"etching":{"runeName":"PUPS","runeNumber":7},"unitPriceChange":-4.5,"holderCount":500,"totalVol":2},
            {"etching":{"runeName":"DOG","runeNumber":3,"symbol":null},"unitPriceChange":null,
             "holderCount":"many","marketCap":50,"pendingCount":"x"}
        ]}"#;
        let runes = parse_listing(body).unwrap();
        assert_eq!(runes.len(), 2);
        assert_eq!(runes[0].etching.rune_name, "PUPS");
        assert_eq!(runes[0].unit_price_change, -4.5);
        assert_eq!(runes[0].holder_count, 500);
        assert_eq!(runes[1].etching.rune_name, "DOG");
        assert_eq!(runes[1].etching.symbol, "");
        assert_eq!(runes[1].unit_price_change, 0.0);
        assert_eq!(runes[1].holder_count, 0);
        assert_eq!(runes[1].market_cap, 50.0);
    }

    #[test]
    fn listing_without_runes_field_is_invalid() {
        let err = parse_listing(br#"{"collections":[]}"#).unwrap_err();
        assert!(matches!(err, FetchError::InvalidResponse));
        assert_eq!(err.to_string(), "Invalid API response structure");
    }

    #[test]
    fn listing_that_is_not_json_is_a_decode_error() {
        let err = parse_listing(b"<html>busy</html>").unwrap_err();
        assert!(matches!(err, FetchError::Json(_)));
    }

    mod http {
        use super::*;
        use axum::extract::{Path, Query, State};
        use axum::http::StatusCode;
        use axum::response::{IntoResponse, Response};
        use axum::routing::get;
        use axum::{Json, Router};
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        type Params = HashMap<String, String>;

        #[derive(Default)]
        struct Seen {
            listing: Option<Params>,
            orders: Vec<(String, Params)>,
        }

        type Shared = Arc<Mutex<Seen>>;

        async fn price() -> Json<serde_json::Value> {
            Json(serde_json::json!({ "bitcoin": { "usd": 67000.5 } }))
        }

        async fn listing(State(seen): State<Shared>, Query(params): Query<Params>) -> StatusCode {
            seen.lock().unwrap().listing = Some(params);
            StatusCode::INTERNAL_SERVER_ERROR
        }

        async fn orders(
            State(seen): State<Shared>,
            Path(name): Path<String>,
            Query(params): Query<Params>,
        ) -> Response {
            seen.lock().unwrap().orders.push((name.clone(), params));
            if name == "GHOST" {
                return StatusCode::NOT_FOUND.into_response();
            }
            Json(serde_json::json!({
                "orders": [
                    { "formattedUnitPrice": "12.5" },
                    { "formattedUnitPrice": "20" }
                ]
            }))
            .into_response()
        }

        async fn serve_upstream() -> (HttpMarketSource, Shared) {
            let seen = Shared::default();
            let app = Router::new()
                .route("/price", get(price))
                .route("/listing", get(listing))
                .route("/orders/:name", get(orders))
                .with_state(seen.clone());

            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base = format!("http://{}", listener.local_addr().unwrap());
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            let config = Config {
                price_url: format!("{}/price", base),
                listing_url: format!("{}/listing", base),
                orders_url: format!("{}/orders", base),
                ..Config::default()
            };
            let client = Client::builder().no_proxy().build().unwrap();
            (HttpMarketSource::new(client, &config), seen)
        }

        fn param<'a>(params: &'a Params, key: &str) -> &'a str {
            params.get(key).map(String::as_str).unwrap_or("<missing>")
        }

        #[tokio::test]
        async fn reference_price_reads_bitcoin_usd() {
            let (source, _) = serve_upstream().await;
            assert_eq!(source.reference_price().await.unwrap(), 67000.5);
        }

        #[tokio::test]
        async fn listing_sends_the_collection_query_and_surfaces_status() {
            let (source, seen) = serve_upstream().await;

            let err = source.rune_listing().await.unwrap_err();
            assert!(matches!(err, FetchError::Status(500)));
            assert_eq!(err.to_string(), "HTTP error! status: 500");

            let seen = seen.lock().unwrap();
            let params = seen.listing.as_ref().expect("listing was not requested");
            assert_eq!(param(params, "offset"), "0");
            assert_eq!(param(params, "limit"), "200");
            assert_eq!(param(params, "sort"), "totalVolume");
            assert_eq!(param(params, "direction"), "desc");
            assert_eq!(param(params, "window"), "1d");
            assert_eq!(param(params, "isVerified"), "false");
            assert_eq!(param(params, "filter"), r#"{"allCollections":true}"#);
        }

        #[tokio::test]
        async fn order_book_uses_the_sanitized_name_and_sell_side_query() {
            let (source, seen) = serve_upstream().await;

            let book = source.order_book("DOG•GO").await.unwrap();
            assert_eq!(book, OrderBook::Listed(vec![12.5, 20.0]));

            let seen = seen.lock().unwrap();
            let (name, params) = &seen.orders[0];
            assert_eq!(name, "DOGGO");
            assert_eq!(param(params, "offset"), "0");
            assert_eq!(param(params, "limit"), "100");
            assert_eq!(param(params, "includePending"), "false");
            assert_eq!(param(params, "sort"), "unitPriceAsc");
            assert_eq!(param(params, "rbfPreventionListingOnly"), "false");
            assert_eq!(param(params, "side"), "sell");
        }

        #[tokio::test]
        async fn missing_order_book_is_a_status_error() {
            let (source, _) = serve_upstream().await;
            let err = source.order_book("GHOST").await.unwrap_err();
            assert!(matches!(err, FetchError::Status(404)));
        }
    }
}
