use crate::types::models::DepthMetrics;
use crate::types::wire::OrdersResponse;

/// Live sell side of a single rune, as returned by the order-book source.
/// Fetch failures are folded into `Empty` by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderBook {
    /// Unit prices in the order the source returned them (ascending).
    Listed(Vec<f64>),
    Empty,
}

impl OrderBook {
    pub fn from_response(response: OrdersResponse) -> Self {
        let prices: Vec<f64> = response
            .orders
            .iter()
            .filter_map(|order| order.formatted_unit_price.trim().parse::<f64>().ok())
            .collect();

        if prices.is_empty() {
            OrderBook::Empty
        } else {
            OrderBook::Listed(prices)
        }
    }

    pub fn floor_price(&self) -> Option<f64> {
        match self {
            OrderBook::Listed(prices) => prices.first().copied(),
            OrderBook::Empty => None,
        }
    }
}

/// Sum of all prices at or below `limit`, saturating at `cap` on every step.
pub fn capped_sum_within(prices: &[f64], limit: f64, cap: f64) -> f64 {
    prices
        .iter()
        .filter(|price| **price <= limit)
        .fold(0.0, |sum, price| {
            let next = sum + price;
            if next > cap {
                cap
            } else {
                next
            }
        })
}

/// Floor is the first listed ask; `None` when nothing is listed.
pub fn compute_depth(book: &OrderBook, cap: f64) -> Option<DepthMetrics> {
    let OrderBook::Listed(prices) = book else {
        return None;
    };
    let floor_price = book.floor_price()?;

    Some(DepthMetrics {
        floor_price,
        available_2x: capped_sum_within(prices, floor_price * 2.0, cap),
        available_5x: capped_sum_within(prices, floor_price * 5.0, cap),
        available_10x: capped_sum_within(prices, floor_price * 10.0, cap),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::wire::SellOrder;

    const CAP: f64 = 100000.0;

    fn orders(prices: &[&str]) -> OrdersResponse {
        OrdersResponse {
            orders: prices
                .iter()
                .map(|p| SellOrder {
                    formatted_unit_price: p.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn depth_sums_follow_floor_multiples() {
        let book = OrderBook::Listed(vec![10.0, 15.0, 30.0]);
        let depth = compute_depth(&book, CAP).unwrap();
        assert_eq!(depth.floor_price, 10.0);
        assert_eq!(depth.available_2x, 25.0);
        assert_eq!(depth.available_5x, 55.0);
        assert_eq!(depth.available_10x, 55.0);
    }

    #[test]
    fn depth_is_monotonic_and_capped() {
        let mut prices = vec![500.0];
        prices.extend(std::iter::repeat(900.0).take(50));
        prices.extend(std::iter::repeat(2400.0).take(50));
        prices.extend(std::iter::repeat(4900.0).take(50));
        let book = OrderBook::Listed(prices.clone());

        let raw_2x = capped_sum_within(&prices, 1000.0, f64::INFINITY);
        let raw_5x = capped_sum_within(&prices, 2500.0, f64::INFINITY);
        let raw_10x = capped_sum_within(&prices, 5000.0, f64::INFINITY);
        assert!(raw_2x <= raw_5x && raw_5x <= raw_10x);

        let depth = compute_depth(&book, CAP).unwrap();
        assert_eq!(depth.available_2x, 45500.0);
        assert_eq!(depth.available_5x, CAP);
        assert_eq!(depth.available_10x, CAP);
    }

    #[test]
    fn empty_book_has_no_depth() {
        assert_eq!(compute_depth(&OrderBook::Empty, CAP), None);
        assert_eq!(OrderBook::Empty.floor_price(), None);
    }

    #[test]
    fn response_prices_are_parsed_in_order() {
        let book = OrderBook::from_response(orders(&["12.5", "13", "bogus", "40.00"]));
        assert_eq!(book, OrderBook::Listed(vec![12.5, 13.0, 40.0]));
    }

    #[test]
    fn response_without_orders_is_empty() {
        assert_eq!(OrderBook::from_response(OrdersResponse::default()), OrderBook::Empty);
        assert_eq!(OrderBook::from_response(orders(&["n/a"])), OrderBook::Empty);
    }
}
