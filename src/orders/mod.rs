//! Order fetching and date-window filtering.

pub mod client;

pub use client::{OrdersApiError, OrdersClient, OrdersResponse};

use crate::analytics::normalize::parse_created_time;
use crate::models::Order;
use chrono::NaiveDate;

/// Keep only orders created within the inclusive `[start, end]` window.
/// Orders with missing or malformed timestamps are silently dropped.
pub fn filter_by_date(orders: Vec<Order>, start: NaiveDate, end: NaiveDate) -> Vec<Order> {
    orders
        .into_iter()
        .filter(|order| {
            order
                .created_time
                .as_deref()
                .and_then(parse_created_time)
                .map(|dt| {
                    let created = dt.date();
                    start <= created && created <= end
                })
                .unwrap_or(false)
        })
        .collect()
}
