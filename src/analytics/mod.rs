//! Analytics modules.
//!
//! `normalize` holds the shared coercion rules, `engine` the metric
//! functions, and this module the thin dispatcher that maps a detected
//! intent to the corresponding metric call.

pub mod engine;
pub mod normalize;

use crate::intent::Intent;
use crate::models::{Facts, Order};
use std::collections::HashMap;

/// Compute the facts for one query: the contract boundary between the
/// intent classifier and the engine. `n` is the externally parsed
/// top/bottom-N count and `category_map` the caller-supplied item-code
/// lookup for category rollups.
pub fn compute_facts(
    intent: Intent,
    orders: &[Order],
    n: usize,
    category_map: &HashMap<String, String>,
) -> Facts {
    match intent {
        Intent::TotalRevenue => Facts::TotalRevenue(engine::total_revenue(orders)),
        Intent::AverageOrderValue => Facts::AverageOrderValue(engine::average_order_value(orders)),
        Intent::MaxOrder => Facts::MaxOrder(engine::top_orders(orders, n)),
        Intent::MinOrder => Facts::MinOrder(engine::bottom_orders(orders, n)),
        Intent::OrderCount => Facts::OrderCount(engine::order_count(orders)),
        Intent::TopItems => Facts::TopItems {
            top_items_revenue: engine::top_items_by_revenue(orders, n),
            top_items_units: engine::top_items_by_units(orders, n),
        },
        Intent::MostFrequentItems => {
            Facts::MostFrequentItems(engine::most_frequent_items(orders, n))
        }
        Intent::AverageItemsPerOrder => {
            Facts::AverageItemsPerOrder(engine::average_items_per_order(orders))
        }
        Intent::DiscountImpact => Facts::DiscountImpact(engine::discount_impact(orders)),
        Intent::MaxDiscount => Facts::MaxDiscount(engine::max_discount(orders)),
        Intent::SalesByEmployee => Facts::SalesByEmployee(engine::sales_by_employee(orders)),
        Intent::RefundSummary => Facts::RefundSummary(engine::refund_summary(orders)),
        Intent::SalesByCategory => {
            Facts::SalesByCategory(engine::sales_by_category(orders, category_map))
        }
        Intent::SalesTrend => Facts::SalesTrend(engine::sales_trend(orders)),
        Intent::HourlySales => Facts::HourlySales(engine::hourly_sales(orders)),
        Intent::General => {
            Facts::Summary("Raw order data loaded, no structured metrics.".to_string())
        }
    }
}
