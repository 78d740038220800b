//! The analytics aggregation engine.
//!
//! Pure, synchronous metric functions over an externally-owned order
//! collection. Every metric reads only its arguments, mutates nothing, and
//! degrades to a defined zero/empty result on empty or malformed input.
//! All monetary arithmetic stays in integer minor units; division by 100
//! and rounding happen only at output, each value independently.

use crate::analytics::normalize::{
    discount_map, effective_quantity, parse_created_time, round2, safe_num, to_major,
};
use crate::models::{
    CategoryRevenue, DailyRevenue, EmployeeRevenue, HourlyRevenue, ItemBreakdown, ItemCount,
    ItemRevenue, ItemUnits, MaxDiscountRecord, Order, OrderBreakdown, RefundSummary,
};
use chrono::{NaiveDate, Timelike};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// An order counts toward revenue and ranking only when its coerced total
/// is strictly positive.
fn is_valid(order: &Order) -> bool {
    safe_num(&order.total) > 0.0
}

fn valid_orders(orders: &[Order]) -> impl Iterator<Item = &Order> {
    orders.iter().filter(|o| is_valid(o))
}

/// Descending-by-value comparator for accumulated (key, value) pairs.
/// Used with stable sorts so ties keep their insertion order.
fn by_value_desc<K>(a: &(K, f64), b: &(K, f64)) -> Ordering {
    b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal)
}

/// Total revenue in major units across all valid orders.
pub fn total_revenue(orders: &[Order]) -> f64 {
    let total: f64 = valid_orders(orders).map(|o| safe_num(&o.total)).sum();
    to_major(total)
}

/// Mean order value in major units; 0 when there are no valid orders.
pub fn average_order_value(orders: &[Order]) -> f64 {
    let totals: Vec<f64> = valid_orders(orders).map(|o| safe_num(&o.total)).collect();
    if totals.is_empty() {
        return 0.0;
    }
    to_major(totals.iter().sum::<f64>() / totals.len() as f64)
}

/// Count of valid orders.
pub fn order_count(orders: &[Order]) -> usize {
    valid_orders(orders).count()
}

/// The top N highest-value orders with full breakdowns.
pub fn top_orders(orders: &[Order], n: usize) -> Vec<OrderBreakdown> {
    ranked_orders(orders, n, true)
}

/// The bottom N lowest-value orders with full breakdowns.
pub fn bottom_orders(orders: &[Order], n: usize) -> Vec<OrderBreakdown> {
    ranked_orders(orders, n, false)
}

/// Shared top/bottom-N selection. The sort is stable, so equal totals keep
/// their original relative order.
fn ranked_orders(orders: &[Order], n: usize, descending: bool) -> Vec<OrderBreakdown> {
    let mut valid: Vec<&Order> = valid_orders(orders).collect();
    if valid.is_empty() {
        return Vec::new();
    }

    valid.sort_by(|a, b| {
        let ordering = safe_num(&a.total)
            .partial_cmp(&safe_num(&b.total))
            .unwrap_or(Ordering::Equal);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    valid.truncate(n);

    valid.into_iter().map(order_breakdown).collect()
}

/// Build the per-item price breakdown for one selected order.
fn order_breakdown(order: &Order) -> OrderBreakdown {
    let discounts = discount_map(order);
    let mut item_sum = 0.0;

    let items: Vec<ItemBreakdown> = order
        .line_items
        .iter()
        .map(|item| {
            let base = safe_num(&item.price);
            let discount = line_discount(&discounts, item.line_item_id.as_deref());
            let effective = base + discount;
            item_sum += effective / 100.0;

            ItemBreakdown {
                name: item.name.clone(),
                base_price: round2(base / 100.0),
                discount: round2(discount / 100.0),
                final_price: round2(effective / 100.0),
            }
        })
        .collect();

    let order_total = safe_num(&order.total) / 100.0;
    let tax_diff = round2(order_total - item_sum);

    OrderBreakdown {
        order_id: order.order_id.clone(),
        total_usd: round2(order_total),
        item_sum_usd: round2(item_sum),
        // Differences within a cent are rounding noise, not a real fee.
        tax_or_fee_usd: if tax_diff.abs() > 0.01 { tax_diff } else { 0.0 },
        items,
    }
}

fn line_discount(discounts: &HashMap<String, f64>, line_id: Option<&str>) -> f64 {
    line_id
        .and_then(|id| discounts.get(id))
        .copied()
        .unwrap_or(0.0)
}

/// Top N items by accumulated effective price (discounts included).
pub fn top_items_by_revenue(orders: &[Order], n: usize) -> Vec<ItemRevenue> {
    let mut revenue: IndexMap<Option<String>, f64> = IndexMap::new();

    for order in orders {
        let discounts = discount_map(order);
        for item in &order.line_items {
            let base = safe_num(&item.price);
            let discount = line_discount(&discounts, item.line_item_id.as_deref());
            *revenue.entry(item.name.clone()).or_insert(0.0) += base + discount;
        }
    }

    let mut entries: Vec<(Option<String>, f64)> = revenue.into_iter().collect();
    entries.sort_by(by_value_desc);
    entries.truncate(n);

    entries
        .into_iter()
        .map(|(name, minor)| ItemRevenue {
            name,
            revenue_usd: to_major(minor),
        })
        .collect()
}

/// Top N items by total units sold. Items without a name are excluded from
/// unit counts.
pub fn top_items_by_units(orders: &[Order], n: usize) -> Vec<ItemUnits> {
    let mut units: IndexMap<String, i64> = IndexMap::new();

    for order in orders {
        for item in &order.line_items {
            let name = match item.name.as_deref() {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => continue,
            };
            *units.entry(name).or_insert(0) += effective_quantity(item);
        }
    }

    let mut entries: Vec<(String, i64)> = units.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);

    entries
        .into_iter()
        .map(|(name, units)| ItemUnits { name, units })
        .collect()
}

/// Top N items by raw occurrence count (not units, not revenue).
pub fn most_frequent_items(orders: &[Order], n: usize) -> Vec<ItemCount> {
    let mut freq: IndexMap<Option<String>, u64> = IndexMap::new();

    for order in orders {
        for item in &order.line_items {
            *freq.entry(item.name.clone()).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<(Option<String>, u64)> = freq.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(n);

    entries
        .into_iter()
        .map(|(name, count)| ItemCount { name, count })
        .collect()
}

/// Mean number of line-item entries among orders that have at least one.
pub fn average_items_per_order(orders: &[Order]) -> f64 {
    let with_items: Vec<usize> = orders
        .iter()
        .filter(|o| !o.line_items.is_empty())
        .map(|o| o.line_items.len())
        .collect();

    if with_items.is_empty() {
        return 0.0;
    }

    round2(with_items.iter().sum::<usize>() as f64 / with_items.len() as f64)
}

/// Revenue rollup by item category, resolved through the caller-supplied
/// item-code lookup. Unknown codes land in "Uncategorized".
pub fn sales_by_category(
    orders: &[Order],
    category_map: &HashMap<String, String>,
) -> Vec<CategoryRevenue> {
    let mut categories: IndexMap<String, f64> = IndexMap::new();

    for order in orders {
        let discounts = discount_map(order);
        for item in &order.line_items {
            let category = item
                .item_code
                .as_deref()
                .and_then(|code| category_map.get(code))
                .cloned()
                .unwrap_or_else(|| "Uncategorized".to_string());

            let base = safe_num(&item.price);
            let discount = line_discount(&discounts, item.line_item_id.as_deref());
            *categories.entry(category).or_insert(0.0) += base + discount;
        }
    }

    let mut entries: Vec<(String, f64)> = categories.into_iter().collect();
    entries.sort_by(by_value_desc);

    entries
        .into_iter()
        .map(|(category, minor)| CategoryRevenue {
            category,
            revenue_usd: to_major(minor),
        })
        .collect()
}

/// Sum of all discount amounts across all orders, in major units. The
/// feed's signed convention means this is normally negative.
pub fn discount_impact(orders: &[Order]) -> f64 {
    let total: f64 = orders
        .iter()
        .flat_map(|o| &o.discounts)
        .map(|d| safe_num(&d.amount))
        .sum();
    to_major(total)
}

/// The single largest discount amount across all orders.
///
/// Strict greater-than against a running max starting at zero: only
/// positive amounts qualify and the first occurrence wins ties. `None` is
/// the "no discounts found" sentinel.
pub fn max_discount(orders: &[Order]) -> Option<MaxDiscountRecord> {
    let mut max_amount = 0.0;
    let mut record = None;

    for order in orders {
        for discount in &order.discounts {
            let amount = safe_num(&discount.amount);
            if amount > max_amount {
                max_amount = amount;
                record = Some(MaxDiscountRecord {
                    order_id: order.order_id.clone(),
                    discount_amount_usd: to_major(amount),
                    discount_type: discount
                        .discount_type
                        .clone()
                        .unwrap_or_else(|| "Unknown".to_string()),
                    line_item_id: discount.line_item_id.clone(),
                });
            }
        }
    }

    record
}

/// Revenue per employee, highest first. Orders with no employee id land in
/// a null-key bucket. Raw totals accumulate in minor units; division
/// happens only at output.
pub fn sales_by_employee(orders: &[Order]) -> Vec<EmployeeRevenue> {
    let mut employees: IndexMap<Option<String>, f64> = IndexMap::new();

    for order in orders {
        *employees.entry(order.employee_id.clone()).or_insert(0.0) += safe_num(&order.total);
    }

    let mut entries: Vec<(Option<String>, f64)> = employees.into_iter().collect();
    entries.sort_by(by_value_desc);

    entries
        .into_iter()
        .map(|(employee_id, minor)| EmployeeRevenue {
            employee_id,
            revenue_usd: to_major(minor),
        })
        .collect()
}

/// Count of refunded line items and their summed base price. The refund
/// indicator is any value that coerces to a number greater than zero.
pub fn refund_summary(orders: &[Order]) -> RefundSummary {
    let mut refunded_items = 0;
    let mut refunded_total = 0.0;

    for order in orders {
        for item in &order.line_items {
            if safe_num(&item.refunded) > 0.0 {
                refunded_items += 1;
                refunded_total += safe_num(&item.price);
            }
        }
    }

    RefundSummary {
        refunded_items,
        refunded_amount_usd: to_major(refunded_total),
    }
}

/// Revenue per calendar date, ascending. Orders with unparseable
/// timestamps are silently excluded.
pub fn sales_trend(orders: &[Order]) -> Vec<DailyRevenue> {
    let mut trend: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for order in orders {
        let Some(parsed) = order
            .created_time
            .as_deref()
            .and_then(parse_created_time)
        else {
            continue;
        };
        *trend.entry(parsed.date()).or_insert(0.0) += safe_num(&order.total);
    }

    trend
        .into_iter()
        .map(|(date, minor)| DailyRevenue {
            date: date.format("%Y-%m-%d").to_string(),
            revenue_usd: to_major(minor),
        })
        .collect()
}

/// Revenue per hour of day, bucketed under fixed `HH:00` labels, ascending.
pub fn hourly_sales(orders: &[Order]) -> Vec<HourlyRevenue> {
    let mut hourly: BTreeMap<String, f64> = BTreeMap::new();

    for order in orders {
        let Some(parsed) = order
            .created_time
            .as_deref()
            .and_then(parse_created_time)
        else {
            continue;
        };
        let label = format!("{:02}:00", parsed.hour());
        *hourly.entry(label).or_insert(0.0) += safe_num(&order.total);
    }

    hourly
        .into_iter()
        .map(|(hour, minor)| HourlyRevenue {
            hour,
            revenue_usd: to_major(minor),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(value: serde_json::Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    fn coffee_order() -> Order {
        order(json!({
            "orderId": "A",
            "total": 1050,
            "createdTime": "2024-01-01T10:00:00Z",
            "lineItems": [{"name": "Coffee", "price": 1050, "lineItemId": "i1"}],
            "discounts": []
        }))
    }

    fn mixed_orders() -> Vec<Order> {
        vec![
            coffee_order(),
            order(json!({
                "orderId": "B",
                "total": 2000,
                "createdTime": "2024-01-02T14:30:00Z",
                "employeeId": "emp-1",
                "lineItems": [
                    {"name": "Bagel", "price": 1500, "lineItemId": "b1", "quantity": 3},
                    {"name": "Coffee", "price": 500, "lineItemId": "b2"}
                ],
                "discounts": []
            })),
            order(json!({"orderId": "C", "total": null})),
            order(json!({"orderId": "D", "total": -300})),
            order(json!({"orderId": "E", "total": 0})),
        ]
    }

    #[test]
    fn test_total_revenue_single_order() {
        assert_eq!(total_revenue(&[coffee_order()]), 10.5);
    }

    #[test]
    fn test_total_revenue_excludes_invalid_totals() {
        // Only A (1050) and B (2000) count; null, negative, zero are out.
        assert_eq!(total_revenue(&mixed_orders()), 30.5);
    }

    #[test]
    fn test_total_revenue_empty_input() {
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn test_average_order_value() {
        assert_eq!(average_order_value(&[coffee_order()]), 10.5);
        assert_eq!(average_order_value(&mixed_orders()), 15.25);
        assert_eq!(average_order_value(&[]), 0.0);
    }

    #[test]
    fn test_order_count_counts_valid_only() {
        let orders = mixed_orders();
        assert_eq!(order_count(&orders), 2);
        assert!(order_count(&orders) <= orders.len());
    }

    #[test]
    fn test_top_orders_breakdown_no_fee() {
        let top = top_orders(&[coffee_order()], 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].order_id.as_deref(), Some("A"));
        assert_eq!(top[0].total_usd, 10.5);
        assert_eq!(top[0].item_sum_usd, 10.5);
        assert_eq!(top[0].tax_or_fee_usd, 0.0);
    }

    #[test]
    fn test_top_orders_breakdown_with_discount_and_fee() {
        let orders = vec![order(json!({
            "orderId": "X",
            "total": 1200,
            "lineItems": [{"name": "Latte", "price": 1000, "lineItemId": "L1"}],
            "discounts": [{"lineItemId": "L1", "amount": -100}]
        }))];

        let top = top_orders(&orders, 1);
        let breakdown = &top[0];
        assert_eq!(breakdown.items[0].base_price, 10.0);
        assert_eq!(breakdown.items[0].discount, -1.0);
        assert_eq!(breakdown.items[0].final_price, 9.0);
        assert_eq!(breakdown.item_sum_usd, 9.0);
        assert_eq!(breakdown.tax_or_fee_usd, 3.0);
    }

    #[test]
    fn test_top_and_bottom_partition_valid_orders() {
        let orders = mixed_orders();
        let n = order_count(&orders);

        let top = top_orders(&orders, n);
        let bottom = bottom_orders(&orders, n);
        assert_eq!(top.len(), n);
        assert_eq!(bottom.len(), n);

        let mut top_ids: Vec<_> = top.iter().map(|b| b.order_id.clone()).collect();
        let mut bottom_ids: Vec<_> = bottom.iter().map(|b| b.order_id.clone()).collect();
        top_ids.sort();
        bottom_ids.sort();
        assert_eq!(top_ids, bottom_ids);

        assert!(top[0].total_usd >= top[n - 1].total_usd);
        assert!(bottom[0].total_usd <= bottom[n - 1].total_usd);
    }

    #[test]
    fn test_ranked_orders_stable_on_ties() {
        let orders = vec![
            order(json!({"orderId": "first", "total": 500})),
            order(json!({"orderId": "second", "total": 500})),
            order(json!({"orderId": "third", "total": 500})),
        ];

        let top = top_orders(&orders, 3);
        let ids: Vec<_> = top.iter().map(|b| b.order_id.as_deref().unwrap()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);

        let bottom = bottom_orders(&orders, 3);
        let ids: Vec<_> = bottom
            .iter()
            .map(|b| b.order_id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_top_items_by_revenue_includes_discounts() {
        let orders = vec![
            order(json!({
                "total": 1500,
                "lineItems": [{"name": "Latte", "price": 1000, "lineItemId": "L1"}],
                "discounts": [{"lineItemId": "L1", "amount": -100}]
            })),
            order(json!({
                "total": 500,
                "lineItems": [{"name": "Muffin", "price": 500, "lineItemId": "M1"}]
            })),
        ];

        let top = top_items_by_revenue(&orders, 5);
        assert_eq!(top[0].name.as_deref(), Some("Latte"));
        assert_eq!(top[0].revenue_usd, 9.0);
        assert_eq!(top[1].name.as_deref(), Some("Muffin"));
        assert_eq!(top[1].revenue_usd, 5.0);
    }

    #[test]
    fn test_top_items_by_revenue_ties_keep_first_encounter_order() {
        let orders = vec![order(json!({
            "total": 1000,
            "lineItems": [
                {"name": "Tea", "price": 500},
                {"name": "Scone", "price": 500}
            ]
        }))];

        let top = top_items_by_revenue(&orders, 2);
        assert_eq!(top[0].name.as_deref(), Some("Tea"));
        assert_eq!(top[1].name.as_deref(), Some("Scone"));
    }

    #[test]
    fn test_top_items_by_units_counts_effective_quantity() {
        let orders = vec![order(json!({
            "total": 3000,
            "lineItems": [
                {"name": "Bagel", "price": 300, "quantity": 5, "refundedQty": 2},
                {"name": "Coffee", "price": 400},
                {"price": 100, "quantity": 50}
            ]
        }))];

        let top = top_items_by_units(&orders, 5);
        assert_eq!(top.len(), 2); // unnamed item excluded
        assert_eq!(top[0].name, "Bagel");
        assert_eq!(top[0].units, 3);
        assert_eq!(top[1].name, "Coffee");
        assert_eq!(top[1].units, 1);
    }

    #[test]
    fn test_most_frequent_items_counts_occurrences() {
        let orders = vec![
            order(json!({
                "total": 1000,
                "lineItems": [
                    {"name": "Coffee", "price": 300, "quantity": 10},
                    {"name": "Bagel", "price": 300}
                ]
            })),
            order(json!({
                "total": 500,
                "lineItems": [{"name": "Coffee", "price": 300}]
            })),
        ];

        let frequent = most_frequent_items(&orders, 5);
        // Occurrence count, not units: Coffee appears twice despite qty 10.
        assert_eq!(frequent[0].name.as_deref(), Some("Coffee"));
        assert_eq!(frequent[0].count, 2);
        assert_eq!(frequent[1].count, 1);
    }

    #[test]
    fn test_average_items_per_order() {
        let orders = vec![
            order(json!({"total": 100, "lineItems": [{"name": "a"}, {"name": "b"}, {"name": "c"}]})),
            order(json!({"total": 100, "lineItems": [{"name": "d"}]})),
            order(json!({"total": 100})),
        ];

        // Orders with no items are excluded from the mean: (3 + 1) / 2.
        assert_eq!(average_items_per_order(&orders), 2.0);
        assert_eq!(average_items_per_order(&[]), 0.0);
    }

    #[test]
    fn test_sales_by_category_with_lookup() {
        let category_map: HashMap<String, String> = [
            ("C100".to_string(), "Drinks".to_string()),
            ("C200".to_string(), "Bakery".to_string()),
        ]
        .into_iter()
        .collect();

        let orders = vec![order(json!({
            "total": 2000,
            "lineItems": [
                {"name": "Coffee", "itemCode": "C100", "price": 900},
                {"name": "Bagel", "itemCode": "C200", "price": 600},
                {"name": "Mystery", "itemCode": "C999", "price": 500}
            ]
        }))];

        let categories = sales_by_category(&orders, &category_map);
        assert_eq!(categories[0].category, "Drinks");
        assert_eq!(categories[0].revenue_usd, 9.0);
        assert!(categories
            .iter()
            .any(|c| c.category == "Uncategorized" && c.revenue_usd == 5.0));
    }

    #[test]
    fn test_discount_impact_sums_signed_amounts() {
        let orders = vec![
            order(json!({
                "total": 1000,
                "discounts": [
                    {"lineItemId": "a", "amount": -150},
                    {"lineItemId": "b", "amount": -50}
                ]
            })),
            order(json!({
                "total": 1000,
                "discounts": [{"lineItemId": "c", "amount": -100}]
            })),
        ];

        assert_eq!(discount_impact(&orders), -3.0);
        assert_eq!(discount_impact(&[]), 0.0);
    }

    #[test]
    fn test_max_discount_tracks_largest_positive() {
        let orders = vec![
            order(json!({
                "orderId": "A",
                "discounts": [{"lineItemId": "a1", "amount": 200, "type": "Promo"}]
            })),
            order(json!({
                "orderId": "B",
                "discounts": [
                    {"lineItemId": "b1", "amount": 500},
                    {"lineItemId": "b2", "amount": 500}
                ]
            })),
        ];

        let record = max_discount(&orders).unwrap();
        assert_eq!(record.order_id.as_deref(), Some("B"));
        assert_eq!(record.discount_amount_usd, 5.0);
        // First occurrence wins the 500 tie.
        assert_eq!(record.line_item_id.as_deref(), Some("b1"));
        // Missing type falls back to the default label.
        assert_eq!(record.discount_type, "Unknown");
    }

    #[test]
    fn test_max_discount_sentinel_when_none_positive() {
        assert!(max_discount(&[]).is_none());

        let orders = vec![order(json!({
            "discounts": [{"lineItemId": "a", "amount": -300}]
        }))];
        assert!(max_discount(&orders).is_none());
    }

    #[test]
    fn test_sales_by_employee_with_null_bucket() {
        let orders = vec![
            order(json!({"total": 1000, "employeeId": "emp-1"})),
            order(json!({"total": 3000, "employeeId": "emp-2"})),
            order(json!({"total": 500})),
            order(json!({"total": 2000, "employeeId": "emp-1"})),
        ];

        let ranking = sales_by_employee(&orders);
        // Both employees total 30.00; emp-1 was seen first so the stable
        // sort keeps it ahead.
        assert_eq!(ranking[0].employee_id.as_deref(), Some("emp-1"));
        assert_eq!(ranking[0].revenue_usd, 30.0);
        assert_eq!(ranking[1].employee_id.as_deref(), Some("emp-2"));
        assert_eq!(ranking[1].revenue_usd, 30.0);
        assert_eq!(ranking[2].employee_id, None);
        assert_eq!(ranking[2].revenue_usd, 5.0);
    }

    #[test]
    fn test_refund_summary_uses_base_price() {
        let orders = vec![order(json!({
            "total": 2000,
            "lineItems": [
                {"name": "Latte", "price": 1000, "refunded": true},
                {"name": "Mocha", "price": 800, "refunded": 1},
                {"name": "Tea", "price": 400, "refunded": 0},
                {"name": "Scone", "price": 300}
            ]
        }))];

        let summary = refund_summary(&orders);
        assert_eq!(summary.refunded_items, 2);
        assert_eq!(summary.refunded_amount_usd, 18.0);
    }

    #[test]
    fn test_sales_trend_ascending_and_skips_bad_timestamps() {
        let orders = vec![
            order(json!({"total": 1000, "createdTime": "2024-01-02T09:00:00Z"})),
            order(json!({"total": 500, "createdTime": "2024-01-01T12:00:00Z"})),
            order(json!({"total": 700, "createdTime": "2024-01-02T18:00:00Z"})),
            order(json!({"total": 900, "createdTime": "garbage"})),
            order(json!({"total": 900})),
        ];

        let trend = sales_trend(&orders);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].date, "2024-01-01");
        assert_eq!(trend[0].revenue_usd, 5.0);
        assert_eq!(trend[1].date, "2024-01-02");
        assert_eq!(trend[1].revenue_usd, 17.0);
    }

    #[test]
    fn test_hourly_sales_buckets_and_labels() {
        let orders = vec![
            order(json!({"total": 1000, "createdTime": "2024-01-01T09:15:00Z"})),
            order(json!({"total": 500, "createdTime": "2024-01-02T09:45:00Z"})),
            order(json!({"total": 700, "createdTime": "2024-01-01T18:00:00Z"})),
        ];

        let hourly = hourly_sales(&orders);
        assert_eq!(hourly.len(), 2);
        assert_eq!(hourly[0].hour, "09:00");
        assert_eq!(hourly[0].revenue_usd, 15.0);
        assert_eq!(hourly[1].hour, "18:00");
        assert_eq!(hourly[1].revenue_usd, 7.0);
    }

    #[test]
    fn test_every_metric_handles_empty_input() {
        let empty: Vec<Order> = Vec::new();
        let no_categories = HashMap::new();

        assert_eq!(total_revenue(&empty), 0.0);
        assert_eq!(average_order_value(&empty), 0.0);
        assert_eq!(order_count(&empty), 0);
        assert!(top_orders(&empty, 3).is_empty());
        assert!(bottom_orders(&empty, 3).is_empty());
        assert!(top_items_by_revenue(&empty, 3).is_empty());
        assert!(top_items_by_units(&empty, 3).is_empty());
        assert!(most_frequent_items(&empty, 3).is_empty());
        assert_eq!(average_items_per_order(&empty), 0.0);
        assert!(sales_by_category(&empty, &no_categories).is_empty());
        assert_eq!(discount_impact(&empty), 0.0);
        assert!(max_discount(&empty).is_none());
        assert!(sales_by_employee(&empty).is_empty());
        assert_eq!(refund_summary(&empty), RefundSummary::default());
        assert!(sales_trend(&empty).is_empty());
        assert!(hourly_sales(&empty).is_empty());
    }

    #[test]
    fn test_metrics_are_idempotent() {
        let orders = mixed_orders();
        assert_eq!(total_revenue(&orders), total_revenue(&orders));
        let first = serde_json::to_value(top_orders(&orders, 2)).unwrap();
        let second = serde_json::to_value(top_orders(&orders, 2)).unwrap();
        assert_eq!(first, second);
    }
}
