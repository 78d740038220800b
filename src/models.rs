//! Data models for the sales insight agent.
//!
//! This module contains the tolerant order data model fetched from the
//! sales API, plus the typed fact records produced by the analytics engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A point-of-sale order as returned by the sales API.
///
/// Monetary fields are kept as raw JSON values because the feed routinely
/// carries nulls, numeric strings, and other malformed scalars; coercion to
/// safe defaults happens in the analytics normalization layer, never here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    /// Order identifier.
    pub order_id: Option<String>,
    /// Total amount in integer minor units (cents). May be null, zero,
    /// negative, or a numeric string.
    pub total: Value,
    /// Creation timestamp, ISO-8601, optionally zulu-suffixed.
    pub created_time: Option<String>,
    /// Identifier of the employee who rang the order.
    pub employee_id: Option<String>,
    /// Ordered sequence of line items.
    pub line_items: Vec<LineItem>,
    /// Ordered sequence of discounts applied to line items.
    pub discounts: Vec<Discount>,
}

/// A single line item within an order.
///
/// Quantity and refunded-quantity arrive under several possible field names
/// depending on the upstream source; they are captured in `extra` so the
/// first-matching-key rule can be applied explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    /// Line item identifier, the key discounts attach to.
    pub line_item_id: Option<String>,
    /// Item name, the aggregation key for item-level metrics.
    pub name: Option<String>,
    /// Item code, used only for category lookup.
    pub item_code: Option<String>,
    /// Base price in minor units, before discount.
    pub price: Value,
    /// Refund indicator for the refund summary (boolean or 0/1).
    pub refunded: Value,
    /// Remaining fields, including the quantity/refund key candidates.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A discount record attached to a line item.
///
/// Amounts follow the feed's signed convention: effective price = base price
/// + amount, so a stored discount is normally negative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Discount {
    /// Target line item id. Discounts without one are dropped.
    pub line_item_id: Option<String>,
    /// Signed amount in minor units.
    pub amount: Value,
    /// Discount type label.
    #[serde(rename = "type")]
    pub discount_type: Option<String>,
}

/// Price breakdown of a single line item inside an order breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemBreakdown {
    pub name: Option<String>,
    /// Base price in major units.
    pub base_price: f64,
    /// Cumulative discount in major units (signed).
    pub discount: f64,
    /// Effective price in major units (base + discount).
    pub final_price: f64,
}

/// Full breakdown of one ranked order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBreakdown {
    pub order_id: Option<String>,
    pub total_usd: f64,
    /// Sum of the items' final prices.
    pub item_sum_usd: f64,
    /// Order total minus item sum; 0.00 when within the noise threshold.
    pub tax_or_fee_usd: f64,
    pub items: Vec<ItemBreakdown>,
}

/// Revenue accumulated for one item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRevenue {
    pub name: Option<String>,
    pub revenue_usd: f64,
}

/// Units sold for one item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemUnits {
    pub name: String,
    pub units: i64,
}

/// Occurrence count for one item name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCount {
    pub name: Option<String>,
    pub count: u64,
}

/// Revenue accumulated for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue_usd: f64,
}

/// Revenue accumulated for one employee. A null id bucket collects orders
/// with no employee attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRevenue {
    pub employee_id: Option<String>,
    pub revenue_usd: f64,
}

/// The single largest discount found across all orders.
///
/// Absence of any positive discount is expressed as `Option::None` by the
/// engine; rendering it as a "no discounts found" message happens only at
/// the output boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxDiscountRecord {
    pub order_id: Option<String>,
    pub discount_amount_usd: f64,
    pub discount_type: String,
    pub line_item_id: Option<String>,
}

/// Refunded item count and amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RefundSummary {
    pub refunded_items: u64,
    pub refunded_amount_usd: f64,
}

/// Revenue for one calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRevenue {
    /// Normalized `YYYY-MM-DD` label.
    pub date: String,
    pub revenue_usd: f64,
}

/// Revenue for one hour-of-day bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyRevenue {
    /// Two-digit `HH:00` label.
    pub hour: String,
    pub revenue_usd: f64,
}

/// Facts computed for a single query, tagged by metric name.
///
/// The external serde tag doubles as the key the narrator prompt and the
/// fallback report present to the reader, e.g. `{"total_revenue": 10.5}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facts {
    TotalRevenue(f64),
    AverageOrderValue(f64),
    MaxOrder(Vec<OrderBreakdown>),
    MinOrder(Vec<OrderBreakdown>),
    OrderCount(usize),
    TopItems {
        top_items_revenue: Vec<ItemRevenue>,
        top_items_units: Vec<ItemUnits>,
    },
    MostFrequentItems(Vec<ItemCount>),
    AverageItemsPerOrder(f64),
    DiscountImpact(f64),
    MaxDiscount(Option<MaxDiscountRecord>),
    SalesByEmployee(Vec<EmployeeRevenue>),
    RefundSummary(RefundSummary),
    SalesByCategory(Vec<CategoryRevenue>),
    SalesTrend(Vec<DailyRevenue>),
    HourlySales(Vec<HourlyRevenue>),
    Summary(String),
}

impl Facts {
    /// Metric name matching the serde tag, for logging and prompts.
    pub fn metric_name(&self) -> &'static str {
        match self {
            Facts::TotalRevenue(_) => "total_revenue",
            Facts::AverageOrderValue(_) => "average_order_value",
            Facts::MaxOrder(_) => "max_order",
            Facts::MinOrder(_) => "min_order",
            Facts::OrderCount(_) => "order_count",
            Facts::TopItems { .. } => "top_items",
            Facts::MostFrequentItems(_) => "most_frequent_items",
            Facts::AverageItemsPerOrder(_) => "average_items_per_order",
            Facts::DiscountImpact(_) => "discount_impact",
            Facts::MaxDiscount(_) => "max_discount",
            Facts::SalesByEmployee(_) => "sales_by_employee",
            Facts::RefundSummary(_) => "refund_summary",
            Facts::SalesByCategory(_) => "sales_by_category",
            Facts::SalesTrend(_) => "sales_trend",
            Facts::HourlySales(_) => "hourly_sales",
            Facts::Summary(_) => "summary",
        }
    }
}

impl fmt::Display for Facts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.metric_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_deserializes_tolerantly() {
        let order: Order = serde_json::from_value(json!({
            "orderId": "A1",
            "total": 1050,
            "createdTime": "2024-01-01T10:00:00Z",
            "lineItems": [
                {"name": "Coffee", "price": 1050, "lineItemId": "i1", "quantity": 2}
            ],
            "discounts": []
        }))
        .unwrap();

        assert_eq!(order.order_id.as_deref(), Some("A1"));
        assert_eq!(order.total, json!(1050));
        assert_eq!(order.line_items.len(), 1);
        assert_eq!(order.line_items[0].extra.get("quantity"), Some(&json!(2)));
    }

    #[test]
    fn test_order_defaults_for_missing_fields() {
        let order: Order = serde_json::from_value(json!({})).unwrap();

        assert!(order.order_id.is_none());
        assert!(order.total.is_null());
        assert!(order.line_items.is_empty());
        assert!(order.discounts.is_empty());
    }

    #[test]
    fn test_discount_type_field_rename() {
        let discount: Discount = serde_json::from_value(json!({
            "lineItemId": "i1",
            "amount": -100,
            "type": "Promo"
        }))
        .unwrap();

        assert_eq!(discount.discount_type.as_deref(), Some("Promo"));
    }

    #[test]
    fn test_facts_serialize_under_metric_tag() {
        let facts = Facts::TotalRevenue(10.5);
        let value = serde_json::to_value(&facts).unwrap();
        assert_eq!(value, json!({"total_revenue": 10.5}));
        assert_eq!(facts.metric_name(), "total_revenue");
    }

    #[test]
    fn test_max_discount_sentinel_serializes_as_null() {
        let facts = Facts::MaxDiscount(None);
        let value = serde_json::to_value(&facts).unwrap();
        assert_eq!(value, json!({"max_discount": null}));
    }
}
