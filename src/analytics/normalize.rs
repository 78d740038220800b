//! Normalization rules shared by every metric.
//!
//! The order feed is not trusted: monetary fields may be null, strings, or
//! garbage, and quantities hide behind several possible field names. All
//! coercion and reconciliation lives here so each rule is testable on its
//! own, and so no metric ever has to raise for a malformed record.

use crate::models::{LineItem, Order};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::HashMap;

/// Candidate quantity field names, checked in order. The first key present
/// wins, even when its value is malformed (the default then applies).
pub const QUANTITY_KEYS: [&str; 6] = [
    "quantity",
    "qty",
    "count",
    "units",
    "quantitySold",
    "qtySold",
];

/// Candidate refunded-quantity field names, checked in order.
pub const REFUND_KEYS: [&str; 3] = ["refundedQty", "qtyRefunded", "refunded_quantity"];

/// Coerce a raw JSON scalar to a float, defaulting to 0.0.
///
/// Numeric strings parse; booleans coerce to 0.0/1.0; null, missing, and
/// anything non-numeric become 0.0. Never fails.
pub fn safe_num(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coerce a raw JSON scalar to an integer, truncating toward zero.
///
/// Booleans coerce via their integer value, numeric strings parse as floats
/// first, and anything unusable yields `default`.
pub fn safe_int(value: &Value, default: i64) -> i64 {
    match value {
        Value::Null => default,
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) => f.trunc() as i64,
            None => default,
        },
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(f) => f.trunc() as i64,
            Err(_) => default,
        },
        _ => default,
    }
}

/// Round a major-unit amount to two decimals. Applied independently to every
/// monetary output, never to intermediate sums.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert minor units to major units, rounded for output.
pub fn to_major(minor: f64) -> f64 {
    round2(minor / 100.0)
}

/// Map each line item id to its cumulative discount amount for one order.
///
/// Multiple discounts on the same line item sum. Discounts with a missing or
/// empty line item id are dropped entirely, not bucketed under a sentinel.
pub fn discount_map(order: &Order) -> HashMap<String, f64> {
    let mut map: HashMap<String, f64> = HashMap::new();

    for discount in &order.discounts {
        let amount = safe_num(&discount.amount);
        if let Some(line_id) = discount.line_item_id.as_deref() {
            if !line_id.is_empty() {
                *map.entry(line_id.to_string()).or_insert(0.0) += amount;
            }
        }
    }

    map
}

/// Effective quantity of a line item: declared quantity minus any refunded
/// quantity, floored at zero, defaulting to 1 when no quantity key exists.
pub fn effective_quantity(item: &LineItem) -> i64 {
    let mut qty = 1;

    for key in QUANTITY_KEYS {
        if let Some(value) = item.extra.get(key) {
            qty = safe_int(value, 1).max(0);
            break;
        }
    }

    for key in REFUND_KEYS {
        if let Some(value) = item.extra.get(key) {
            qty -= safe_int(value, 0).max(0);
            break;
        }
    }

    qty.max(0)
}

/// Parse an order creation timestamp, treating a trailing zulu marker as a
/// UTC offset. The wall-clock fields as written are kept; no zone
/// conversion is performed. Returns `None` for unparseable input so callers
/// can skip the order silently.
pub fn parse_created_time(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
