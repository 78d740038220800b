//! Templated insight rendering.
//!
//! When narration is disabled or the LLM is unreachable, the answer is built
//! from the computed facts directly. Every metric gets its own section
//! renderer so the output stays readable without a model in the loop.

use crate::agent::describe_range;
use crate::models::{Facts, OrderBreakdown};
use chrono::NaiveDate;
use std::fmt::Write;

/// Build a plain-text insight from the facts alone.
pub fn fallback_summary(
    intent_name: &str,
    facts: &Facts,
    range: Option<(NaiveDate, NaiveDate)>,
    reason: Option<&str>,
) -> String {
    let mut out = String::new();

    match reason {
        Some(reason) => {
            let _ = writeln!(out, "Insight (LLM unavailable: {reason})");
        }
        None => out.push_str("Insight\n"),
    }
    let _ = writeln!(out, "Metric: {intent_name} {}", describe_range(range));
    out.push('\n');

    out.push_str(&render_facts(facts));
    out
}

fn render_facts(facts: &Facts) -> String {
    match facts {
        Facts::TotalRevenue(v) => format!("- Total revenue: ${v:.2}\n"),
        Facts::AverageOrderValue(v) => format!("- Average order value: ${v:.2}\n"),
        Facts::OrderCount(n) => format!("- Orders placed: {n}\n"),
        Facts::AverageItemsPerOrder(v) => format!("- Average items per order: {v:.2}\n"),
        Facts::DiscountImpact(v) => format!("- Total discount impact: ${v:.2}\n"),
        Facts::MaxOrder(orders) => render_order_ranking("Largest orders", orders),
        Facts::MinOrder(orders) => render_order_ranking("Smallest orders", orders),
        Facts::TopItems {
            top_items_revenue,
            top_items_units,
        } => {
            let mut out = String::from("Top items by revenue:\n");
            if top_items_revenue.is_empty() {
                out.push_str("  (no items found)\n");
            }
            for (rank, item) in top_items_revenue.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {}: ${:.2}",
                    rank + 1,
                    item.name.as_deref().unwrap_or("(unnamed)"),
                    item.revenue_usd
                );
            }
            if !top_items_units.is_empty() {
                out.push_str("Top items by units sold:\n");
                for (rank, item) in top_items_units.iter().enumerate() {
                    let _ = writeln!(out, "  {}. {}: {} units", rank + 1, item.name, item.units);
                }
            }
            out
        }
        Facts::MostFrequentItems(items) => {
            let mut out = String::from("Most frequently ordered items:\n");
            if items.is_empty() {
                out.push_str("  (no items found)\n");
            }
            for (rank, item) in items.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {}: appeared in {} orders",
                    rank + 1,
                    item.name.as_deref().unwrap_or("(unnamed)"),
                    item.count
                );
            }
            out
        }
        Facts::MaxDiscount(record) => match record {
            Some(record) => {
                let mut out = String::new();
                let _ = writeln!(
                    out,
                    "- Largest discount: ${:.2} ({})",
                    record.discount_amount_usd, record.discount_type
                );
                let _ = writeln!(
                    out,
                    "- Applied on order {} (line item {})",
                    record.order_id.as_deref().unwrap_or("(unknown)"),
                    record.line_item_id.as_deref().unwrap_or("(unknown)")
                );
                out
            }
            None => "- No discounts found.\n".to_string(),
        },
        Facts::SalesByEmployee(ranking) => {
            let mut out = String::from("Sales by employee:\n");
            if ranking.is_empty() {
                out.push_str("  (no orders found)\n");
            }
            for (rank, entry) in ranking.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {}: ${:.2}",
                    rank + 1,
                    entry.employee_id.as_deref().unwrap_or("(unassigned)"),
                    entry.revenue_usd
                );
            }
            out
        }
        Facts::RefundSummary(summary) => format!(
            "- Refunded items: {}\n- Refunded amount: ${:.2}\n",
            summary.refunded_items, summary.refunded_amount_usd
        ),
        Facts::SalesByCategory(ranking) => {
            let mut out = String::from("Sales by category:\n");
            if ranking.is_empty() {
                out.push_str("  (no orders found)\n");
            }
            for (rank, entry) in ranking.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {}: ${:.2}",
                    rank + 1,
                    entry.category,
                    entry.revenue_usd
                );
            }
            out
        }
        Facts::SalesTrend(days) => {
            let mut out = String::from("Daily revenue:\n");
            if days.is_empty() {
                out.push_str("  (no orders found)\n");
            }
            for day in days {
                let _ = writeln!(out, "  - {}: ${:.2}", day.date, day.revenue_usd);
            }
            out
        }
        Facts::HourlySales(hours) => {
            let mut out = String::from("Revenue by hour:\n");
            if hours.is_empty() {
                out.push_str("  (no orders found)\n");
            }
            for hour in hours {
                let _ = writeln!(out, "  - {}: ${:.2}", hour.hour, hour.revenue_usd);
            }
            out
        }
        Facts::Summary(text) => format!("- {text}\n"),
    }
}

fn render_order_ranking(title: &str, orders: &[OrderBreakdown]) -> String {
    let mut out = format!("{title}:\n");
    if orders.is_empty() {
        out.push_str("  (no orders found)\n");
    }
    for (rank, order) in orders.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. Order {}: ${:.2} (items ${:.2}, tax/fees ${:.2})",
            rank + 1,
            order.order_id.as_deref().unwrap_or("(unknown)"),
            order.total_usd,
            order.item_sum_usd,
            order.tax_or_fee_usd
        );
        for item in &order.items {
            let _ = writeln!(
                out,
                "     - {}: ${:.2} base, ${:.2} discount, ${:.2} final",
                item.name.as_deref().unwrap_or("(unnamed)"),
                item.base_price,
                item.discount,
                item.final_price
            );
        }
    }
    out
}

/// Render the facts as pretty-printed JSON for `--format json`.
pub fn facts_as_json(facts: &Facts) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(facts)?)
}
