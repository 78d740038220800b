//! Intent classification for sales questions.
//!
//! Keyword and pattern heuristics map free text to one of the fixed metric
//! intents the analytics engine knows how to compute. Classification is
//! ordered: item-level phrasing is checked before the generic max/min and
//! revenue branches so "best selling item" never lands on `MaxOrder`.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

/// The fixed set of analytic intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    TotalRevenue,
    AverageOrderValue,
    MaxOrder,
    MinOrder,
    OrderCount,
    TopItems,
    MostFrequentItems,
    AverageItemsPerOrder,
    DiscountImpact,
    MaxDiscount,
    SalesByEmployee,
    RefundSummary,
    SalesByCategory,
    SalesTrend,
    HourlySales,
    General,
}

impl Intent {
    /// Snake-case name used in logs and narrator prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Intent::TotalRevenue => "total_revenue",
            Intent::AverageOrderValue => "average_order_value",
            Intent::MaxOrder => "max_order",
            Intent::MinOrder => "min_order",
            Intent::OrderCount => "order_count",
            Intent::TopItems => "top_items",
            Intent::MostFrequentItems => "most_frequent_items",
            Intent::AverageItemsPerOrder => "average_items_per_order",
            Intent::DiscountImpact => "discount_impact",
            Intent::MaxDiscount => "max_discount",
            Intent::SalesByEmployee => "sales_by_employee",
            Intent::RefundSummary => "refund_summary",
            Intent::SalesByCategory => "sales_by_category",
            Intent::SalesTrend => "sales_trend",
            Intent::HourlySales => "hourly_sales",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z0-9\-]+").expect("Invalid regex"));

static BEST_SELLING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bbest[-\s]?selling\b").expect("Invalid regex"));

const MAX_WORDS: [&str; 6] = ["max", "highest", "largest", "maximum", "biggest", "top"];
const MIN_WORDS: [&str; 5] = ["min", "lowest", "smallest", "minimum", "least"];
const EMPLOYEE_WORDS: [&str; 14] = [
    "employee",
    "employees",
    "staff",
    "cashier",
    "agent",
    "associate",
    "salesperson",
    "salesman",
    "saleswoman",
    "server",
    "waiter",
    "rep",
    "representative",
    "crew",
];
const REFUND_WORDS: [&str; 7] = [
    "refund",
    "refunded",
    "refunds",
    "return",
    "returned",
    "chargeback",
    "chargebacks",
];
const COUNT_PHRASES: [&str; 6] = ["how many", "number", "count", "units", "quantity", "qty"];
const REVENUE_WORDS: [&str; 11] = [
    "revenue",
    "sales",
    "turnover",
    "takings",
    "collection",
    "collections",
    "earnings",
    "income",
    "total",
    "amount",
    "made",
];

/// Tokens plus lightly singularized forms; stands in for lemmatization so
/// "items" still satisfies an "item" check.
fn token_set(query: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();
    for m in TOKEN_RE.find_iter(query) {
        let word = m.as_str().to_string();
        if word.len() > 3 && word.ends_with('s') && !word.ends_with("ss") {
            tokens.insert(word[..word.len() - 1].to_string());
        }
        tokens.insert(word);
    }
    tokens
}

/// Classify a user question into an analytic intent.
pub fn detect_intent(query: &str) -> Intent {
    let q = query.to_lowercase();
    let q = q.trim();
    let tokens = token_set(q);
    let has = |word: &str| tokens.contains(word);
    let has_any = |words: &[&str]| words.iter().any(|w| tokens.contains(*w));

    // Item / product analytics.
    let item_superlative = BEST_SELLING_RE.is_match(q)
        || ["bestseller", "top selling", "top-selling", "topselling", "most sold", "most-selling"]
            .iter()
            .any(|phrase| q.contains(phrase))
        || ((has("sell") || has("sold") || has("selling"))
            && (has("best") || has("top") || has("most")))
        || ((has("item") || has("product")) && has_any(&MAX_WORDS));

    if item_superlative {
        // Count wording means the user wants occurrences, not revenue.
        if COUNT_PHRASES.iter().any(|phrase| q.contains(phrase)) {
            return Intent::MostFrequentItems;
        }
        return Intent::TopItems;
    }

    if has("frequent") || (has("most") && has("common")) {
        return Intent::MostFrequentItems;
    }
    if has("average") && has("item") {
        return Intent::AverageItemsPerOrder;
    }

    // Revenue / value.
    if has("average") && (has("order") || has("purchase") || has("aov")) {
        return Intent::AverageOrderValue;
    }

    // Order-level.
    if has_any(&MAX_WORDS) && !has_any(&["discount", "promo", "coupon"]) {
        return Intent::MaxOrder;
    }
    if has_any(&MIN_WORDS) {
        return Intent::MinOrder;
    }
    if (q.contains("how many") && q.contains("order"))
        || (has("order") && (has("count") || has("number") || has("total")))
    {
        return Intent::OrderCount;
    }

    // Discount / employee / refund / category / hour.
    if has_any(&["discount", "promo", "coupon"]) {
        if has_any(&["max", "highest", "largest", "maximum", "biggest"]) {
            return Intent::MaxDiscount;
        }
        return Intent::DiscountImpact;
    }
    if has_any(&EMPLOYEE_WORDS) {
        return Intent::SalesByEmployee;
    }
    if has_any(&REFUND_WORDS) {
        return Intent::RefundSummary;
    }
    if has_any(&["category", "categories", "department", "section"]) {
        return Intent::SalesByCategory;
    }
    if has_any(&["hour", "hourly", "busiest", "peak"]) {
        return Intent::HourlySales;
    }

    // Trend / time-based.
    if has_any(&["trend", "trends", "time", "daily", "weekly", "monthly"])
        || q.contains("over time")
        || q.contains("by day")
        || q.contains("per day")
    {
        return Intent::SalesTrend;
    }

    if has_any(&REVENUE_WORDS) {
        return Intent::TotalRevenue;
    }

    Intent::General
}
