//! Natural-language query parsing.
//!
//! Extracts the pieces of a question that are not the metric itself: the
//! date window it refers to, whether it refers to dates at all, and the
//! top/bottom-N count ("top 3", "3 smallest"). Anything unsupported
//! returns `None` so the caller can either default the window or ask the
//! user to clarify.

use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:top|max(?:imum)?|lowest|min(?:imum)?|smallest)\s+(\d+)|(\d+)\s+(?:top|max(?:imum)?|lowest|min(?:imum)?|smallest)",
    )
    .expect("Invalid regex")
});

static RELATIVE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:last|past|in the past|in past)\s+(\d+)\s+(day|week|month)s?\b")
        .expect("Invalid regex")
});

static WORD_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:last|past|in the past|in past)\s+([a-z]+)\s+(day|week|month)s?\b")
        .expect("Invalid regex")
});

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").expect("Invalid regex"));

const MONTH_PATTERN: &str = r"jan(uary)?|feb(ruary)?|mar(ch)?|apr(il)?|may|jun(e)?|jul(y)?|aug(ust)?|sep(t|tember)?|oct(ober)?|nov(ember)?|dec(ember)?";

static DATE_HINT_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        format!(r"\b({MONTH_PATTERN})\b"),
        r"\b(today|yesterday|tomorrow)\b".to_string(),
        r"\b(last|past|previous)\s+(day|week|month|year|\d+\s*(days?|weeks?|months?|years?))\b"
            .to_string(),
        r"\b(next)\s+(day|week|month|year)\b".to_string(),
        r"\bthis\s+(week|month|year|quarter)\b".to_string(),
        r"\bquarter\s*\d\b".to_string(),
        r"\b\d{4}-\d{2}-\d{2}\b".to_string(),
        r"\b\d{1,2}[/-]\d{1,2}([/-]\d{2,4})?\b".to_string(),
        format!(r"\b\d{{1,2}}(st|nd|rd|th)?\b\s+(of\s+)?\b({MONTH_PATTERN})\b"),
        r"\b(from|between)\b.*\b(to|and|through|thru|till|until)\b".to_string(),
        r"\b(on|by|before|after|since|during)\b\s+".to_string(),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid regex"))
    .collect()
});

fn number_word(word: &str) -> Option<i64> {
    let n = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        _ => return None,
    };
    Some(n)
}

fn unit_days(count: i64, unit: &str) -> i64 {
    match unit {
        "week" => count * 7,
        "month" => count * 30, // approximation, as documented
        _ => count,
    }
}

/// Extract a top/bottom-N count ("top 3", "3 smallest"); defaults to 1.
pub fn parse_order_count(query: &str) -> usize {
    let q = query.to_lowercase();
    if let Some(caps) = COUNT_RE.captures(q.trim()) {
        let digits = caps.get(1).or_else(|| caps.get(2));
        if let Some(m) = digits {
            if let Ok(n) = m.as_str().parse::<usize>() {
                return n;
            }
        }
    }
    1
}

/// True when the question refers to a date or time period at all. Used to
/// decide between silently defaulting the window and asking the user to
/// clarify an unparseable date.
pub fn has_date_hint(query: &str) -> bool {
    let q = query.to_lowercase();
    DATE_HINT_RES.iter().any(|re| re.is_match(&q))
}

/// Parse a natural-language date range against today's date.
pub fn parse_date_range(query: &str) -> Option<(NaiveDate, NaiveDate)> {
    parse_date_range_at(query, Local::now().date_naive())
}

/// Deterministic core of [`parse_date_range`].
///
/// Supported phrasings: "yesterday", "today", "past 3 days", "last 2
/// weeks", "past month", number words ("past three days"), and bare ISO
/// dates. Returns `None` for anything else.
pub fn parse_date_range_at(query: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let q = query.to_lowercase();

    if q.contains("yesterday") {
        let day = today - Duration::days(1);
        return Some((day, day));
    }
    if q.contains("today") {
        return Some((today, today));
    }

    if let Some(caps) = RELATIVE_SPAN_RE.captures(&q) {
        let count: i64 = caps[1].parse().unwrap_or(1);
        let days = unit_days(count, &caps[2]);
        return Some((today - Duration::days(days), today));
    }

    // Bare "last week" / "past month" style spans.
    if q.contains("last week") || q.contains("past week") {
        return Some((today - Duration::days(7), today));
    }
    if q.contains("last month") || q.contains("past month") {
        return Some((today - Duration::days(30), today));
    }

    // Spelled-out counts: "past three days".
    if let Some(caps) = WORD_SPAN_RE.captures(&q) {
        if let Some(count) = number_word(&caps[1]) {
            let days = unit_days(count, &caps[2]);
            return Some((today - Duration::days(days), today));
        }
    }

    // A bare ISO date means that single day.
    if let Some(caps) = ISO_DATE_RE.captures(&q) {
        if let Ok(date) = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d") {
            return Some((date, date));
        }
    }

    None
}

/// Check that a requested range lies entirely within the available data
/// window.
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    available_start: NaiveDate,
    available_end: NaiveDate,
) -> bool {
    available_start <= start
        && start <= available_end
        && available_start <= end
        && end <= available_end
}
