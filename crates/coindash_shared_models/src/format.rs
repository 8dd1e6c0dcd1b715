//! Number formatting for dashboard output, following en-US conventions.

use crate::currency::Currency;

/// Formats `value` with a fixed number of decimals and comma thousands
/// separators.
pub fn format_number(value: f64, decimals: usize) -> String {
    let rendered = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match rendered.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + integer.len() / 3 + 1);
    if value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn currency_symbol(currency: &Currency) -> Option<&'static str> {
    match currency.as_query() {
        "usd" => Some("$"),
        "eur" => Some("€"),
        "gbp" => Some("£"),
        "jpy" => Some("¥"),
        "inr" => Some("₹"),
        "krw" => Some("₩"),
        "btc" => Some("₿"),
        _ => None,
    }
}

/// Two-decimal currency amount, e.g. `$1,234.50` or `CHF 1,234.50`.
pub fn format_currency(value: f64, currency: &Currency) -> String {
    let amount = format_number(value, 2);
    let (sign, digits) = match amount.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", amount.as_str()),
    };

    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{digits}"),
        None => format!("{sign}{} {digits}", currency.display_code()),
    }
}

/// Abbreviates with K/M/B/T suffixes.
pub fn format_large_number(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    UNITS
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(threshold, suffix)| format!("{:.2}{suffix}", value / threshold))
        .unwrap_or_else(|| format!("{value:.2}"))
}

/// Signed percentage, e.g. `+2.50%` or `-1.25%`.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.decimals$}%")
}

pub fn format_supply(value: f64) -> String {
    format_number(value, 1)
}
