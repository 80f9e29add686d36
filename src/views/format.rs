//! Display formatting for prices, dates and nutrition values.

use chrono::{DateTime, TimeZone};

/// Two decimals with the integer part grouped in threes by spaces:
/// `1234567.5` becomes `1 234 567.50`.
pub fn format_price(price: f64) -> String {
    if price == 0.0 || !price.is_finite() {
        return "0.00".to_string();
    }

    let fixed = format!("{:.2}", price.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

/// `Jan 5, 2025`
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %-d, %Y").to_string()
}

/// `Jan 5, 2025, 03:07 PM`
pub fn format_date_time<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    date.format("%b %-d, %Y, %I:%M %p").to_string()
}

/// Grams and kilocalories print without trailing zeros (`4.5`, `12`).
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}")
}
