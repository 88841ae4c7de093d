// src/format.rs - Display formatting helpers for the view layer
use chrono::DateTime;
use ratatui::style::Color;

/// USD with thousands grouping, e.g. `-$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let whole = abs.trunc() as u64;
    let cents = ((abs - abs.trunc()) * 100.0).round() as u64;
    // Carry when the cents round up to a whole dollar.
    let (whole, cents) = if cents >= 100 { (whole + 1, 0) } else { (whole, cents) };

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}${}.{:02}", sign, grouped, cents)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_quantity(value: f64, decimals: usize) -> String {
    format!("{:.*}", decimals, value)
}

/// RFC 3339 timestamp rendered as `May 01, 2024 10:00`; anything that
/// fails to parse is shown as-is.
pub fn format_date(value: &str) -> String {
    if value.is_empty() {
        return "N/A".to_string();
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
        Err(_) => value.to_string(),
    }
}

pub fn profit_color(value: f64) -> Color {
    if value > 0.0 {
        Color::Green
    } else if value < 0.0 {
        Color::Red
    } else {
        Color::Gray
    }
}

pub fn direction_color(direction: &str) -> Color {
    match direction {
        "BUY" => Color::Green,
        "SELL" => Color::Red,
        "HOLD" => Color::Yellow,
        _ => Color::Gray,
    }
}

pub fn status_color(running: bool) -> Color {
    if running {
        Color::Green
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-9876543.21), "-$9,876,543.21");
        assert_eq!(format_currency(999.999), "$1,000.00");
    }

    #[test]
    fn percent_has_two_decimals() {
        assert_eq!(format_percent(62.5), "62.50%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn date_falls_back_to_raw_string() {
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("not-a-date"), "not-a-date");
        assert_eq!(
            format_date("2024-05-01T10:00:00+00:00"),
            "May 01, 2024 10:00"
        );
    }
}
