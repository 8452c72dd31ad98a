//! Presentation formatters
//!
//! Pure, deterministic helpers turning canonical values into display
//! strings: currency (minor units, en-GB style), dates, metric quantities
//! and transport-mode badges. Invalid or absent input renders as an em-dash
//! placeholder; none of these ever fail.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::Metric;

/// Placeholder shown for absent or unparseable display values
pub const PLACEHOLDER: &str = "—";

/// Format an amount in minor currency units as an en-GB currency string.
///
/// Assumes GBP pence unless another ISO code is given; unrecognised codes
/// are prefixed verbatim.
pub fn format_currency(minor_units: i64, currency: &str) -> String {
    let symbol = match currency {
        "GBP" => "£",
        "EUR" => "€",
        "USD" => "$",
        other => return format!("{} {}", other, format_major_units(minor_units)),
    };
    format!("{}{}", symbol, format_major_units(minor_units))
}

fn format_major_units(minor_units: i64) -> String {
    let sign = if minor_units < 0 { "-" } else { "" };
    let minor = minor_units.unsigned_abs();
    format!(
        "{}{}.{:02}",
        sign,
        group_thousands(minor / 100),
        minor % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Format an ISO date or datetime string as "7 Dec 2023"
pub fn format_date(date: Option<&str>) -> String {
    match date.and_then(parse_date_time) {
        Some(dt) => dt.format("%-d %b %Y").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Format an ISO datetime string as "7 Dec 2023 09:30"
pub fn format_date_time(date: Option<&str>) -> String {
    match date.and_then(parse_date_time) {
        Some(dt) => dt.format("%-d %b %Y %H:%M").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

fn parse_date_time(input: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a metric quantity with its unit suffix.
///
/// Known values print with two decimals; raw provider values print
/// verbatim; unavailable/missing values print the placeholder.
pub fn format_metric(metric: &Metric, unit: &str) -> String {
    match metric {
        Metric::Known(value) => format!("{:.2} {}", value, unit),
        Metric::Raw(raw) => format!("{} {}", raw, unit),
        Metric::Unavailable | Metric::Missing => PLACEHOLDER.to_string(),
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Icon glyph for a transport mode code; unrecognised codes get the bus
pub fn mode_icon(mode: &str) -> &'static str {
    match mode {
        "bus" => "🚌",
        "train" => "🚆",
        "tube" => "🚇",
        "tram" => "🚊",
        "taxi" => "🚕",
        "bike" => "🚲",
        "walk" => "🚶",
        _ => "🚌",
    }
}

/// Badge color classes for a transport mode code; unrecognised codes get
/// the neutral gray
pub fn mode_color(mode: &str) -> &'static str {
    match mode {
        "bus" => "bg-blue-100 text-blue-800",
        "train" => "bg-green-100 text-green-800",
        "tube" => "bg-red-100 text-red-800",
        "tram" => "bg-purple-100 text-purple-800",
        "taxi" => "bg-yellow-100 text-yellow-800",
        "bike" => "bg-orange-100 text-orange-800",
        "walk" => "bg-gray-100 text-gray-800",
        _ => "bg-gray-100 text-gray-800",
    }
}

/// Capitalized label for a transport mode code
pub fn mode_label(mode: &str) -> String {
    capitalize_first(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_defaults_to_gbp_pence() {
        assert_eq!(format_currency(500, "GBP"), "£5.00");
        assert_eq!(format_currency(7, "GBP"), "£0.07");
        assert_eq!(format_currency(123_456, "GBP"), "£1,234.56");
        assert_eq!(format_currency(100_000_000, "GBP"), "£1,000,000.00");
    }

    #[test]
    fn currency_other_codes() {
        assert_eq!(format_currency(250, "EUR"), "€2.50");
        assert_eq!(format_currency(250, "CHF"), "CHF 2.50");
    }

    #[test]
    fn date_formats_iso_inputs() {
        assert_eq!(format_date(Some("2023-12-07")), "7 Dec 2023");
        assert_eq!(format_date(Some("2023-12-07T09:30:00Z")), "7 Dec 2023");
        assert_eq!(
            format_date_time(Some("2023-12-07T09:30:00Z")),
            "7 Dec 2023 09:30"
        );
    }

    #[test]
    fn date_invalid_or_absent_renders_placeholder() {
        assert_eq!(format_date(None), PLACEHOLDER);
        assert_eq!(format_date(Some("not a date")), PLACEHOLDER);
        assert_eq!(format_date_time(Some("12/07/2023")), PLACEHOLDER);
    }

    #[test]
    fn metric_rendering() {
        assert_eq!(format_metric(&Metric::Known(12.4), "km"), "12.40 km");
        assert_eq!(format_metric(&Metric::Unavailable, "km"), PLACEHOLDER);
        assert_eq!(format_metric(&Metric::Missing, "g"), PLACEHOLDER);
        assert_eq!(
            format_metric(&Metric::Raw("approx 12".into()), "km"),
            "approx 12 km"
        );
    }

    #[test]
    fn unknown_mode_gets_default_badge() {
        assert_eq!(mode_icon("train"), "🚆");
        assert_eq!(mode_icon("hovercraft"), "🚌");
        assert_eq!(mode_color("hovercraft"), "bg-gray-100 text-gray-800");
        assert_eq!(mode_label("bus"), "Bus");
        assert_eq!(mode_label(""), "");
    }
}
