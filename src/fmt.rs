use chrono::{Datelike, NaiveDate};

/// Format an amount with thousands separators and a trailing currency
/// symbol: 12,000₮, 1,234.56₮. Cents are only shown when non-zero.
pub fn money(val: f64, symbol: &str) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    let sign = if negative && cents != "0.00" { "-" } else { "" };
    if dec_part == "00" {
        format!("{sign}{with_commas}{symbol}")
    } else {
        format!("{sign}{with_commas}.{dec_part}{symbol}")
    }
}

/// Long day label used as the heading of a day group: "May 1st, 2024".
pub fn day_label(day: NaiveDate) -> String {
    let d = day.day();
    let suffix = match (d % 10, d % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {d}{suffix}, {}", day.format("%B"), day.year())
}
