//! Display formatting for amounts, sizes and expiry.

use chrono::{DateTime, Utc};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;
const BYTE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Formats an amount in pesos the way es-AR does: `$ 1.234,56`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (units, fraction) = (cents / 100, cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}$ {grouped},{fraction:02}")
}

/// Formats a byte count with one decimal in the largest fitting unit.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", BYTE_UNITS[unit])
}

/// Whole days from `now` until `end`, rounded up and never negative.
#[must_use]
pub fn days_left(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (end - now).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis + DAY_MILLIS - 1) / DAY_MILLIS
    }
}
