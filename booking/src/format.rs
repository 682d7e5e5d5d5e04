//! Display formatting helpers
//!
//! Pure functions shared by review screens, the calculator widget, and
//! export downloads. Turkish locale conventions: `.` for thousands, `,` for
//! decimals, `dd.MM.yyyy` dates.

use chrono::NaiveDate;

use crate::types::ExportFormat;

/// Format an amount as Turkish currency, e.g. `1.234,50 TL`
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{fraction:02} TL")
}

/// Format a date as `dd.MM.yyyy`
#[must_use]
pub fn format_date_tr(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

/// Humanize a rental duration
///
/// Buckets: hours under a day, days under a week, weeks under a month, then
/// months; the day remainder is appended when non-zero.
#[must_use]
pub fn humanize_duration(duration_days: u32, duration_hours: u32) -> String {
    if duration_hours < 24 {
        return format!("{duration_hours} saat");
    }
    if duration_days == 1 {
        return "1 gün".to_owned();
    }
    if duration_days < 7 {
        return format!("{duration_days} gün");
    }
    if duration_days < 30 {
        let weeks = duration_days / 7;
        let days = duration_days % 7;
        if days == 0 {
            return format!("{weeks} hafta");
        }
        return format!("{weeks} hafta {days} gün");
    }
    let months = duration_days / 30;
    let days = duration_days % 30;
    if days == 0 {
        format!("{months} ay")
    } else {
        format!("{months} ay {days} gün")
    }
}

/// Filename for a list export, e.g. `faturalar-2025-06-01.xlsx`
#[must_use]
pub fn export_filename(entity: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{entity}-{}.{}", date.format("%Y-%m-%d"), format.extension())
}
