//! Display formatting for amounts and dates (Turkish locale).

use chrono::{DateTime, Local, TimeZone, Utc};

const CURRENCY_SUFFIX: &str = " ₺";

/// Formats an amount like `toLocaleString('tr-TR')` plus the lira sign.
///
/// Uses `.` for thousands, `,` for decimals and at most three fraction
/// digits without trailing zeros: `1500.5` becomes `1.500,5 ₺`.
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.3}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + 6);
    if amount < 0.0 && (whole != "0" || !fraction.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if !fraction.is_empty() {
        out.push(',');
        out.push_str(fraction);
    }
    out.push_str(CURRENCY_SUFFIX);
    out
}

/// Formats a stored timestamp as `dd.MM.yyyy` on the device's local day.
pub fn format_date(date: &DateTime<Utc>) -> String {
    format_date_in(date, &Local)
}

/// Formats a stored timestamp as `dd.MM.yyyy` on the calendar day of `zone`.
pub fn format_date_in<Tz: TimeZone>(date: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(zone).format("%d.%m.%Y").to_string()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::{format_currency, format_date, format_date_in};
    use chrono::{FixedOffset, Local, TimeZone, Utc};

    #[test]
    fn currency_uses_turkish_separators() {
        assert_eq!(format_currency(1500.5), "1.500,5 ₺");
        assert_eq!(format_currency(40000.0), "40.000 ₺");
        assert_eq!(format_currency(1234567.891), "1.234.567,891 ₺");
        assert_eq!(format_currency(999.0), "999 ₺");
        assert_eq!(format_currency(0.1234), "0,123 ₺");
        assert_eq!(format_currency(-2500.0), "-2.500 ₺");
    }

    #[test]
    fn date_is_day_month_year() {
        let date = Utc.with_ymd_and_hms(2025, 6, 7, 18, 0, 0).unwrap();
        assert_eq!(format_date_in(&date, &Utc), "07.06.2025");
    }

    #[test]
    fn late_utc_evening_is_next_day_in_turkey() {
        let date = Utc.with_ymd_and_hms(2025, 6, 7, 22, 30, 0).unwrap();
        let istanbul = FixedOffset::east_opt(3 * 3600).unwrap();
        assert_eq!(format_date_in(&date, &istanbul), "08.06.2025");
        assert_eq!(format_date_in(&date, &Utc), "07.06.2025");
    }

    #[test]
    fn default_formatting_uses_local_zone() {
        let date = Utc.with_ymd_and_hms(2025, 6, 7, 22, 30, 0).unwrap();
        assert_eq!(format_date(&date), format_date_in(&date, &Local));
    }
}
