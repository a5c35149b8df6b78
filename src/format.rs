use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::model::Language;

const MINUTES_PER_DAY: i64 = 24 * 60;

static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?)(\d+\.?\d*|\.\d+)").expect("number pattern is valid"));

/// End of a booking slot as `HH:MM`, wrapping past midnight.
///
/// Returns an empty string when the start time is missing or unparsable, or
/// when `hours` is not a positive number.
pub fn calculate_end_time(start_time: &str, hours: f64) -> String {
    let start_time = start_time.trim();
    if start_time.is_empty() || !hours.is_finite() || hours <= 0.0 {
        return String::new();
    }

    let start = match NaiveTime::parse_from_str(start_time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(start_time, "%H:%M:%S"))
    {
        Ok(t) => t,
        Err(_) => return String::new(),
    };

    let minutes = ((hours * 60.0).round() as i64).rem_euclid(MINUTES_PER_DAY);
    let (end, _) = start.overflowing_add_signed(Duration::minutes(minutes));
    end.format("%H:%M").to_string()
}

/// Lenient number parsing for form input.
///
/// Thousands separators are stripped and the leading numeric prefix is read,
/// so `"1,234.50"` is 1234.5 and `"12 baht"` is 12. Anything without a
/// leading number is zero.
pub fn parse_number(value: &str) -> Decimal {
    let cleaned = value.replace(',', "");
    let Some(caps) = NUMBER_PREFIX.captures(&cleaned) else {
        return Decimal::ZERO;
    };

    let digits = caps[2].trim_end_matches('.');
    let digits = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };

    match Decimal::from_str(&digits) {
        Ok(n) if &caps[1] == "-" => -n,
        Ok(n) => n,
        Err(_) => Decimal::ZERO,
    }
}

/// Two decimals with thousands separators (`1,234.50`), as printed on the
/// contract.
pub fn format_currency(amount: Decimal) -> String {
    group_thousands(&format!("{:.2}", amount.round_dp(2)))
}

/// Plain amount with separators and no trailing zeros (`15,000`, `1,234.5`),
/// as used in the booking summary.
pub fn format_amount(amount: Decimal) -> String {
    group_thousands(&amount.round_dp(3).normalize().to_string())
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Event dates in summaries and detail rows. Thai uses the Buddhist era.
pub fn format_date(date: NaiveDate, lang: Language) -> String {
    match lang {
        Language::Th => format!("{}/{}/{}", date.day(), date.month(), date.year() + 543),
        Language::En => date.format("%d/%m/%Y").to_string(),
    }
}

/// `DD/MM/YYYY`, used for the contract issue date.
pub fn format_document_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_time_same_day() {
        assert_eq!(calculate_end_time("18:00", 3.0), "21:00");
        assert_eq!(calculate_end_time("09:15", 2.5), "11:45");
    }

    #[test]
    fn test_end_time_wraps_midnight() {
        assert_eq!(calculate_end_time("23:00", 3.0), "02:00");
        assert_eq!(calculate_end_time("22:30", 26.0), "00:30");
    }

    #[test]
    fn test_end_time_invalid_input_is_empty() {
        assert_eq!(calculate_end_time("", 3.0), "");
        assert_eq!(calculate_end_time("18:00", 0.0), "");
        assert_eq!(calculate_end_time("18:00", -1.0), "");
        assert_eq!(calculate_end_time("18:00", f64::NAN), "");
        assert_eq!(calculate_end_time("evening", 3.0), "");
    }

    #[test]
    fn test_parse_number_strips_separators() {
        assert_eq!(parse_number("1,234.50"), Decimal::new(12345, 1));
        assert_eq!(parse_number("8,900"), Decimal::from(8900));
    }

    #[test]
    fn test_parse_number_non_numeric_is_zero() {
        assert_eq!(parse_number("abc"), Decimal::ZERO);
        assert_eq!(parse_number(""), Decimal::ZERO);
        assert_eq!(parse_number("."), Decimal::ZERO);
        assert_eq!(parse_number("-"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_number_reads_leading_prefix() {
        assert_eq!(parse_number("  12 baht"), Decimal::from(12));
        assert_eq!(parse_number("-3.5"), Decimal::new(-35, 1));
        assert_eq!(parse_number(".5"), Decimal::new(5, 1));
        assert_eq!(parse_number("7."), Decimal::from(7));
        assert_eq!(parse_number("1.2.3"), Decimal::new(12, 1));
        assert_eq!(parse_number("+5"), Decimal::from(5));
        assert_eq!(parse_number("-.25"), Decimal::new(-25, 2));
        assert_eq!(parse_number("baht 12"), Decimal::ZERO);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::from(8900)), "8,900.00");
        assert_eq!(format_currency(Decimal::new(12345, 1)), "1,234.50");
        assert_eq!(format_currency(Decimal::from(500)), "500.00");
        assert_eq!(format_currency(Decimal::from(-1234567)), "-1,234,567.00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Decimal::from(15000)), "15,000");
        assert_eq!(format_amount(Decimal::new(123450, 2)), "1,234.5");
        assert_eq!(format_amount(Decimal::ZERO), "0");
    }

    #[test]
    fn test_format_date_by_language() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date, Language::Th), "7/3/2568");
        assert_eq!(format_date(date, Language::En), "07/03/2025");
        assert_eq!(format_document_date(date), "07/03/2025");
    }
}
