use crate::calculations::RateCalculator;

/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use reports_core::formatting::format_number;
///
/// assert_eq!(format_number(25000.0, 0), "25,000");
/// assert_eq!(format_number(1234.5, 2), "1,234.50");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };

    let mut result = group_thousands(integer_part);
    if let Some(frac) = decimal_part {
        result.push('.');
        result.push_str(frac);
    }

    // "-0" is never shown.
    let is_zero = result.chars().all(|c| matches!(c, '0' | '.' | ','));
    if value < 0.0 && !is_zero {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an hour total, dropping the decimals when it is whole.
///
/// "Whole" follows [`RateCalculator::is_whole`], so a total that is rated is
/// also shown without decimals.
///
/// # Examples
///
/// ```
/// use reports_core::formatting::format_hours;
///
/// assert_eq!(format_hours(12.0), "12");
/// assert_eq!(format_hours(4.5), "4.50");
/// ```
pub fn format_hours(hours: f64) -> String {
    if RateCalculator::is_whole(hours) {
        format_number(hours.round(), 0)
    } else {
        format_number(hours, 2)
    }
}

/// Format a suppressed-or-present rate; `None` renders as `"-"`.
///
/// # Examples
///
/// ```
/// use reports_core::formatting::format_rate;
///
/// assert_eq!(format_rate(Some(5000)), "5,000");
/// assert_eq!(format_rate(None), "-");
/// ```
pub fn format_rate(rate: Option<i64>) -> String {
    match rate {
        Some(r) => format_number(r as f64, 0),
        None => "-".to_string(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

// ── Tests ──────────────────────────────────────────────────────────────────────
