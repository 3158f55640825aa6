//! Conversions between decimal price strings and integer cents.

/// Render an amount in cents as a decimal string with two fractional digits.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parse a non-negative decimal amount such as `12`, `12.5` or `12.34` into cents.
///
/// Commas are accepted as the decimal separator. More than two fractional
/// digits, signs and exponents are rejected.
pub fn parse_cents(input: &str) -> Option<i64> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }

    let (whole, fraction) = match normalized.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (normalized.as_str(), ""),
    };

    if fraction.len() > 2 || (whole.is_empty() && fraction.is_empty()) {
        return None;
    }
    if !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().ok()?
    };
    let fraction_value: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    whole_value.checked_mul(100)?.checked_add(fraction_value)
}
