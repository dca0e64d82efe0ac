//! Number rendering for written files
//!
//! Data values are written in scientific notation with a two-digit signed
//! exponent (`1.50000000000000e+00`), positions in the shortest general form
//! that reads back exactly (`1.5`, `1e-05`, `512345.123456789`). Non-finite values are
//! written as `nan`, `inf` and `-inf`, which the parser reads back.

const MAX_ROUND_TRIP_DIGITS: usize = 17;

/// Value in scientific notation with `precision` digits after the point
pub fn format_scientific(value: f64, precision: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }
    let formatted = format!("{:.*e}", precision, value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => with_signed_exponent(mantissa, exponent),
        None => formatted,
    }
}

/// Value in general notation with at most `precision` significant digits
///
/// Fixed notation is used while the decimal exponent lies in
/// `-4..precision`, scientific otherwise; trailing zeros are dropped.
pub fn format_general(value: f64, precision: usize) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let digits = precision.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exp: i32 = exponent.parse().unwrap_or(0);

    if exp < -4 || exp >= digits as i32 {
        let mantissa = strip_trailing_zeros(mantissa);
        with_signed_exponent(&mantissa, exponent)
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

/// Coordinate in general notation that reads back to the same value
///
/// Starts at `precision` significant digits and adds digits until the text
/// parses to `value` again; 17 digits always do.
pub fn format_position(value: f64, precision: usize) -> String {
    let mut digits = precision.max(1);
    loop {
        let text = format_general(value, digits);
        if digits >= MAX_ROUND_TRIP_DIGITS || text.parse::<f64>().is_ok_and(|v| v == value) {
            return text;
        }
        digits += 1;
    }
}

/// Integer rendering for index and flag columns
///
/// Values beyond the `i64` range saturate instead of overflowing.
pub fn format_integer(value: f64, offset: i64) -> String {
    if let Some(text) = non_finite(value) {
        return text.to_string();
    }
    (value as i64).saturating_add(offset).to_string()
}

fn non_finite(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some("nan")
    } else if value == f64::INFINITY {
        Some("inf")
    } else if value == f64::NEG_INFINITY {
        Some("-inf")
    } else {
        None
    }
}

fn with_signed_exponent(mantissa: &str, exponent: &str) -> String {
    let exp: i32 = exponent.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
