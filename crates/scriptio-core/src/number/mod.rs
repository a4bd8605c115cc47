//! Numeric formatting for the write path.
//!
//! Numbers written to a stream are rendered with the C `%.16g` convention:
//! 16 significant digits, trailing zeros stripped, scientific notation once
//! the decimal exponent leaves the `[-4, precision)` window.

/// Significant digits used when writing numbers.
pub const WRITE_PRECISION: usize = 16;

/// Format `value` the way `printf("%.16g")` would.
#[must_use]
pub fn format_number(value: f64) -> String {
    format_g(value, WRITE_PRECISION)
}

/// `%.*g` rendering with `precision` significant digits.
#[must_use]
pub fn format_g(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }

    let precision = precision.max(1);
    // Round to the requested significant digits to learn the exponent.
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = split_exponent(&sci);

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn split_exponent(sci: &str) -> (&str, i32) {
    match sci.split_once(['e', 'E']) {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (sci, 0),
    }
}

/// Strip trailing zeros from a fractional part, and the point itself if
/// nothing remains after it.
fn trim_fraction(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_render_without_a_point() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-350.0), "-350");
        assert_eq!(format_number(1234567.0), "1234567");
    }

    #[test]
    fn negative_zero_keeps_its_sign() {
        assert_eq!(format_number(-0.0), "-0");
    }

    #[test]
    fn fractions_strip_trailing_zeros() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn large_magnitudes_switch_to_scientific() {
        assert_eq!(format_number(1e20), "1e+20");
        assert_eq!(format_number(-2.5e18), "-2.5e+18");
    }

    #[test]
    fn small_magnitudes_switch_to_scientific() {
        assert_eq!(format_number(1e-5), "1e-05");
        assert_eq!(format_number(0.0001), "0.0001");
    }

    #[test]
    fn boundary_exponent_stays_fixed_notation() {
        // Exponent 15 is still inside the %.16g window.
        assert_eq!(format_number(1e15), "1000000000000000");
        assert_eq!(format_number(1e16), "1e+16");
    }

    #[test]
    fn sixteen_significant_digits_survive() {
        assert_eq!(format_number(1.234567890123456), "1.234567890123456");
    }

    #[test]
    fn non_finite_values() {
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_number(f64::NAN), "nan");
    }

    #[test]
    fn lower_precision_rounds() {
        assert_eq!(format_g(1.0 / 3.0, 3), "0.333");
        assert_eq!(format_g(12345.0, 2), "1.2e+04");
    }
}
