//! Brazilian Real formatting and parsing.
//!
//! Two conventions exist for money typed into forms:
//! - masked cents: the field holds only the digits the user typed, read as
//!   an integer number of cents (`"12345"` is R$ 123,45);
//! - decimal text: the field holds a plain or comma-decimal number
//!   (`"123.45"`, `"123,45"`).
//!
//! Benefit rates, gratification and discount are masked cents and convert
//! with [`parse_masked_cents`]. Salary is decimal text and goes through
//! [`parse_decimal_string`].

const PLACEHOLDER: &str = "R$ -";

/// Masks raw keystrokes as a cents amount: `"12345"` → `"123,45"`.
///
/// Non-digits are dropped. No digits gives an empty string.
pub fn format_currency_input(value: &str) -> String {
    let digits: String = value.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return String::new();
    }

    let significant = digits.trim_start_matches('0');
    let padded = format!("{significant:0>3}");
    let (units, cents) = padded.split_at(padded.len() - 2);
    format!("{units},{cents}")
}

/// Converts a stored money string to a number.
///
/// A plain numeric literal is taken verbatim. Anything else has its first
/// comma turned into a period and its leading decimal prefix parsed.
/// Empty or unparseable input is 0.
pub fn parse_decimal_string(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Ok(v) = trimmed.parse::<f64>() {
        if v.is_finite() {
            return v;
        }
    }

    let normalized = trimmed.replacen(',', ".", 1);
    leading_decimal(&normalized).unwrap_or(0.0)
}

/// Masked cents to a number.
pub fn parse_masked_cents(raw: &str) -> f64 {
    parse_decimal_string(&format_currency_input(raw))
}

/// Longest prefix that reads as `[+-]digits[.digits][e[+-]digits]`.
fn leading_decimal(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].trim_end_matches('.').parse().ok()
}

fn fixed_comma(value: f64) -> String {
    format!("{value:.2}").replace('.', ",")
}

fn is_blank(value: Option<f64>) -> bool {
    match value {
        None => true,
        Some(v) => v.is_nan() || v == 0.0,
    }
}

/// Receipt amount: absent, zero or NaN prints `R$ -`.
pub fn print_currency(value: Option<f64>) -> String {
    match value {
        Some(v) if !is_blank(value) => format!("R$ {}", fixed_comma(v)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Receipt deduction: same placeholder rule, otherwise `R$ -<amount>`.
pub fn negative_print_currency(value: Option<f64>) -> String {
    match value {
        Some(v) if !is_blank(value) => format!("R$ -{}", fixed_comma(v)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// pt-BR display format with thousands grouping: `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ 0,00".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (units, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, c) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}R$ {grouped},{cents}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masking_reads_digits_as_cents() {
        assert_eq!(format_currency_input("12345"), "123,45");
        assert_eq!(format_currency_input("5"), "0,05");
        assert_eq!(format_currency_input("50"), "0,50");
        assert_eq!(format_currency_input("100"), "1,00");
        assert_eq!(format_currency_input("00123"), "1,23");
        assert_eq!(format_currency_input("0"), "0,00");
        assert_eq!(format_currency_input("R$ 1.234,56"), "1234,56");
        assert_eq!(format_currency_input(""), "");
        assert_eq!(format_currency_input("R$ "), "");
    }

    #[test]
    fn parsing_handles_both_conventions() {
        assert_eq!(parse_decimal_string(""), 0.0);
        assert_eq!(parse_decimal_string("   "), 0.0);
        assert_eq!(parse_decimal_string("150"), 150.0);
        assert_eq!(parse_decimal_string("150.75"), 150.75);
        assert_eq!(parse_decimal_string("150,75"), 150.75);
        assert_eq!(parse_decimal_string("1,234,56"), 1.234);
        assert_eq!(parse_decimal_string("12,5abc"), 12.5);
        assert_eq!(parse_decimal_string("abc"), 0.0);
        assert_eq!(parse_decimal_string("NaN"), 0.0);
        assert_eq!(parse_decimal_string("-3,5"), -3.5);
    }

    #[test]
    fn masked_cents_preserve_value() {
        for cents in [0u64, 1, 9, 10, 99, 100, 101, 12_345, 99_999, 1_000_000, 123_456_789] {
            let typed = cents.to_string();
            let parsed = parse_masked_cents(&typed);
            assert_eq!((parsed * 100.0).round() as u64, cents, "typed {typed}");
        }
        assert_eq!(parse_masked_cents(""), 0.0);
    }

    #[test]
    fn plain_number_is_not_cents() {
        // the factor of 100 between the two conventions
        assert_eq!(parse_decimal_string("12345"), 12345.0);
        assert_eq!(parse_masked_cents("12345"), 123.45);
    }

    #[test]
    fn placeholder_for_blank_amounts() {
        assert_eq!(print_currency(None), "R$ -");
        assert_eq!(print_currency(Some(0.0)), "R$ -");
        assert_eq!(print_currency(Some(f64::NAN)), "R$ -");
        assert_eq!(negative_print_currency(None), "R$ -");
        assert_eq!(negative_print_currency(Some(0.0)), "R$ -");
        assert_eq!(negative_print_currency(Some(f64::NAN)), "R$ -");
    }

    #[test]
    fn prints_two_decimals_with_comma() {
        assert_eq!(print_currency(Some(25.0)), "R$ 25,00");
        assert_eq!(print_currency(Some(1234.5)), "R$ 1234,50");
        assert_eq!(negative_print_currency(Some(50.0)), "R$ -50,00");
    }

    #[test]
    fn brl_display_groups_thousands() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(12.3), "R$ 12,30");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_234_567.0), "R$ 1.234.567,00");
        assert_eq!(format_brl(-1.0), "-R$ 1,00");
        assert_eq!(format_brl(f64::NAN), "R$ 0,00");
    }
}
