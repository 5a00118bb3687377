use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::error::{PayloadError, Result};

const DISPLAY_SCALE: i64 = 2;

/// Normalizes a transaction amount.
///
/// Returns `None` for an empty input, which marks a static (reusable) code.
/// Inputs with no fraction or a single fraction digit are rewritten with two
/// decimals; inputs that already carry two or more fraction digits are kept
/// as typed.
pub fn format_amount(raw: &str) -> Result<Option<String>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = || PayloadError::InvalidAmount(raw.to_string());

    let mut parts = raw.splitn(2, '.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();

    let digits_ok = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits_ok(whole) || !fraction.map_or(true, digits_ok) {
        return Err(invalid());
    }
    if whole.is_empty() && fraction.map_or(true, str::is_empty) {
        return Err(invalid());
    }

    let normalized = format!(
        "{}.{}",
        if whole.is_empty() { "0" } else { whole },
        fraction.filter(|f| !f.is_empty()).unwrap_or("0")
    );
    let value = BigDecimal::from_str(&normalized).map_err(|_| invalid())?;

    match fraction {
        Some(f) if f.len() >= 2 => Ok(Some(raw.to_string())),
        _ => Ok(Some(plain_string(&value))),
    }
}

/// Fixed-point rendering at `DISPLAY_SCALE`, never scientific notation.
fn plain_string(value: &BigDecimal) -> String {
    let (units, _) = value.with_scale(DISPLAY_SCALE).as_bigint_and_exponent();
    let digits = format!("{:0width$}", units, width = DISPLAY_SCALE as usize + 1);
    let (whole, cents) = digits.split_at(digits.len() - DISPLAY_SCALE as usize);
    format!("{}.{}", whole, cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_static() {
        assert_eq!(format_amount("").unwrap(), None);
    }

    #[test]
    fn test_whole_number_gets_two_decimals() {
        assert_eq!(format_amount("50").unwrap().as_deref(), Some("50.00"));
        assert_eq!(format_amount("0").unwrap().as_deref(), Some("0.00"));
        assert_eq!(format_amount("050").unwrap().as_deref(), Some("50.00"));
    }

    #[test]
    fn test_single_fraction_digit_is_padded() {
        assert_eq!(format_amount("50.5").unwrap().as_deref(), Some("50.50"));
        assert_eq!(format_amount(".5").unwrap().as_deref(), Some("0.50"));
        assert_eq!(format_amount("7.").unwrap().as_deref(), Some("7.00"));
    }

    #[test]
    fn test_two_or_more_fraction_digits_pass_through() {
        assert_eq!(format_amount("50.00").unwrap().as_deref(), Some("50.00"));
        assert_eq!(format_amount("50.123").unwrap().as_deref(), Some("50.123"));
    }

    #[test]
    fn test_rejects_garbage() {
        for raw in ["abc", "-5", "1.2.3", "1e5", ".", " 5", "5,00", "+1"] {
            assert_eq!(
                format_amount(raw),
                Err(PayloadError::InvalidAmount(raw.to_string())),
                "{}",
                raw
            );
        }
    }
}
