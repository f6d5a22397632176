use std::str::FromStr;

use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, RoundingMode, Zero};

use super::errors::DomainError;

/// Shape of a `NUMERIC(precision, scale)` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalColumn {
    pub max_digits: i64,
    pub decimal_places: i64,
}

/// Product prices: `NUMERIC(10, 2)`.
pub const PRICE: DecimalColumn = DecimalColumn {
    max_digits: 10,
    decimal_places: 2,
};

/// Sale totals and line-item unit prices: `NUMERIC(10, 0)`.
pub const WHOLE_AMOUNT: DecimalColumn = DecimalColumn {
    max_digits: 10,
    decimal_places: 0,
};

impl DecimalColumn {
    /// Parse a user supplied amount, rejecting anything the column could not
    /// store without losing digits. Negative amounts are rejected as well.
    pub fn parse(&self, field: &str, raw: &str) -> Result<BigDecimal, DomainError> {
        let value = BigDecimal::from_str(raw.trim()).map_err(|e| {
            DomainError::InvalidInput(format!("{field}: '{raw}' is not a valid decimal ({e})"))
        })?;

        if value < BigDecimal::zero() {
            return Err(DomainError::InvalidInput(format!(
                "{field}: must not be negative"
            )));
        }

        let (_, scale) = value.normalized().as_bigint_and_exponent();
        if scale > self.decimal_places {
            return Err(DomainError::InvalidInput(format!(
                "{field}: at most {} decimal places allowed",
                self.decimal_places
            )));
        }

        let value = value.with_scale(self.decimal_places);
        self.check_fits(field, &value)?;
        Ok(value)
    }

    /// Round `value` to the column scale (half-to-even) and make sure the
    /// integer part still fits.
    pub fn quantize(&self, field: &str, value: &BigDecimal) -> Result<BigDecimal, DomainError> {
        let value = value.with_scale_round(self.decimal_places, RoundingMode::HalfEven);
        self.check_fits(field, &value)?;
        Ok(value)
    }

    fn check_fits(&self, field: &str, value: &BigDecimal) -> Result<(), DomainError> {
        let whole_digits = value.digits() as i64 - self.decimal_places;
        let allowed = self.max_digits - self.decimal_places;
        if whole_digits > allowed {
            return Err(DomainError::InvalidInput(format!(
                "{field}: at most {allowed} digits before the decimal point allowed"
            )));
        }
        Ok(())
    }
}

/// Averages are reported to the cent.
pub const STAT_PLACES: i64 = 2;

/// Statistic rounded to two decimal places; zero when there was nothing to
/// aggregate.
pub fn cents(value: Option<&BigDecimal>) -> BigDecimal {
    value
        .map(|v| v.with_scale_round(STAT_PLACES, RoundingMode::HalfEven))
        .unwrap_or_else(|| BigDecimal::zero().with_scale(STAT_PLACES))
}

/// Fixed-point text with exactly `places` fractional digits.
///
/// `BigDecimal`'s `Display` drops the scale of zero values, so amounts that
/// leave the service go through here instead.
pub fn render(value: &BigDecimal, places: i64) -> String {
    let (mut digits, scale) = value
        .with_scale_round(places, RoundingMode::HalfEven)
        .as_bigint_and_exponent();
    if scale < places {
        digits *= BigInt::from(10u8).pow((places - scale) as u32);
    }

    let mut text = digits.magnitude().to_string();
    let places = places.max(0) as usize;
    if places > 0 {
        if text.len() <= places {
            text = format!("{}{}", "0".repeat(places + 1 - text.len()), text);
        }
        text.insert(text.len() - places, '.');
    }
    if digits.sign() == Sign::Minus {
        text.insert(0, '-');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn parse_price_pads_to_two_places() {
        let price = PRICE.parse("price", "19.9").unwrap();
        assert_eq!(price.to_string(), "19.90");
    }

    #[test]
    fn parse_price_accepts_trailing_zeros_beyond_scale() {
        let price = PRICE.parse("price", "100.000").unwrap();
        assert_eq!(price, dec("100"));
    }

    #[test]
    fn parse_price_rejects_three_decimal_places() {
        let err = PRICE.parse("price", "1.234").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[test]
    fn parse_price_rejects_too_many_whole_digits() {
        assert!(PRICE.parse("price", "99999999.99").is_ok());
        assert!(PRICE.parse("price", "100000000").is_err());
    }

    #[test]
    fn parse_rejects_garbage_and_negatives() {
        assert!(PRICE.parse("price", "abc").is_err());
        assert!(PRICE.parse("price", "-1").is_err());
    }

    #[test]
    fn quantize_rounds_half_to_even() {
        assert_eq!(WHOLE_AMOUNT.quantize("total", &dec("2.5")).unwrap(), dec("2"));
        assert_eq!(WHOLE_AMOUNT.quantize("total", &dec("3.5")).unwrap(), dec("4"));
        assert_eq!(WHOLE_AMOUNT.quantize("total", &dec("3.49")).unwrap(), dec("3"));
    }

    #[test]
    fn quantize_rejects_overflowing_totals() {
        assert!(WHOLE_AMOUNT.quantize("total", &dec("9999999999")).is_ok());
        assert!(WHOLE_AMOUNT.quantize("total", &dec("10000000000")).is_err());
    }

    #[test]
    fn empty_statistic_renders_with_cents() {
        let avg = cents(None);
        assert_eq!(avg, BigDecimal::zero());
        assert_eq!(render(&avg, 2), "0.00");
    }

    #[test]
    fn cents_rounds_half_to_even() {
        assert_eq!(cents(Some(&dec("133.665"))), dec("133.66"));
        assert_eq!(cents(Some(&dec("3.3333333333"))), dec("3.33"));
    }

    #[test]
    fn render_keeps_scale_of_zero_amounts() {
        assert_eq!(render(&dec("0.00"), 2), "0.00");
        assert_eq!(render(&BigDecimal::zero(), 2), "0.00");
        assert_eq!(render(&BigDecimal::zero(), 0), "0");
    }

    #[test]
    fn render_pads_and_rounds() {
        assert_eq!(render(&dec("150"), 2), "150.00");
        assert_eq!(render(&dec("0.5"), 2), "0.50");
        assert_eq!(render(&dec("0.05"), 2), "0.05");
        assert_eq!(render(&dec("19.99"), 0), "20");
        assert_eq!(render(&dec("-1.5"), 2), "-1.50");
        assert_eq!(render(&dec("1E+3"), 0), "1000");
    }
}
