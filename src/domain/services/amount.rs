use crate::domain::services::words::amount_to_words;
use crate::utils::error::{InvoiceError, Result};
use std::fmt;
use std::ops::Add;

/// Largest magnitude whose paise an `f64` still holds exactly (2^53 paise),
/// so the words form always spells the same number as the digits.
pub const MAX_AMOUNT: f64 = 90_071_992_547_409.0;

/// An order value as read from the sheet.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MonetaryAmount(f64);

impl MonetaryAmount {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// `sheet_row` is only used to locate the bad cell in the error.
    pub fn parse(raw: &str, sheet_row: usize, caption: &str) -> Result<Self> {
        let invalid = || InvoiceError::InvalidOrderValue {
            row: sheet_row,
            caption: caption.to_string(),
            value: raw.to_string(),
        };
        let value: f64 = raw.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value.abs() > MAX_AMOUNT {
            return Err(invalid());
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Shortest decimal form, with float noise from summing removed
    /// (`0.1 + 0.2` writes back as `0.3`, `15.0` as `15`).
    pub fn plain(&self) -> String {
        let cents = (self.0 * 100.0).round() / 100.0;
        if (cents - self.0).abs() < 1e-6 {
            format!("{}", cents)
        } else {
            format!("{}", self.0)
        }
    }

    /// Always two fractional digits.
    pub fn fixed(&self) -> String {
        format!("{:.2}", self.0)
    }

    pub fn words(&self) -> String {
        amount_to_words(self.0)
    }
}

impl Add for MonetaryAmount {
    type Output = MonetaryAmount;

    fn add(self, rhs: Self) -> Self::Output {
        MonetaryAmount(self.0 + rhs.0)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fixed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_plain_numbers() {
        assert_eq!(MonetaryAmount::parse("10", 2, "OrderValue").unwrap().value(), 10.0);
        assert_eq!(MonetaryAmount::parse(" 99.5 ", 2, "OrderValue").unwrap().value(), 99.5);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "abc", "12,50", "NaN", "inf"] {
            let err = MonetaryAmount::parse(raw, 7, "OrderValue").unwrap_err();
            assert!(matches!(err, InvoiceError::InvalidOrderValue { row: 7, .. }), "{raw}");
        }
    }

    #[test]
    fn test_parse_rejects_amounts_beyond_exact_paise() {
        for raw in ["1e20", "-1e20", "90071992547410"] {
            let err = MonetaryAmount::parse(raw, 3, "OrderValue").unwrap_err();
            assert!(matches!(err, InvoiceError::InvalidOrderValue { row: 3, .. }), "{raw}");
        }
    }

    #[test]
    fn test_largest_amount_words_match_digits() {
        let amount = MonetaryAmount::parse("90071992547409", 2, "OrderValue").unwrap();
        assert_eq!(amount.fixed(), "90071992547409.00");
        assert_eq!(
            amount.words(),
            "ninety trillion seventy-one billion nine hundred ninety-two million \
             five hundred forty-seven thousand four hundred nine Rupees"
        );
    }

    #[test]
    fn test_plain_and_fixed_forms() {
        let sum = MonetaryAmount::new(0.1) + MonetaryAmount::new(0.2);
        assert_eq!(sum.plain(), "0.3");
        assert_eq!(MonetaryAmount::new(15.0).plain(), "15");
        assert_eq!(MonetaryAmount::new(15.0).fixed(), "15.00");
        assert_eq!(MonetaryAmount::new(1234.5).to_string(), "1234.50");
    }

    #[test]
    fn test_words() {
        assert_eq!(
            MonetaryAmount::new(1234.5).words(),
            "one thousand two hundred thirty-four Rupees and fifty paisa"
        );
    }
}
