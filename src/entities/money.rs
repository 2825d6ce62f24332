use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codes::Currency;
use crate::error::ParseError;

/// An exact decimal amount in a specific currency. Uses `rust_decimal`
/// rather than floating point so balance reconciliation (opening +
/// movements = closing) and control-sum checks never drift by rounding
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Money {
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Money { amount, currency }
    }

    /// Parses a SWIFT-style amount where `,` is the decimal separator
    /// (`1234,56`), as used in field 32A/61/60F/62F/etc.
    pub fn parse_swift_amount(amount: &str, currency: Currency) -> Result<Self, ParseError> {
        if amount.is_empty() || !amount.chars().all(|c| c.is_ascii_digit() || c == ',') {
            return Err(ParseError::invalid_value(
                "amount",
                format!("'{amount}' is not a valid SWIFT decimal amount"),
            ));
        }
        let normalized = amount.replacen(',', ".", 1);
        let decimal = Decimal::from_str(&normalized)
            .map_err(|e| ParseError::invalid_value("amount", e.to_string()))?;
        Ok(Money::new(decimal, currency))
    }

    /// Parses a decimal-point amount as used in ISO 20022 XML and DATEV CSV
    /// (`1234.56`), the counterpart to `parse_swift_amount`'s comma form.
    pub fn parse_decimal_point_amount(amount: &str, currency: Currency) -> Result<Self, ParseError> {
        let decimal = Decimal::from_str(amount)
            .map_err(|e| ParseError::invalid_value("amount", e.to_string()))?;
        Ok(Money::new(decimal, currency))
    }

    /// Renders the amount in SWIFT's comma-decimal convention, always with
    /// at least one digit after the comma (`1234,5` is valid SWIFT; we
    /// normalize to the currency's minor unit count).
    pub fn to_swift_amount(&self) -> String {
        let scale = self.currency.minor_unit_exponent();
        let rounded = self.amount.round_dp(scale);
        let s = rounded.to_string();
        s.replace('.', ",")
    }

    /// Renders the amount with a decimal point, as used in ISO 20022 XML
    /// (`<Amt Ccy="EUR">1234.56</Amt>`) and DATEV CSV.
    pub fn to_decimal_point_string(&self) -> String {
        self.amount.round_dp(self.currency.minor_unit_exponent()).to_string()
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(self.amount + other.amount, self.currency.clone()))
    }

    pub fn checked_sub(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(self.amount - other.amount, self.currency.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_decimal_amount() {
        let money = Money::parse_swift_amount("1234,56", Currency::Eur).unwrap();
        assert_eq!(money.amount, Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn rejects_dot_decimal_in_swift_amount() {
        assert!(Money::parse_swift_amount("1234.56", Currency::Eur).is_err());
    }

    #[test]
    fn parses_decimal_point_amount() {
        let money = Money::parse_decimal_point_amount("1234.56", Currency::Eur).unwrap();
        assert_eq!(money.amount, Decimal::from_str("1234.56").unwrap());
    }

    #[test]
    fn renders_swift_and_xml_forms() {
        let money = Money::new(Decimal::from_str("1234.5").unwrap(), Currency::Eur);
        assert_eq!(money.to_swift_amount(), "1234,50");
        assert_eq!(money.to_decimal_point_string(), "1234.50");
    }

    #[test]
    fn exact_decimal_addition_has_no_rounding_drift() {
        let a = Money::parse_swift_amount("0,10", Currency::Eur).unwrap();
        let b = Money::parse_swift_amount("0,20", Currency::Eur).unwrap();
        let sum = a.checked_add(&b).unwrap();
        assert_eq!(sum.amount, Decimal::from_str("0.30").unwrap());
    }

    #[test]
    fn refuses_to_add_mismatched_currencies() {
        let a = Money::parse_swift_amount("1,00", Currency::Eur).unwrap();
        let b = Money::parse_swift_amount("1,00", Currency::Usd).unwrap();
        assert!(a.checked_add(&b).is_none());
    }
}
