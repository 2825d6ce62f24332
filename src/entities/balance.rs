use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::CreditDebit;
use crate::entities::money::Money;

/// What role a balance plays within a statement — opening, closing booked,
/// or closing available, matching the MT940/942/camt.053 balance triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum BalanceKind {
    OpeningBooked,
    IntermediateOpeningBooked,
    ClosingBooked,
    IntermediateClosingBooked,
    ClosingAvailable,
    ForwardAvailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Balance {
    pub kind: BalanceKind,
    pub direction: CreditDebit,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub date: NaiveDate,
    pub amount: Money,
}

impl Balance {
    /// Signed amount: negative for debit balances, used by reconciliation.
    pub fn signed_amount(&self) -> rust_decimal::Decimal {
        match self.direction {
            CreditDebit::Credit => self.amount.amount,
            CreditDebit::Debit => -self.amount.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Currency;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn signed_amount_negates_debit_balances() {
        let balance = Balance {
            kind: BalanceKind::OpeningBooked,
            direction: CreditDebit::Debit,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Money::new(Decimal::from_str("100.00").unwrap(), Currency::Eur),
        };
        assert_eq!(balance.signed_amount(), Decimal::from_str("-100.00").unwrap());
    }
}
