use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::balance::{Balance, BalanceKind};
use crate::entities::entry::Entry;
use crate::entities::money::Money;
use crate::error::{ParseError, ValidationReport};

/// The shared shape behind MT940 (customer statement), MT941 (balance
/// report), MT942 (interim transaction report), MT950 (statement message),
/// and camt.053 (bank to customer statement): an account identifier, an
/// opening/closing balance pair, and the entries booked in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct StatementDocument {
    pub reference: String,
    pub account_identification: String,
    pub statement_number: String,
    pub opening_balance: Balance,
    pub closing_balance: Balance,
    pub closing_available_balance: Option<Balance>,
    pub forward_available_balance: Option<Balance>,
    /// `:90D:`/`:90C:` (MT942 only): count and sum of debit/credit entries
    /// since the last report, independent of the entries actually carried.
    pub debit_summary: Option<EntrySummary>,
    pub credit_summary: Option<EntrySummary>,
    pub entries: Vec<Entry>,
    /// `:34F:` (MT942 only): the reporting floor limit below which entries
    /// are omitted from the report.
    pub floor_limit: Option<Money>,
    /// `:13D:` (MT942 only): date/time the report was generated.
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub date_time_indicator: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct EntrySummary {
    pub count: u32,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub total: Decimal,
}

impl StatementDocument {
    pub fn count_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn calculate_net_movement(&self) -> Decimal {
        self.entries.iter().map(Entry::signed_amount).sum()
    }

    /// Property 3: opening balance + net movement reconciles to the closing
    /// balance within ±0.01 minor currency units.
    pub fn is_balance_reconciled(&self) -> bool {
        let expected = self.opening_balance.signed_amount() + self.calculate_net_movement();
        let actual = self.closing_balance.signed_amount();
        (expected - actual).abs() <= Decimal::new(1, 2)
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.opening_balance.amount.currency != self.closing_balance.amount.currency {
            report.push(ParseError::Inconsistency(format!(
                "opening balance currency {} differs from closing balance currency {}",
                self.opening_balance.amount.currency, self.closing_balance.amount.currency
            )));
        }
        if !matches!(
            self.opening_balance.kind,
            BalanceKind::OpeningBooked | BalanceKind::IntermediateOpeningBooked
        ) {
            report.push(ParseError::Inconsistency(
                "opening_balance is not an opening-kind balance".into(),
            ));
        }
        if !matches!(
            self.closing_balance.kind,
            BalanceKind::ClosingBooked | BalanceKind::IntermediateClosingBooked
        ) {
            report.push(ParseError::Inconsistency(
                "closing_balance is not a closing-kind balance".into(),
            ));
        }
        if !self.is_balance_reconciled() {
            report.push(ParseError::Inconsistency(format!(
                "opening balance {} plus entries does not reconcile to closing balance {}",
                self.opening_balance.amount.to_decimal_point_string(),
                self.closing_balance.amount.to_decimal_point_string()
            )));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::{CreditDebit, Currency};
    use crate::entities::money::Money;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn balance(kind: BalanceKind, direction: CreditDebit, amount: &str) -> Balance {
        Balance {
            kind,
            direction,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Money::new(Decimal::from_str(amount).unwrap(), Currency::Eur),
        }
    }

    fn entry(direction: CreditDebit, amount: &str) -> Entry {
        Entry {
            value_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            entry_date: None,
            direction,
            is_reversal: false,
            amount: Money::new(Decimal::from_str(amount).unwrap(), Currency::Eur),
            bank_transaction_code: None,
            customer_reference: "REF".into(),
            bank_reference: None,
            supplementary_details: None,
            remittance_information: None,
            status: crate::codes::EntryStatus::Booked,
            end_to_end_id: None,
            instruction_id: None,
            mandate: None,
            return_reason: None,
            technical_input_channel: None,
            purpose_code: None,
            local_instrument: None,
            instructing_agent: None,
            instructed_agent: None,
            debtor_agent: None,
            creditor_agent: None,
        }
    }

    #[test]
    fn reconciled_statement_passes_validation() {
        let doc = StatementDocument {
            reference: "STMT1".into(),
            account_identification: "DE0123".into(),
            statement_number: "1/1".into(),
            opening_balance: balance(BalanceKind::OpeningBooked, CreditDebit::Credit, "1000.00"),
            closing_balance: balance(BalanceKind::ClosingBooked, CreditDebit::Credit, "1500.00"),
            closing_available_balance: None,
            forward_available_balance: None,
            debit_summary: None,
            credit_summary: None,
            entries: vec![entry(CreditDebit::Credit, "500.00")],
            floor_limit: None,
            date_time_indicator: None,
        };
        assert!(doc.is_balance_reconciled());
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn unreconciled_statement_fails_validation() {
        let doc = StatementDocument {
            reference: "STMT1".into(),
            account_identification: "DE0123".into(),
            statement_number: "1/1".into(),
            opening_balance: balance(BalanceKind::OpeningBooked, CreditDebit::Credit, "1000.00"),
            closing_balance: balance(BalanceKind::ClosingBooked, CreditDebit::Credit, "1999.00"),
            closing_available_balance: None,
            forward_available_balance: None,
            debit_summary: None,
            credit_summary: None,
            entries: vec![entry(CreditDebit::Credit, "500.00")],
            floor_limit: None,
            date_time_indicator: None,
        };
        assert!(!doc.is_balance_reconciled());
        assert!(!doc.validate().is_ok());
    }
}
