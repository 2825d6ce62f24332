use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::entities::money::Money;
use crate::error::{ParseError, ValidationReport};

/// One DATEV V700 booking row (`Umsatz (ohne Soll/Haben-Kz)`, `Konto`,
/// `Gegenkonto`, etc.). Field names follow the V700 meta-header convention;
/// only the subset the engine round-trips is modeled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DatevBookingRow {
    pub amount: Money,
    pub is_debit: bool,
    pub account: String,
    pub contra_account: String,
    pub booking_key: Option<String>,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub booking_date: NaiveDate,
    pub document_field_1: Option<String>,
    pub document_field_2: Option<String>,
    pub posting_text: Option<String>,
}

/// A batch of DATEV V700 booking rows sharing one meta/field-header pair
/// (one fiscal year, one consultant/client number pair, one account length).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct DatevBookingBatch {
    pub consultant_number: String,
    pub client_number: String,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub fiscal_year_start: NaiveDate,
    pub account_length: u8,
    /// Meta-header export timestamp. Supplied by the caller rather than
    /// read from the system clock, so that generating the same batch twice
    /// produces identical output.
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub generated_at: NaiveDateTime,
    pub rows: Vec<DatevBookingRow>,
}

impl DatevBookingBatch {
    pub fn total_debits(&self) -> rust_decimal::Decimal {
        self.rows
            .iter()
            .filter(|r| r.is_debit)
            .map(|r| r.amount.amount)
            .sum()
    }

    pub fn total_credits(&self) -> rust_decimal::Decimal {
        self.rows
            .iter()
            .filter(|r| !r.is_debit)
            .map(|r| r.amount.amount)
            .sum()
    }

    /// Field-count per data row must equal the field-header length; since
    /// every row is modeled with the same fixed shape this only checks that
    /// account/contra-account numbers do not exceed the batch's declared
    /// account length.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.rows.is_empty() {
            report.push(ParseError::MissingField("rows".into()));
        }
        let max_len = self.account_length as usize;
        for (i, row) in self.rows.iter().enumerate() {
            if row.account.len() > max_len {
                report.push(ParseError::length_violation(
                    format!("rows[{i}].account"),
                    max_len,
                    row.account.len(),
                ));
            }
            if row.contra_account.len() > max_len {
                report.push(ParseError::length_violation(
                    format!("rows[{i}].contra_account"),
                    max_len,
                    row.contra_account.len(),
                ));
            }
            if row.amount.is_zero() {
                report.push(ParseError::invalid_value(
                    format!("rows[{i}].amount"),
                    "booking amount must not be zero",
                ));
            }
        }
        report
    }
}
