//! DATEV V700 booking batch builder (§4.6, C6; §4.4.4 calls this "the input
//! side of C6 builders"): accumulates meta-header fields and booking rows,
//! materializing a [`DatevBookingBatch`].

use chrono::{NaiveDate, NaiveDateTime};

use crate::documents::datev::{DatevBookingBatch, DatevBookingRow};
use crate::error::{Diagnostic, DiagnosticSink, ParseError, Result};

#[derive(Debug, Clone, Default)]
pub struct DatevBuilder {
    consultant_number: Option<String>,
    client_number: Option<String>,
    fiscal_year_start: Option<NaiveDate>,
    account_length: Option<u8>,
    generated_at: Option<NaiveDateTime>,
    rows: Vec<DatevBookingRow>,
}

impl DatevBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consultant_number(mut self, value: impl Into<String>) -> Self {
        self.consultant_number = Some(value.into());
        self
    }

    pub fn client_number(mut self, value: impl Into<String>) -> Self {
        self.client_number = Some(value.into());
        self
    }

    pub fn fiscal_year_start(mut self, value: NaiveDate) -> Self {
        self.fiscal_year_start = Some(value);
        self
    }

    pub fn account_length(mut self, value: u8) -> Self {
        self.account_length = Some(value);
        self
    }

    /// The meta-header export timestamp. Required rather than defaulted to
    /// the system clock, so `build()` stays a pure function of the
    /// builder's accumulated state.
    pub fn generated_at(mut self, value: NaiveDateTime) -> Self {
        self.generated_at = Some(value);
        self
    }

    pub fn add_row(mut self, row: DatevBookingRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn build(self, mut diagnostics: DiagnosticSink<'_>) -> Result<DatevBookingBatch> {
        let consultant_number = self
            .consultant_number
            .ok_or_else(|| ParseError::MissingField("consultant_number".into()))?;
        let client_number = self
            .client_number
            .ok_or_else(|| ParseError::MissingField("client_number".into()))?;
        let fiscal_year_start = self
            .fiscal_year_start
            .ok_or_else(|| ParseError::MissingField("fiscal_year_start".into()))?;
        let account_length = self
            .account_length
            .ok_or_else(|| ParseError::MissingField("account_length".into()))?;
        let generated_at = self
            .generated_at
            .ok_or_else(|| ParseError::MissingField("generated_at".into()))?;

        if self.rows.is_empty() {
            crate::error::emit(
                &mut diagnostics,
                Diagnostic::EmptyDocument {
                    document_kind: "DatevBookingBatch".into(),
                },
            );
        }

        let batch = DatevBookingBatch {
            consultant_number,
            client_number,
            fiscal_year_start,
            account_length,
            generated_at,
            rows: self.rows,
        };

        batch.validate().into_result().map_err(|report| {
            report
                .errors
                .into_iter()
                .next()
                .unwrap_or_else(|| ParseError::Inconsistency("invalid DATEV booking batch".into()))
        })?;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Currency;
    use crate::entities::money::Money;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn builds_batch_and_round_trips_through_the_writer() {
        let batch = DatevBuilder::new()
            .consultant_number("1001")
            .client_number("1")
            .fiscal_year_start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .account_length(4)
            .generated_at(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap().and_hms_opt(9, 30, 0).unwrap())
            .add_row(DatevBookingRow {
                amount: Money::new(Decimal::from_str("119.00").unwrap(), Currency::Eur),
                is_debit: true,
                account: "1200".into(),
                contra_account: "8400".into(),
                booking_key: None,
                booking_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                document_field_1: Some("RE-1001".into()),
                document_field_2: None,
                posting_text: Some("Rechnung".into()),
            })
            .build(None)
            .unwrap();

        let csv = crate::generator::datev_writer::generate(&batch).unwrap();
        assert!(csv.contains("1200;8400"));
    }

    #[test]
    fn empty_batch_triggers_diagnostic_and_fails_validation() {
        let mut seen = None;
        let result = DatevBuilder::new()
            .consultant_number("1001")
            .client_number("1")
            .fiscal_year_start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .account_length(4)
            .generated_at(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap())
            .build(Some(&mut |diagnostic| seen = Some(diagnostic)));
        assert!(result.is_err());
        assert!(seen.is_some());
    }
}
