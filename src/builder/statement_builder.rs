//! MT940/941/942/950 and camt.053 statement builder (§4.6, C6): accumulates
//! balances and entries and materializes a [`StatementDocument`]. Persistent
//! accumulator discipline, matching [`crate::builder::credit_transfer_builder`].

use chrono::{DateTime, FixedOffset};

use crate::documents::statement::{EntrySummary, StatementDocument};
use crate::entities::balance::Balance;
use crate::entities::entry::Entry;
use crate::entities::money::Money;
use crate::error::{Diagnostic, DiagnosticSink, ParseError, Result};

#[derive(Debug, Clone, Default)]
pub struct StatementBuilder {
    reference: Option<String>,
    account_identification: Option<String>,
    statement_number: Option<String>,
    opening_balance: Option<Balance>,
    closing_balance: Option<Balance>,
    closing_available_balance: Option<Balance>,
    forward_available_balance: Option<Balance>,
    debit_summary: Option<EntrySummary>,
    credit_summary: Option<EntrySummary>,
    entries: Vec<Entry>,
    floor_limit: Option<Money>,
    date_time_indicator: Option<DateTime<FixedOffset>>,
}

impl StatementBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference(mut self, value: impl Into<String>) -> Self {
        self.reference = Some(value.into());
        self
    }

    pub fn account_identification(mut self, value: impl Into<String>) -> Self {
        self.account_identification = Some(value.into());
        self
    }

    pub fn statement_number(mut self, value: impl Into<String>) -> Self {
        self.statement_number = Some(value.into());
        self
    }

    pub fn opening_balance(mut self, value: Balance) -> Self {
        self.opening_balance = Some(value);
        self
    }

    pub fn closing_balance(mut self, value: Balance) -> Self {
        self.closing_balance = Some(value);
        self
    }

    pub fn closing_available_balance(mut self, value: Balance) -> Self {
        self.closing_available_balance = Some(value);
        self
    }

    pub fn forward_available_balance(mut self, value: Balance) -> Self {
        self.forward_available_balance = Some(value);
        self
    }

    pub fn debit_summary(mut self, value: EntrySummary) -> Self {
        self.debit_summary = Some(value);
        self
    }

    pub fn credit_summary(mut self, value: EntrySummary) -> Self {
        self.credit_summary = Some(value);
        self
    }

    pub fn add_entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn floor_limit(mut self, value: Money) -> Self {
        self.floor_limit = Some(value);
        self
    }

    pub fn date_time_indicator(mut self, value: DateTime<FixedOffset>) -> Self {
        self.date_time_indicator = Some(value);
        self
    }

    pub fn build(self, mut diagnostics: DiagnosticSink<'_>) -> Result<StatementDocument> {
        let reference = self
            .reference
            .ok_or_else(|| ParseError::MissingField("reference".into()))?;
        let account_identification = self
            .account_identification
            .ok_or_else(|| ParseError::MissingField("account_identification".into()))?;
        let statement_number = self.statement_number.unwrap_or_else(|| "1".to_string());
        let opening_balance = self
            .opening_balance
            .ok_or_else(|| ParseError::MissingField("opening_balance".into()))?;
        let closing_balance = self
            .closing_balance
            .ok_or_else(|| ParseError::MissingField("closing_balance".into()))?;

        if self.entries.is_empty() {
            crate::error::emit(
                &mut diagnostics,
                Diagnostic::EmptyDocument {
                    document_kind: "StatementDocument".into(),
                },
            );
        }

        let document = StatementDocument {
            reference,
            account_identification,
            statement_number,
            opening_balance,
            closing_balance,
            closing_available_balance: self.closing_available_balance,
            forward_available_balance: self.forward_available_balance,
            debit_summary: self.debit_summary,
            credit_summary: self.credit_summary,
            entries: self.entries,
            floor_limit: self.floor_limit,
            date_time_indicator: self.date_time_indicator,
        };

        document.validate().into_result().map_err(|report| {
            report
                .errors
                .into_iter()
                .next()
                .unwrap_or_else(|| ParseError::Inconsistency("invalid statement document".into()))
        })?;
        Ok(document)
    }
}
