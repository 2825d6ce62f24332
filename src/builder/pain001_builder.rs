//! pain.001 builder (§4.6, C6): accumulates a group header and one payment
//! instruction's transactions, materializing a [`PaymentInitiationDocument`].
//!
//! Supports the *begin/add/end* sub-transaction discipline: `begin_payment_instruction`
//! opens a nested [`PaymentInstructionBuilder`] whose mutators
//! (`set_payment_method`, `add_transaction`, `set_requested_execution_date`,
//! `set_charge_bearer`) apply to the open instruction only;
//! `end_payment_instruction` folds it back into the outer builder. Calling
//! `build()` with an instruction still open implicitly closes it first.

use chrono::NaiveDate;

use crate::codes::ChargeBearer;
use crate::documents::pain001::PaymentInitiationDocument;
use crate::entities::group_header::GroupHeader;
use crate::entities::party::Party;
use crate::entities::transaction::Transaction;
use crate::error::{Diagnostic, DiagnosticSink, ParseError, Result};

/// `PmtMtd` — only `TRF` (transfer) is modeled; `TRA` (transfer advice) is
/// out of scope for this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Transfer,
}

/// The nested builder opened by `begin_payment_instruction`. Its mutators
/// collect the one payment instruction this document carries; `end` folds
/// the result back into the outer [`Pain001Builder`].
#[derive(Debug, Clone, Default)]
pub struct PaymentInstructionBuilder {
    payment_information_id: Option<String>,
    requested_execution_date: Option<NaiveDate>,
    charge_bearer: Option<ChargeBearer>,
    transactions: Vec<Transaction>,
}

impl PaymentInstructionBuilder {
    pub fn set_payment_information_id(mut self, value: impl Into<String>) -> Self {
        self.payment_information_id = Some(value.into());
        self
    }

    /// `TRF` is the only supported method; accepted for API symmetry with
    /// the source's `set_payment_method`.
    pub fn set_payment_method(self, _method: PaymentMethod) -> Self {
        self
    }

    pub fn set_requested_execution_date(mut self, value: NaiveDate) -> Self {
        self.requested_execution_date = Some(value);
        self
    }

    pub fn set_charge_bearer(mut self, value: ChargeBearer) -> Self {
        self.charge_bearer = Some(value);
        self
    }

    pub fn add_transaction(mut self, transaction: Transaction) -> Self {
        self.transactions.push(transaction);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pain001Builder {
    message_id: Option<String>,
    creation_date_time: Option<chrono::DateTime<chrono::FixedOffset>>,
    debtor: Option<Party>,
    open_instruction: Option<PaymentInstructionBuilder>,
    closed_instruction: Option<PaymentInstructionBuilder>,
}

impl Pain001Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_id(mut self, value: impl Into<String>) -> Self {
        self.message_id = Some(value.into());
        self
    }

    pub fn creation_date_time(mut self, value: chrono::DateTime<chrono::FixedOffset>) -> Self {
        self.creation_date_time = Some(value);
        self
    }

    pub fn debtor(mut self, value: Party) -> Self {
        self.debtor = Some(value);
        self
    }

    /// Opens a nested instruction builder. Any previously open instruction
    /// (one that was never explicitly ended) is folded in first, matching
    /// `build()`'s implicit-close behaviour.
    pub fn begin_payment_instruction(mut self) -> Self {
        if let Some(open) = self.open_instruction.take() {
            self.closed_instruction = Some(open);
        }
        self.open_instruction = Some(PaymentInstructionBuilder::default());
        self
    }

    /// Applies `mutate` to the currently open instruction builder. Panics
    /// in debug builds only via the returned error if no instruction is
    /// open — callers are expected to have called `begin_payment_instruction`
    /// first.
    pub fn with_instruction(
        mut self,
        mutate: impl FnOnce(PaymentInstructionBuilder) -> PaymentInstructionBuilder,
    ) -> Self {
        if let Some(open) = self.open_instruction.take() {
            self.open_instruction = Some(mutate(open));
        }
        self
    }

    pub fn end_payment_instruction(mut self) -> Self {
        if let Some(open) = self.open_instruction.take() {
            self.closed_instruction = Some(open);
        }
        self
    }

    pub fn build(mut self, mut diagnostics: DiagnosticSink<'_>) -> Result<PaymentInitiationDocument> {
        self = self.end_payment_instruction();

        let message_id = self.message_id.ok_or_else(|| ParseError::MissingField("MsgId".into()))?;
        let creation_date_time = self
            .creation_date_time
            .ok_or_else(|| ParseError::MissingField("CreDtTm".into()))?;
        let debtor = self.debtor.ok_or_else(|| ParseError::MissingField("Dbtr".into()))?;
        let instruction = self
            .closed_instruction
            .ok_or_else(|| ParseError::MissingField("PmtInf".into()))?;

        let payment_information_id = instruction
            .payment_information_id
            .ok_or_else(|| ParseError::MissingField("PmtInfId".into()))?;
        let requested_execution_date = instruction
            .requested_execution_date
            .ok_or_else(|| ParseError::MissingField("ReqdExctnDt".into()))?;

        let mut transactions = instruction.transactions;
        if let Some(charge_bearer) = instruction.charge_bearer {
            for tx in &mut transactions {
                if tx.charge_bearer.is_none() {
                    tx.charge_bearer = Some(charge_bearer);
                }
            }
        }

        if transactions.is_empty() {
            crate::error::emit(
                &mut diagnostics,
                Diagnostic::EmptyDocument {
                    document_kind: "PaymentInitiationDocument".into(),
                },
            );
        }

        let mut group_header = GroupHeader::new(message_id, creation_date_time);
        group_header.number_of_transactions = transactions.len() as u32;
        group_header.control_sum = control_sum(&transactions);

        let document = PaymentInitiationDocument {
            group_header,
            payment_information_id,
            debtor,
            requested_execution_date,
            transactions,
        };

        document.validate().into_result().map_err(|report| {
            report
                .errors
                .into_iter()
                .next()
                .unwrap_or_else(|| ParseError::Inconsistency("invalid pain.001 document".into()))
        })?;
        Ok(document)
    }
}

fn control_sum(transactions: &[Transaction]) -> Option<rust_decimal::Decimal> {
    let mut iter = transactions.iter();
    let first = iter.next()?;
    let mut total = first.amount.amount;
    for tx in iter {
        if tx.amount.currency != first.amount.currency {
            return None;
        }
        total += tx.amount.amount;
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Currency;
    use crate::entities::address::PostalAddress;
    use crate::entities::money::Money;
    use crate::entities::payment_id::{OsRandomBytes, PaymentIdentification, RandomBytes};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    struct FixedBytes(u8);
    impl RandomBytes for FixedBytes {
        fn fill(&mut self, buf: &mut [u8]) {
            buf.fill(self.0);
        }
    }

    fn transaction(amount: &str, source: &mut dyn RandomBytes) -> Transaction {
        Transaction {
            payment_id: PaymentIdentification::new("E2E-1", source),
            amount: Money::new(Decimal::from_str(amount).unwrap(), Currency::Eur),
            requested_execution_date: None,
            debtor: Party::Customer {
                account: Some("DE89370400440532013000".into()),
                name: Some("ACME GMBH".into()),
                address: PostalAddress::default(),
            },
            creditor: Party::Customer {
                account: Some("DE02500105170137075030".into()),
                name: Some("SUPPLIER".into()),
                address: PostalAddress::default(),
            },
            remittance_information: None,
            purpose: None,
            charge_bearer: None,
        }
    }

    #[test]
    fn builds_document_matching_s3() {
        let creation = chrono::DateTime::parse_from_rfc3339("2024-01-15T10:00:00+00:00").unwrap();
        let mut source = FixedBytes(1);
        let document = Pain001Builder::new()
            .message_id("MSG001")
            .creation_date_time(creation)
            .debtor(Party::Customer {
                account: Some("DE89370400440532013000".into()),
                name: Some("ACME GMBH".into()),
                address: PostalAddress::default(),
            })
            .begin_payment_instruction()
            .with_instruction(|instr| {
                instr
                    .set_payment_information_id("PMT-1")
                    .set_payment_method(PaymentMethod::Transfer)
                    .set_requested_execution_date(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap())
                    .add_transaction(transaction("100.00", &mut source))
                    .add_transaction(transaction("50.00", &mut source))
            })
            .end_payment_instruction()
            .build(None)
            .unwrap();

        assert_eq!(document.group_header.number_of_transactions, 2);
        assert_eq!(
            document.group_header.control_sum,
            Some(Decimal::from_str("150.00").unwrap())
        );

        let xml = crate::generator::pain001_writer::generate(&document, None).unwrap();
        assert!(xml.contains("urn:iso:std:iso:20022:tech:xsd:pain.001.001.12"));
    }

    #[test]
    fn build_without_open_instruction_is_an_error() {
        let creation = chrono::DateTime::parse_from_rfc3339("2024-01-15T10:00:00+00:00").unwrap();
        let result = Pain001Builder::new()
            .message_id("MSG001")
            .creation_date_time(creation)
            .debtor(Party::Customer {
                account: None,
                name: Some("ACME GMBH".into()),
                address: PostalAddress::default(),
            })
            .build(None);
        assert!(result.is_err());
    }

    #[test]
    fn unused_random_source_placeholder() {
        let _ = OsRandomBytes;
    }
}
