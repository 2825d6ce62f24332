//! MT101/103/104 builder (§4.6, C6): accumulates the pieces of a single
//! credit transfer transaction and materializes a [`CreditTransferDocument`].
//! Follows the persistent-accumulator discipline: every mutator consumes
//! `self` and returns a new `CreditTransferBuilder`, so two builds can
//! branch off a shared prefix without either one observing the other's
//! later mutations.

use chrono::NaiveDate;

use crate::codes::ChargeBearer;
use crate::documents::credit_transfer::CreditTransferDocument;
use crate::entities::address::PostalAddress;
use crate::entities::money::Money;
use crate::entities::party::Party;
use crate::entities::payment_id::{PaymentIdentification, RandomBytes};
use crate::entities::remittance::RemittanceInformation;
use crate::entities::transaction::Transaction;
use crate::error::{Diagnostic, DiagnosticSink, ParseError, Result};

#[derive(Debug, Clone, Default)]
pub struct CreditTransferBuilder {
    sender_reference: Option<String>,
    end_to_end_id: Option<String>,
    value_date: Option<NaiveDate>,
    amount: Option<Money>,
    ordering_customer_account: Option<String>,
    beneficiary_account: Option<String>,
    charge_bearer: Option<ChargeBearer>,
    remittance: Option<RemittanceInformation>,
}

impl CreditTransferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender_reference(mut self, value: impl Into<String>) -> Self {
        self.sender_reference = Some(value.into());
        self
    }

    pub fn end_to_end_id(mut self, value: impl Into<String>) -> Self {
        self.end_to_end_id = Some(value.into());
        self
    }

    pub fn value_date(mut self, value: NaiveDate) -> Self {
        self.value_date = Some(value);
        self
    }

    pub fn amount(mut self, value: Money) -> Self {
        self.amount = Some(value);
        self
    }

    pub fn ordering_customer_account(mut self, value: impl Into<String>) -> Self {
        self.ordering_customer_account = Some(value.into());
        self
    }

    pub fn beneficiary_account(mut self, value: impl Into<String>) -> Self {
        self.beneficiary_account = Some(value.into());
        self
    }

    pub fn charge_bearer(mut self, value: ChargeBearer) -> Self {
        self.charge_bearer = Some(value);
        self
    }

    pub fn remittance_text(mut self, text: &str) -> Self {
        self.remittance = Some(RemittanceInformation::from_text(text));
        self
    }

    /// Materializes a single-transaction MT103 document. `random_source`
    /// supplies the transaction's UETR; the operation code is always
    /// `CRED`, matching the generator's fixed `:23B:CRED` for MT103.
    pub fn build(
        self,
        random_source: &mut dyn RandomBytes,
        mut diagnostics: DiagnosticSink<'_>,
    ) -> Result<CreditTransferDocument> {
        let sender_reference = self
            .sender_reference
            .ok_or_else(|| ParseError::MissingField("sender_reference".into()))?;
        let amount = self
            .amount
            .ok_or_else(|| ParseError::MissingField("amount".into()))?;
        let value_date = self
            .value_date
            .ok_or_else(|| ParseError::MissingField("value_date".into()))?;
        let ordering_account = self
            .ordering_customer_account
            .ok_or_else(|| ParseError::MissingField("ordering_customer_account".into()))?;
        let beneficiary_account = self
            .beneficiary_account
            .ok_or_else(|| ParseError::MissingField("beneficiary_account".into()))?;

        let end_to_end_id = self.end_to_end_id.unwrap_or_else(|| sender_reference.clone());
        let payment_id = PaymentIdentification::new(end_to_end_id, random_source);

        let debtor = Party::Customer {
            account: Some(ordering_account),
            name: None,
            address: PostalAddress::default(),
        };
        let creditor = Party::Customer {
            account: Some(beneficiary_account),
            name: None,
            address: PostalAddress::default(),
        };

        let transaction = Transaction {
            payment_id,
            amount,
            requested_execution_date: Some(value_date),
            debtor,
            creditor,
            remittance_information: self.remittance,
            purpose: None,
            charge_bearer: self.charge_bearer,
        };

        let stp_capable = has_account(&transaction.debtor) && has_account(&transaction.creditor);
        let document = CreditTransferDocument::single(sender_reference, transaction, stp_capable);

        if document.transactions.is_empty() {
            crate::error::emit(
                &mut diagnostics,
                Diagnostic::EmptyDocument {
                    document_kind: "CreditTransferDocument".into(),
                },
            );
        }
        document.validate().into_result().map_err(|report| {
            report
                .errors
                .into_iter()
                .next()
                .unwrap_or_else(|| ParseError::Inconsistency("invalid credit transfer document".into()))
        })?;
        Ok(document)
    }
}

fn has_account(party: &Party) -> bool {
    matches!(party, Party::Customer { account: Some(_), .. })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Currency;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    struct FixedBytes;
    impl RandomBytes for FixedBytes {
        fn fill(&mut self, buf: &mut [u8]) {
            buf.fill(7);
        }
    }

    #[test]
    fn builds_mt103_minimal_and_generates_expected_tags() {
        let document = CreditTransferBuilder::new()
            .sender_reference("REF1")
            .value_date(NaiveDate::from_ymd_opt(2025, 5, 12).unwrap())
            .amount(Money::new(Decimal::from_str("39.42").unwrap(), Currency::Eur))
            .ordering_customer_account("000000041000045")
            .beneficiary_account("112345679")
            .charge_bearer(ChargeBearer::Ours)
            .remittance_text("TR-PGTD0N")
            .build(&mut FixedBytes, None)
            .unwrap();

        assert!(document.transactions[0].requested_execution_date.is_some());
        assert!(document.stp_capable);

        let rendered = crate::generator::credit_transfer_gen::generate(
            &document,
            crate::generator::credit_transfer_gen::CreditTransferVariant::Mt103,
        )
        .unwrap();
        assert!(rendered.contains(":20:REF1"));
        assert!(rendered.contains(":23B:CRED"));
        assert!(rendered.contains(":32A:250512EUR39,42"));
        assert!(rendered.contains(":70:TR-PGTD0N"));
        assert!(rendered.contains(":71A:OUR"));
    }

    #[test]
    fn missing_amount_is_an_error() {
        let result = CreditTransferBuilder::new()
            .sender_reference("REF1")
            .value_date(NaiveDate::from_ymd_opt(2025, 5, 12).unwrap())
            .ordering_customer_account("1")
            .beneficiary_account("2")
            .build(&mut FixedBytes, None);
        assert!(result.is_err());
    }
}
