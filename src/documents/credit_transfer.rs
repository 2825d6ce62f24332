use serde::{Deserialize, Serialize};

use crate::entities::transaction::Transaction;
use crate::error::{ParseError, ValidationReport};

/// The payload of MT101 (request for transfer, possibly batched), MT103
/// (single customer credit transfer), and MT104 (direct debit collection
/// batch): a sender's reference plus one or more transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct CreditTransferDocument {
    pub sender_reference: String,
    pub transactions: Vec<Transaction>,
    /// MT103 "STP"-capable marker (present only when block 3 tag 119
    /// carried `STP`); not meaningful for MT101/MT104 batches.
    pub stp_capable: bool,
}

impl CreditTransferDocument {
    pub fn single(sender_reference: impl Into<String>, transaction: Transaction, stp_capable: bool) -> Self {
        CreditTransferDocument {
            sender_reference: sender_reference.into(),
            transactions: vec![transaction],
            stp_capable,
        }
    }

    pub fn total_amount(&self) -> Option<rust_decimal::Decimal> {
        let mut iter = self.transactions.iter();
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

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.transactions.is_empty() {
            report.push(ParseError::MissingField("transactions".into()));
        }
        if self.total_amount().is_none() && self.transactions.len() > 1 {
            report.push(ParseError::Inconsistency(
                "batched transactions use more than one currency".into(),
            ));
        }
        report
    }
}
