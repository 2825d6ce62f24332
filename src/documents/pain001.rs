use serde::{Deserialize, Serialize};

use crate::entities::group_header::GroupHeader;
use crate::entities::party::Party;
use crate::entities::transaction::Transaction;
use crate::error::{ParseError, ValidationReport};

/// pain.001 Customer Credit Transfer Initiation: one group header, one
/// payment information block (we model a single `PmtInf` per document,
/// the common case), and its credit transfer transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PaymentInitiationDocument {
    pub group_header: GroupHeader,
    pub payment_information_id: String,
    pub debtor: Party,
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub requested_execution_date: chrono::NaiveDate,
    pub transactions: Vec<Transaction>,
}

impl PaymentInitiationDocument {
    pub fn count_transactions(&self) -> u32 {
        self.transactions.len() as u32
    }

    /// Property 5: control sum equals the sum of all transaction amounts.
    pub fn calculate_control_sum(&self) -> Option<rust_decimal::Decimal> {
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
            report.push(ParseError::MissingField("CdtTrfTxInf".into()));
        }
        if let Some(control_sum) = self.group_header.control_sum {
            if let Some(calculated) = self.calculate_control_sum() {
                if control_sum != calculated {
                    report.push(ParseError::Inconsistency(format!(
                        "GrpHdr/CtrlSum {control_sum} does not match sum of transactions {calculated}"
                    )));
                }
            }
        }
        if self.group_header.number_of_transactions != self.count_transactions() {
            report.push(ParseError::Inconsistency(format!(
                "GrpHdr/NbOfTxs {} does not match transaction count {}",
                self.group_header.number_of_transactions,
                self.count_transactions()
            )));
        }
        report
    }
}
