use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::bank_tx_code::BankTransactionCode;
use crate::codes::{CreditDebit, EntryStatus, PurposeCode, ReasonCode};
use crate::entities::institution::FinancialInstitutionIdentification;
use crate::entities::mandate::Mandate;
use crate::entities::money::Money;
use crate::entities::remittance::RemittanceInformation;

/// A single booked movement on a statement: one `:61:`/`:86:` pair in
/// MT940/941/942/950, or one camt.053/054 `Ntry`.
///
/// The camt-only fields below come from `Ntry/NtryDtls/TxDtls` and are
/// `None` for entries read from the MT statement family, which carries no
/// such substructure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Entry {
    #[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
    pub value_date: NaiveDate,
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub entry_date: Option<NaiveDate>,
    pub direction: CreditDebit,
    pub is_reversal: bool,
    pub amount: Money,
    /// GVC / ISO bank transaction code classifying the movement, when known.
    pub bank_transaction_code: Option<BankTransactionCode>,
    pub customer_reference: String,
    pub bank_reference: Option<String>,
    pub supplementary_details: Option<String>,
    pub remittance_information: Option<RemittanceInformation>,
    /// `Ntry/Sts/Cd`: booked or still pending. MT statement lines carry no
    /// equivalent and are always booked.
    pub status: EntryStatus,
    pub end_to_end_id: Option<String>,
    pub instruction_id: Option<String>,
    pub mandate: Option<Mandate>,
    pub return_reason: Option<ReasonCode>,
    /// `Ntry/NtryDtls/TxDtls/AddtlTxInf`: the channel the underlying
    /// instruction arrived on, free text from the servicer.
    pub technical_input_channel: Option<String>,
    pub purpose_code: Option<PurposeCode>,
    /// `Ntry/NtryDtls/TxDtls/PmtTpInf/LclInstrm/Cd`.
    pub local_instrument: Option<String>,
    pub instructing_agent: Option<FinancialInstitutionIdentification>,
    pub instructed_agent: Option<FinancialInstitutionIdentification>,
    pub debtor_agent: Option<FinancialInstitutionIdentification>,
    pub creditor_agent: Option<FinancialInstitutionIdentification>,
}

impl Entry {
    /// Signed amount: negative for debit entries, matching
    /// `Balance::signed_amount` so reconciliation can sum entries directly.
    pub fn signed_amount(&self) -> rust_decimal::Decimal {
        let mut direction = self.direction;
        if self.is_reversal {
            direction = match direction {
                CreditDebit::Credit => CreditDebit::Debit,
                CreditDebit::Debit => CreditDebit::Credit,
            };
        }
        match direction {
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

    fn entry(direction: CreditDebit, is_reversal: bool) -> Entry {
        Entry {
            value_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            entry_date: None,
            direction,
            is_reversal,
            amount: Money::new(Decimal::from_str("100.00").unwrap(), Currency::Eur),
            bank_transaction_code: None,
            customer_reference: "REF1".into(),
            bank_reference: None,
            supplementary_details: None,
            remittance_information: None,
            status: EntryStatus::Booked,
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
    fn reversal_flips_effective_direction() {
        let debit = entry(CreditDebit::Debit, false);
        let reversed_debit = entry(CreditDebit::Debit, true);
        assert_eq!(debit.signed_amount(), -reversed_debit.signed_amount());
    }
}
