use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::codes::{ChargeBearer, PurposeCode};
use crate::entities::money::Money;
use crate::entities::party::Party;
use crate::entities::payment_id::PaymentIdentification;
use crate::entities::remittance::RemittanceInformation;

/// A single payment instruction: one leg of an MT101/MT104 batch, the body
/// of an MT103, or one pain.001 `CdtTrfTxInf` / pain.008 `DrctDbtTxInf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Transaction {
    pub payment_id: PaymentIdentification,
    pub amount: Money,
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<String>"))]
    pub requested_execution_date: Option<NaiveDate>,
    pub debtor: Party,
    pub creditor: Party,
    pub remittance_information: Option<RemittanceInformation>,
    pub purpose: Option<PurposeCode>,
    pub charge_bearer: Option<ChargeBearer>,
}
